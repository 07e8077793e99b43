//! Wide hour-bucket table → per-entity time series plus anomaly markers.
//!
//! Input is one row per entity with one column per hour
//! (`h_YYYYMMDD_HH`). Output is a sorted list of points keyed by canonical
//! hour, the series descriptors that say which keys in a point are
//! plottable, and one anomaly marker per row carrying an anomaly timestamp.
//!
//! Malformed cells, columns and timestamps never abort a reshape; they are
//! skipped and counted in [`ReshapeReport`]. Only a non-array input or a
//! non-record row is an error.

pub mod hour;
pub mod row;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ReshapeConfig;
use crate::error::{json_type_name, ReshapeError};
pub use row::RawRow;

/// Key holding a point's hour. Flattened entity values share the object, so
/// no entity may use it.
pub const HOUR_KEY: &str = "hour";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub hour: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl ChartPoint {
    pub fn get(&self, entity_id: &str) -> Option<f64> {
        self.values.get(entity_id).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Spike,
    Drop,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::Spike => "spike",
            AnomalyKind::Drop => "drop",
        }
    }

    /// Recognises `spike`/`drop` and the `click_` prefixed spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "spike" | "click_spike" => Some(AnomalyKind::Spike),
            "drop" | "click_drop" => Some(AnomalyKind::Drop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub hour: String,
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reshaped {
    pub points: Vec<ChartPoint>,
    pub series: Vec<SeriesDescriptor>,
    pub anomalies: Vec<Anomaly>,
}

impl Reshaped {
    pub fn point_at(&self, hour: &str) -> Option<&ChartPoint> {
        self.points.iter().find(|p| p.hour == hour)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReshapeReport {
    pub rows: u64,
    pub skipped_rows: u64,
    pub skipped_fields: u64,
    pub skipped_anomalies: u64,
    pub warnings: Vec<String>,
}

impl ReshapeReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_rows == 0 && self.skipped_fields == 0 && self.skipped_anomalies == 0
    }
}

/// Reshape typed rows.
pub fn reshape(rows: &[RawRow], cfg: &ReshapeConfig) -> Reshaped {
    reshape_rows(rows, cfg).0
}

/// Reshape a JSON array of records.
pub fn reshape_json(input: &Value, cfg: &ReshapeConfig) -> Result<Reshaped, ReshapeError> {
    let rows = rows_from_json(input, cfg)?;
    Ok(reshape(&rows, cfg))
}

/// Parse rows from raw JSON bytes: a bare array, or an object with a `rows`
/// array (the shape the query step stores its results in).
pub fn rows_from_slice(bytes: &[u8], cfg: &ReshapeConfig) -> Result<Vec<RawRow>, ReshapeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let rows = match value.get("rows") {
        Some(inner) if value.is_object() => inner,
        _ => &value,
    };
    rows_from_json(rows, cfg)
}

/// Split a JSON array of records into [`RawRow`]s.
pub fn rows_from_json(input: &Value, cfg: &ReshapeConfig) -> Result<Vec<RawRow>, ReshapeError> {
    let items = input.as_array().ok_or(ReshapeError::NotAnArray {
        found: json_type_name(input),
    })?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object()
                .map(|record| RawRow::from_record(record, cfg))
                .ok_or(ReshapeError::NotARecord {
                    index,
                    found: json_type_name(item),
                })
        })
        .collect()
}

/// Reshape typed rows and report what was skipped along the way.
pub fn reshape_rows(rows: &[RawRow], cfg: &ReshapeConfig) -> (Reshaped, ReshapeReport) {
    let mut report = ReshapeReport {
        rows: rows.len() as u64,
        ..Default::default()
    };

    let mut series: Vec<SeriesDescriptor> = Vec::new();
    let mut series_index: HashMap<String, usize> = HashMap::new();
    let mut by_hour: BTreeMap<DateTime<Utc>, ChartPoint> = BTreeMap::new();

    for (i, row) in rows.iter().enumerate() {
        let Some(entity) = row.entity_id.as_deref() else {
            report.skipped_rows += 1;
            report.warnings.push(format!("row {}: missing entity id", i));
            continue;
        };
        if entity == HOUR_KEY {
            report.skipped_rows += 1;
            report
                .warnings
                .push(format!("row {}: entity id {:?} collides with the point hour key", i, entity));
            continue;
        }

        match series_index.get(entity) {
            Some(&idx) => {
                if row.color.is_some() {
                    series[idx].color = row.color.clone();
                }
            }
            None => {
                series_index.insert(entity.to_string(), series.len());
                series.push(SeriesDescriptor {
                    key: entity.to_string(),
                    name: entity.to_string(),
                    color: row.color.clone(),
                });
            }
        }

        for (column, value) in &row.buckets {
            let ts = match hour::decode_bucket(column, &cfg.bucket_prefix) {
                Ok(Some(ts)) => ts,
                Ok(None) => continue,
                Err(err) => {
                    report.skipped_fields += 1;
                    report.warnings.push(format!("row {}: {}", i, err));
                    continue;
                }
            };
            let point = by_hour.entry(ts).or_insert_with(|| ChartPoint {
                hour: hour::canonical(&ts),
                values: BTreeMap::new(),
            });
            point
                .values
                .insert(entity.to_string(), row::count(value, cfg.clamp_negative));
        }
    }

    let mut anomalies = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let (Some(entity), Some(raw_ts)) = (row.entity_id.as_deref(), row.anomaly_timestamp.as_deref())
        else {
            continue;
        };
        if entity == HOUR_KEY {
            continue;
        }
        let Some(ts) = hour::parse_timestamp(raw_ts) else {
            report.skipped_anomalies += 1;
            report
                .warnings
                .push(format!("row {}: unparseable anomaly timestamp {:?}", i, raw_ts));
            continue;
        };
        let kind = match row.anomaly_type.as_deref() {
            None => AnomalyKind::Spike,
            Some(raw) => AnomalyKind::parse(raw).unwrap_or_else(|| {
                report
                    .warnings
                    .push(format!("row {}: unknown anomaly type {:?}, using spike", i, raw));
                AnomalyKind::Spike
            }),
        };
        anomalies.push(Anomaly {
            name: entity.to_string(),
            kind,
            hour: hour::canonical(&ts),
            value: by_hour.get(&ts).and_then(|p| p.get(entity)),
            baseline: row.anomaly_baseline,
        });
    }

    let reshaped = Reshaped {
        points: by_hour.into_values().collect(),
        series,
        anomalies,
    };
    (reshaped, report)
}
