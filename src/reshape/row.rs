use serde_json::{Map, Value};

use crate::config::ReshapeConfig;
use crate::reshape::hour::is_bucket_column;

/// One tracked entity's row, split into the fields the reshaper reads and a
/// passthrough bucket for everything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub entity_id: Option<String>,
    pub anomaly_timestamp: Option<String>,
    pub anomaly_type: Option<String>,
    pub anomaly_baseline: Option<f64>,
    pub color: Option<String>,
    /// Hour-bucket columns, raw values kept as delivered.
    pub buckets: Vec<(String, Value)>,
    /// Unrecognized fields, preserved verbatim.
    pub extra: Map<String, Value>,
}

impl RawRow {
    pub fn new(entity_id: &str) -> Self {
        Self {
            entity_id: Some(entity_id.to_string()),
            ..Default::default()
        }
    }

    pub fn with_bucket(mut self, column: &str, value: Value) -> Self {
        self.buckets.push((column.to_string(), value));
        self
    }

    pub fn with_anomaly(mut self, timestamp: &str) -> Self {
        self.anomaly_timestamp = Some(timestamp.to_string());
        self
    }

    /// Split a JSON record according to `cfg`.
    pub fn from_record(record: &Map<String, Value>, cfg: &ReshapeConfig) -> Self {
        let mut row = RawRow::default();
        for (key, value) in record {
            if *key == cfg.entity_key {
                row.entity_id = text_field(value, true);
            } else if *key == cfg.anomaly_key {
                row.anomaly_timestamp = text_field(value, false);
            } else if *key == cfg.anomaly_type_key {
                row.anomaly_type = text_field(value, false);
            } else if *key == cfg.baseline_key {
                row.anomaly_baseline = numeric(value).filter(|v| v.is_finite());
            } else if *key == cfg.color_key {
                row.color = text_field(value, false);
            } else if is_bucket_column(key, &cfg.bucket_prefix) {
                row.buckets.push((key.clone(), value.clone()));
            } else {
                row.extra.insert(key.clone(), value.clone());
            }
        }
        row
    }
}

/// Non-empty string, or a number's decimal text when `allow_number` is set.
fn text_field(value: &Value, allow_number: bool) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) if allow_number => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric reading of a cell: numbers, numeric strings, booleans as 1/0.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                Some(0.0)
            } else {
                t.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Bucket count with the zero default applied.
pub fn count(value: &Value, clamp_negative: bool) -> f64 {
    let v = numeric(value).filter(|v| v.is_finite()).unwrap_or(0.0);
    if clamp_negative && v < 0.0 {
        0.0
    } else {
        v
    }
}
