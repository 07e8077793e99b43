use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::reshape::{Anomaly, AnomalyKind, Reshaped, SeriesDescriptor};

/// Header numbers shown above the anomaly chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyStats {
    pub total: u64,
    pub spike_count: u64,
    pub drop_count: u64,
    /// Largest |value - baseline| over anomalies that carry both.
    pub max_deviation: f64,
}

pub fn summarize(anomalies: &[Anomaly]) -> AnomalyStats {
    let mut stats = AnomalyStats {
        total: anomalies.len() as u64,
        ..Default::default()
    };
    for a in anomalies {
        match a.kind {
            AnomalyKind::Spike => stats.spike_count += 1,
            AnomalyKind::Drop => stats.drop_count += 1,
        }
        if let (Some(value), Some(baseline)) = (a.value, a.baseline) {
            stats.max_deviation = stats.max_deviation.max((value - baseline).abs());
        }
    }
    stats
}

/// Series whose key is set on at least one point.
pub fn plottable_series(reshaped: &Reshaped) -> Vec<SeriesDescriptor> {
    let present: HashSet<&str> = reshaped
        .points
        .iter()
        .flat_map(|p| p.values.keys().map(String::as_str))
        .collect();
    reshaped
        .series
        .iter()
        .filter(|s| present.contains(s.key.as_str()))
        .cloned()
        .collect()
}
