use serde::{Deserialize, Serialize};

/// Field names and coercion rules for the reshaper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReshapeConfig {
    pub entity_key: String,
    pub anomaly_key: String,
    pub anomaly_type_key: String,
    pub baseline_key: String,
    pub color_key: String,
    /// Prefix in front of `YYYYMMDD_HH` in hour-bucket column names.
    pub bucket_prefix: String,
    /// Clamp negative bucket counts to zero.
    pub clamp_negative: bool,
}

impl Default for ReshapeConfig {
    fn default() -> Self {
        Self {
            entity_key: "entity_id".to_string(),
            anomaly_key: "anomaly_timestamp".to_string(),
            anomaly_type_key: "anomaly_type".to_string(),
            baseline_key: "anomaly_baseline".to_string(),
            color_key: "color".to_string(),
            bucket_prefix: "h_".to_string(),
            clamp_negative: false,
        }
    }
}

impl ReshapeConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            entity_key: std::env::var("HOURGLASS_ENTITY_KEY").unwrap_or(d.entity_key),
            anomaly_key: std::env::var("HOURGLASS_ANOMALY_KEY").unwrap_or(d.anomaly_key),
            anomaly_type_key: std::env::var("HOURGLASS_ANOMALY_TYPE_KEY")
                .unwrap_or(d.anomaly_type_key),
            baseline_key: std::env::var("HOURGLASS_BASELINE_KEY").unwrap_or(d.baseline_key),
            color_key: std::env::var("HOURGLASS_COLOR_KEY").unwrap_or(d.color_key),
            bucket_prefix: std::env::var("HOURGLASS_BUCKET_PREFIX").unwrap_or(d.bucket_prefix),
            clamp_negative: std::env::var("HOURGLASS_CLAMP_NEGATIVE")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(d.clamp_negative),
        }
    }

    /// Column layout used by the click-anomaly queries feeding the dashboard.
    pub fn media_source() -> Self {
        Self {
            entity_key: "media_source".to_string(),
            anomaly_key: "anomaly_hour_ts".to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Nodes deeper than this render as a depth placeholder. The root is depth 0.
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

impl RenderConfig {
    pub fn from_env() -> Self {
        Self {
            max_depth: std::env::var("HOURGLASS_MAX_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
        }
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
