use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::ReshapeConfig;
use crate::envelope::{classify, Payload};
use crate::error::ReshapeError;
use crate::reshape::{rows_from_slice, RawRow};

/// Read a JSON array of row records. See [`rows_from_slice`] for the
/// accepted shapes.
pub fn read_rows(path: &Path, cfg: &ReshapeConfig) -> Result<Vec<RawRow>, String> {
    let bytes = fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    rows_from_slice(&bytes, cfg).map_err(|e: ReshapeError| format!("{}: {}", path.display(), e))
}

/// Read an assistant payload: a raw marked string, a JSON string holding
/// one, or a bare JSON tree.
pub fn read_payload(path: &Path) -> Result<Payload, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    if let Ok(Value::String(inner)) = serde_json::from_str::<Value>(&text) {
        return Ok(classify(&inner));
    }
    Ok(classify(text.trim_end()))
}
