//! Error types for hourglass.
//!
//! Only whole-input shape violations surface here. Malformed individual
//! fields and timestamps are recovered where they occur and show up in
//! [`crate::reshape::ReshapeReport`] instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReshapeError {
    #[error("expected an array of rows, got {found}")]
    NotAnArray { found: &'static str },

    #[error("row {index} is not a record, got {found}")]
    NotARecord { index: usize, found: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("node at {path} is not an object, got {found}")]
    NotANode { path: String, found: &'static str },

    #[error("node at {path} has no kind")]
    MissingKind { path: String },

    #[error("children of node at {path} must be an array, got {found}")]
    BadChildren { path: String, found: &'static str },

    #[error("attributes of node at {path} must be an object, got {found}")]
    BadAttributes { path: String, found: &'static str },

    #[error("payload nests {depth} levels deep, limit is {limit}")]
    TooDeep { depth: usize, limit: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReshapeError {
    pub fn code(&self) -> i32 {
        match self {
            ReshapeError::NotAnArray { .. } => 2,
            ReshapeError::NotARecord { .. } => 3,
            ReshapeError::Json(_) => 4,
        }
    }
}

impl RenderError {
    pub fn code(&self) -> i32 {
        match self {
            RenderError::NotANode { .. } => 5,
            RenderError::MissingKind { .. } => 6,
            RenderError::BadChildren { .. } => 7,
            RenderError::BadAttributes { .. } => 8,
            RenderError::TooDeep { .. } => 9,
            RenderError::Json(_) => 4,
        }
    }
}

/// Short name of a JSON value's type, for error messages.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!([1])), "array");
        assert_eq!(json_type_name(&json!({"a": 1})), "object");
        assert_eq!(json_type_name(&json!("x")), "string");
    }

    #[test]
    fn test_messages_name_the_location() {
        let err = ReshapeError::NotARecord { index: 3, found: "string" };
        assert_eq!(err.to_string(), "row 3 is not a record, got string");
        let err = RenderError::MissingKind { path: "$.children[1]".to_string() };
        assert!(err.to_string().contains("$.children[1]"));
    }

    #[test]
    fn test_codes_are_distinct() {
        let a = ReshapeError::NotAnArray { found: "object" }.code();
        let b = RenderError::NotANode { path: "$".to_string(), found: "array" }.code();
        assert_ne!(a, b);
        let deep = RenderError::TooDeep { depth: 5000, limit: 1024 };
        assert_eq!(deep.code(), 9);
        assert_eq!(deep.to_string(), "payload nests 5000 levels deep, limit is 1024");
    }

    #[test]
    fn test_json_errors_convert() {
        let err: ReshapeError = serde_json::from_str::<serde_json::Value>("[").unwrap_err().into();
        assert_eq!(err.code(), 4);
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
