//! Assistant payload classification.
//!
//! Chat responses arrive as strings. A UI tree is sent as
//! `__REACT_COMPONENT__{...json...}`; anything else is shown as text. A
//! marked payload whose JSON does not parse as a node falls back to text.
//!
//! Payload JSON is parsed without serde_json's default nesting limit of 128,
//! which would cut UI trees off at about 64 levels. [`MAX_WIRE_NESTING`]
//! bounds it instead, well above the default render depth cap, so deep trees
//! reach the interpreter and end in a depth placeholder.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RenderError;
use crate::ui::UiNode;

pub const MARKER: &str = "__REACT_COMPONENT__";

/// JSON nesting accepted in a payload. A node level costs two (object and
/// `children` array).
pub const MAX_WIRE_NESTING: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "payload", content = "body", rename_all = "snake_case")]
pub enum Payload {
    Text(String),
    /// Marked tree.
    Tree(UiNode),
    /// Unmarked JSON object that is a valid tree.
    Json(UiNode),
}

impl Payload {
    pub fn node(&self) -> Option<&UiNode> {
        match self {
            Payload::Tree(node) | Payload::Json(node) => Some(node),
            Payload::Text(_) => None,
        }
    }

    pub fn is_tree(&self) -> bool {
        self.node().is_some()
    }
}

pub fn classify(raw: &str) -> Payload {
    if let Some(body) = raw.strip_prefix(MARKER) {
        return match parse_node(body) {
            Some(node) => Payload::Tree(node),
            None => Payload::Text(raw.to_string()),
        };
    }
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') {
        if let Some(node) = parse_node(trimmed) {
            return Payload::Json(node);
        }
    }
    Payload::Text(raw.to_string())
}

/// Marked wire form of `node`.
pub fn wrap(node: &UiNode) -> Result<String, serde_json::Error> {
    Ok(format!("{}{}", MARKER, serde_json::to_string(node)?))
}

/// Parse a payload body (no marker) into a tree.
///
/// `Ok(None)` for a JSON `null` body.
pub fn parse_tree(body: &str) -> Result<Option<UiNode>, RenderError> {
    let body = body.trim();
    let depth = json_nesting(body);
    if depth > MAX_WIRE_NESTING {
        return Err(RenderError::TooDeep {
            depth,
            limit: MAX_WIRE_NESTING,
        });
    }
    let mut de = serde_json::Deserializer::from_str(body);
    de.disable_recursion_limit();
    let value = Value::deserialize(&mut de)?;
    de.end()?;
    UiNode::from_value(&value)
}

fn parse_node(body: &str) -> Option<UiNode> {
    parse_tree(body).ok().flatten()
}

/// Deepest `{`/`[` nesting in `text`, ignoring brackets inside strings.
fn json_nesting(text: &str) -> usize {
    let (mut depth, mut deepest) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}
