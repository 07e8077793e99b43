use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Diagnostic, RenderTarget};

/// Built-in render output: a plain tree that hosts can walk or print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Empty,
    Text {
        text: String,
    },
    Element {
        tag: String,
        attributes: Map<String, Value>,
        children: Vec<View>,
    },
    Placeholder {
        message: String,
        children: Vec<View>,
    },
}

impl RenderTarget for View {
    fn empty() -> Self {
        View::Empty
    }

    fn placeholder(diagnostic: &Diagnostic, children: Vec<Self>) -> Self {
        View::Placeholder {
            message: diagnostic.to_string(),
            children,
        }
    }
}

impl View {
    pub fn text(s: impl Into<String>) -> Self {
        View::Text { text: s.into() }
    }

    pub fn element(tag: &str, attributes: &Map<String, Value>, children: Vec<View>) -> Self {
        View::Element {
            tag: tag.to_string(),
            attributes: attributes.clone(),
            children,
        }
    }

    pub fn children(&self) -> &[View] {
        match self {
            View::Element { children, .. } | View::Placeholder { children, .. } => children,
            View::Empty | View::Text { .. } => &[],
        }
    }

    /// All text content, depth-first.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_texts(&mut out);
        out
    }

    fn collect_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let View::Text { text } = self {
            out.push(text);
        }
        for child in self.children() {
            child.collect_texts(out);
        }
    }

    /// Placeholder messages, depth-first.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_placeholders(&mut out);
        out
    }

    fn collect_placeholders<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let View::Placeholder { message, .. } = self {
            out.push(message);
        }
        for child in self.children() {
            child.collect_placeholders(out);
        }
    }

    /// Indented, one node per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(0, &mut out);
        out
    }

    fn write_outline(&self, indent: usize, out: &mut String) {
        let pad = "  ".repeat(indent);
        match self {
            View::Empty => return,
            View::Text { text } => {
                out.push_str(&format!("{}{}\n", pad, text));
            }
            View::Element { tag, attributes, .. } => {
                let attrs: Vec<String> = attributes
                    .iter()
                    .filter(|(_, v)| !v.is_array() && !v.is_object())
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                if attrs.is_empty() {
                    out.push_str(&format!("{}<{}>\n", pad, tag));
                } else {
                    out.push_str(&format!("{}<{} {}>\n", pad, tag, attrs.join(" ")));
                }
            }
            View::Placeholder { message, .. } => {
                out.push_str(&format!("{}[!] {}\n", pad, message));
            }
        }
        for child in self.children() {
            child.write_outline(indent + 1, out);
        }
    }
}
