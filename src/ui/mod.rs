//! Declarative UI-tree interpreter.
//!
//! A [`UiNode`] tree arrives as data. [`render`] walks it depth-first and
//! resolves every `kind` through a [`NodeRegistry`] supplied by the host.
//! Unknown kinds become a visible placeholder and their children are still
//! rendered, so one bad node never blanks out its subtree.
//!
//! The interpreter is generic over its output: anything implementing
//! [`RenderTarget`] can be produced. [`view::View`] is the built-in target.

pub mod primitives;
pub mod view;

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::RenderConfig;
use crate::error::{json_type_name, RenderError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiNode {
    #[serde(alias = "component")]
    pub kind: String,
    #[serde(default, alias = "props")]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub children: Vec<UiNode>,
}

impl UiNode {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            attributes: Map::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &str, value: Value) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }

    pub fn child(mut self, node: UiNode) -> Self {
        self.children.push(node);
        self
    }

    /// Validating conversion from loose JSON.
    ///
    /// `null` is an absent node. Accepts `kind`/`component` and
    /// `attributes`/`props`; `null` children are dropped.
    pub fn from_value(value: &Value) -> Result<Option<UiNode>, RenderError> {
        node_from_value(value, "$")
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(UiNode::size).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(UiNode::depth).max().unwrap_or(0)
    }
}

fn node_from_value(value: &Value, path: &str) -> Result<Option<UiNode>, RenderError> {
    let obj = match value {
        Value::Null => return Ok(None),
        Value::Object(obj) => obj,
        other => {
            return Err(RenderError::NotANode {
                path: path.to_string(),
                found: json_type_name(other),
            })
        }
    };

    let kind = obj
        .get("kind")
        .or_else(|| obj.get("component"))
        .and_then(Value::as_str)
        .ok_or_else(|| RenderError::MissingKind {
            path: path.to_string(),
        })?;

    let attributes = match obj.get("attributes").or_else(|| obj.get("props")) {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(m)) => m.clone(),
        Some(other) => {
            return Err(RenderError::BadAttributes {
                path: path.to_string(),
                found: json_type_name(other),
            })
        }
    };

    let mut children = Vec::new();
    match obj.get("children") {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                let child_path = format!("{}.children[{}]", path, i);
                if let Some(child) = node_from_value(item, &child_path)? {
                    children.push(child);
                }
            }
        }
        Some(other) => {
            return Err(RenderError::BadChildren {
                path: path.to_string(),
                found: json_type_name(other),
            })
        }
    }

    Ok(Some(UiNode {
        kind: kind.to_string(),
        attributes,
        children,
    }))
}

/// Why a node rendered as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Diagnostic {
    UnknownKind { kind: String },
    DepthExceeded { kind: String, depth: usize, max_depth: usize },
}

impl Diagnostic {
    pub fn kind(&self) -> &str {
        match self {
            Diagnostic::UnknownKind { kind } => kind,
            Diagnostic::DepthExceeded { kind, .. } => kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownKind { kind } => write!(f, "Unknown component: {}", kind),
            Diagnostic::DepthExceeded { kind, depth, max_depth } => write!(
                f,
                "Component {} at depth {} exceeds max depth {}",
                kind, depth, max_depth
            ),
        }
    }
}

/// Output type produced by the interpreter.
pub trait RenderTarget: Sized {
    /// Output for an absent node.
    fn empty() -> Self;

    /// Stand-in for a node that could not be resolved. `children` are the
    /// node's already-rendered children.
    fn placeholder(diagnostic: &Diagnostic, children: Vec<Self>) -> Self;
}

/// Builds one kind's output from its attributes and rendered children.
pub type Factory<O> = Box<dyn Fn(&Map<String, Value>, Vec<O>) -> O + Send + Sync>;

/// Kind string → factory lookup, owned by the host.
pub struct NodeRegistry<O> {
    factories: HashMap<String, Factory<O>>,
}

impl<O> Default for NodeRegistry<O> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

impl<O> fmt::Debug for NodeRegistry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl<O> NodeRegistry<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `kind`, returning the factory it replaced.
    pub fn register<F>(&mut self, kind: &str, factory: F) -> Option<Factory<O>>
    where
        F: Fn(&Map<String, Value>, Vec<O>) -> O + Send + Sync + 'static,
    {
        self.factories.insert(kind.to_string(), Box::new(factory))
    }

    pub fn with<F>(mut self, kind: &str, factory: F) -> Self
    where
        F: Fn(&Map<String, Value>, Vec<O>) -> O + Send + Sync + 'static,
    {
        self.register(kind, factory);
        self
    }

    pub fn get(&self, kind: &str) -> Option<&Factory<O>> {
        self.factories.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Render with the default [`RenderConfig`].
pub fn render<O: RenderTarget>(node: Option<&UiNode>, registry: &NodeRegistry<O>) -> O {
    render_with(node, registry, &RenderConfig::default())
}

pub fn render_with<O: RenderTarget>(
    node: Option<&UiNode>,
    registry: &NodeRegistry<O>,
    cfg: &RenderConfig,
) -> O {
    match node {
        Some(node) => render_node(node, registry, cfg, 0),
        None => O::empty(),
    }
}

/// Validate loose JSON as a tree, then render it.
pub fn render_value<O: RenderTarget>(
    value: &Value,
    registry: &NodeRegistry<O>,
    cfg: &RenderConfig,
) -> Result<O, RenderError> {
    let node = UiNode::from_value(value)?;
    Ok(render_with(node.as_ref(), registry, cfg))
}

fn render_node<O: RenderTarget>(
    node: &UiNode,
    registry: &NodeRegistry<O>,
    cfg: &RenderConfig,
    depth: usize,
) -> O {
    if depth > cfg.max_depth {
        let diagnostic = Diagnostic::DepthExceeded {
            kind: node.kind.clone(),
            depth,
            max_depth: cfg.max_depth,
        };
        return O::placeholder(&diagnostic, Vec::new());
    }

    let factory = registry.get(&node.kind);
    let children: Vec<O> = node
        .children
        .iter()
        .map(|child| render_node(child, registry, cfg, depth + 1))
        .collect();

    match factory {
        Some(factory) => factory(&node.attributes, children),
        None => {
            let diagnostic = Diagnostic::UnknownKind {
                kind: node.kind.clone(),
            };
            O::placeholder(&diagnostic, children)
        }
    }
}

/// What a render pass over a tree would resolve, without producing output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSummary {
    pub nodes: u64,
    pub resolved: u64,
    pub unknown_kinds: BTreeSet<String>,
    pub placeholders: u64,
    pub truncated: u64,
}

pub fn summarize<O>(node: &UiNode, registry: &NodeRegistry<O>, cfg: &RenderConfig) -> RenderSummary {
    let mut summary = RenderSummary::default();
    walk(node, registry, cfg, 0, &mut summary);
    summary
}

fn walk<O>(
    node: &UiNode,
    registry: &NodeRegistry<O>,
    cfg: &RenderConfig,
    depth: usize,
    summary: &mut RenderSummary,
) {
    if depth > cfg.max_depth {
        summary.truncated += 1;
        summary.placeholders += 1;
        return;
    }
    summary.nodes += 1;
    if registry.contains(&node.kind) {
        summary.resolved += 1;
    } else {
        summary.placeholders += 1;
        summary.unknown_kinds.insert(node.kind.clone());
    }
    for child in &node.children {
        walk(child, registry, cfg, depth + 1, summary);
    }
}
