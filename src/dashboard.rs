use serde_json::{json, Value};

use crate::reshape::Reshaped;
use crate::stats::{plottable_series, summarize};
use crate::ui::primitives::DASHBOARD;
use crate::ui::UiNode;

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub title: String,
    pub height: u32,
    pub table_markdown: Option<String>,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            title: "Click anomaly detection".to_string(),
            height: 400,
            table_markdown: None,
        }
    }
}

/// Dashboard tree for a reshape result, ready to hand to the interpreter or
/// to wrap for the chat transport.
pub fn build(reshaped: &Reshaped, opts: &DashboardOptions) -> UiNode {
    let stats = summarize(&reshaped.anomalies);
    let mut node = UiNode::new(DASHBOARD)
        .attr("title", json!(opts.title))
        .attr("chartData", to_json(&reshaped.points))
        .attr("anomalies", to_json(&reshaped.anomalies))
        .attr("stats", to_json(&stats))
        .attr(
            "chartConfig",
            json!({
                "height": opts.height,
                "series": to_json(&plottable_series(reshaped)),
            }),
        );
    if let Some(md) = &opts.table_markdown {
        node = node.attr("tableMarkdown", json!(md));
    }
    node
}

fn to_json<T: serde::Serialize>(v: &T) -> Value {
    serde_json::to_value(v).unwrap_or(Value::Null)
}
