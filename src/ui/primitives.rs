//! Default kinds for the built-in [`View`] target.
//!
//! Hosts with their own output type build their own registry; this one is
//! what the CLI and tests render against.

use serde_json::{Map, Value};

use super::view::View;
use super::NodeRegistry;

pub const DASHBOARD: &str = "AnomalyVisualizationDashboard";
pub const CHART: &str = "AnomalyChart";

pub fn default_registry() -> NodeRegistry<View> {
    NodeRegistry::new()
        .with("text", text)
        .with("heading", heading)
        .with("stack", |attrs, children| View::element("stack", attrs, children))
        .with("row", |attrs, children| View::element("row", attrs, children))
        .with("list", list)
        .with(CHART, chart)
        .with(DASHBOARD, dashboard)
}

fn text(attrs: &Map<String, Value>, children: Vec<View>) -> View {
    let body = View::text(text_of(attrs, &["value", "text"]));
    if children.is_empty() {
        return body;
    }
    let mut all = vec![body];
    all.extend(children);
    View::element("text", attrs, all)
}

fn heading(attrs: &Map<String, Value>, children: Vec<View>) -> View {
    let mut all = vec![View::text(text_of(attrs, &["title", "value", "text"]))];
    all.extend(children);
    View::element("heading", attrs, all)
}

/// `items` attribute entries become text children ahead of node children.
fn list(attrs: &Map<String, Value>, children: Vec<View>) -> View {
    let mut all: Vec<View> = attrs
        .get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|v| View::text(display(v))).collect())
        .unwrap_or_default();
    all.extend(children);
    View::element("list", attrs, all)
}

fn chart(attrs: &Map<String, Value>, children: Vec<View>) -> View {
    let points = array_len(attrs, "data");
    let anomalies = array_len(attrs, "anomalies");
    let mut all = vec![View::text(format!("{} points, {} anomalies", points, anomalies))];
    all.extend(children);
    View::element(CHART, attrs, all)
}

/// Title, header counts, then the chart.
///
/// Counts come from `stats` when present and are otherwise derived from
/// `anomalies`.
fn dashboard(attrs: &Map<String, Value>, children: Vec<View>) -> View {
    let title = attrs
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Anomaly Visualization");
    let (total, spikes, drops) = header_counts(attrs);

    let mut chart_attrs = Map::new();
    for (from, to) in [("chartData", "data"), ("anomalies", "anomalies"), ("chartConfig", "config")] {
        if let Some(v) = attrs.get(from) {
            chart_attrs.insert(to.to_string(), v.clone());
        }
    }

    let mut all = vec![
        View::text(title),
        View::text(format!("Total anomalies: {}  Spikes: {}  Drops: {}", total, spikes, drops)),
        chart(&chart_attrs, Vec::new()),
    ];
    all.extend(children);
    View::element(DASHBOARD, attrs, all)
}

fn header_counts(attrs: &Map<String, Value>) -> (u64, u64, u64) {
    let anomalies: &[Value] = attrs
        .get("anomalies")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let count_type = |wanted: &[&str]| {
        anomalies
            .iter()
            .filter(|a| {
                a.get("type")
                    .or_else(|| a.get("anomaly_type"))
                    .and_then(Value::as_str)
                    .map(|t| wanted.contains(&t))
                    .unwrap_or(false)
            })
            .count() as u64
    };
    let stats = attrs.get("stats");
    let stat = |key: &str| stats.and_then(|s| s.get(key)).and_then(Value::as_u64);
    (
        stat("total").unwrap_or(anomalies.len() as u64),
        stat("spike_count").unwrap_or_else(|| count_type(&["spike", "click_spike"])),
        stat("drop_count").unwrap_or_else(|| count_type(&["drop", "click_drop"])),
    )
}

fn text_of(attrs: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| attrs.get(*k))
        .map(display)
        .unwrap_or_default()
}

fn display(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn array_len(attrs: &Map<String, Value>, key: &str) -> usize {
    attrs.get(key).and_then(Value::as_array).map(Vec::len).unwrap_or(0)
}
