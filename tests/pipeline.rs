//! End to end: query rows → reshape → dashboard tree → chat payload →
//! classified → rendered.

use std::io::Write;

use serde_json::json;
use tempfile::NamedTempFile;

use hourglass::dashboard::{build, DashboardOptions};
use hourglass::envelope::{classify, wrap, Payload};
use hourglass::io::{read_payload, read_rows};
use hourglass::reshape::reshape_rows;
use hourglass::ui::primitives::default_registry;
use hourglass::ui::{render, render_with, summarize};
use hourglass::{RenderConfig, ReshapeConfig, UiNode};

#[test]
fn concrete_scenario_through_the_whole_pipeline() {
    let rows = json!([
        {"entity_id": "A", "h_20250101_00": 5, "h_20250101_01": 7},
        {"entity_id": "B", "h_20250101_00": 2, "anomaly_timestamp": "2025-01-01 00:00:00 UTC"}
    ]);
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(rows.to_string().as_bytes()).unwrap();

    let cfg = ReshapeConfig::default();
    let typed = read_rows(file.path(), &cfg).unwrap();
    let (reshaped, report) = reshape_rows(&typed, &cfg);
    assert!(report.is_clean());
    assert_eq!(reshaped.points.len(), 2);
    assert_eq!(reshaped.anomalies[0].value, Some(2.0));

    let node = build(&reshaped, &DashboardOptions {
        title: "Clicks".to_string(),
        ..Default::default()
    });
    let wire = wrap(&node).unwrap();

    let payload = classify(&wire);
    assert!(matches!(payload, Payload::Tree(_)));
    let view = render(payload.node(), &default_registry());
    assert!(view.placeholders().is_empty());
    assert_eq!(
        view.texts(),
        vec!["Clicks", "Total anomalies: 1  Spikes: 1  Drops: 0", "2 points, 1 anomalies"]
    );
}

#[test]
fn component_props_wire_format_payload_file() {
    let body = json!({
        "component": "stack",
        "props": {},
        "children": [
            {"component": "heading", "props": {"title": "Report"}},
            {"component": "pieChart", "props": {"data": [1, 2]}, "children": [
                {"component": "text", "props": {"value": "fallback"}}
            ]}
        ]
    });
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "__REACT_COMPONENT__{}", body).unwrap();

    let payload = read_payload(file.path()).unwrap();
    let view = render(payload.node(), &default_registry());
    assert_eq!(
        view.outline(),
        "<stack>\n  <heading title=\"Report\">\n    Report\n  [!] Unknown component: pieChart\n    fallback\n"
    );
}

#[test]
fn plain_text_payload_renders_nothing() {
    let payload = classify("No anomalies found in the requested window.");
    assert!(!payload.is_tree());
    let view = render(payload.node(), &default_registry());
    assert_eq!(view.outline(), "");
}

#[test]
fn deep_marked_tree_reaches_the_depth_cap() {
    let mut node = UiNode::new("text").attr("value", json!("leaf"));
    for _ in 0..99 {
        node = UiNode::new("stack").child(node);
    }
    let wire = wrap(&node).unwrap();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(wire.as_bytes()).unwrap();

    let payload = read_payload(file.path()).unwrap();
    assert!(matches!(payload, Payload::Tree(_)));
    assert_eq!(payload.node().unwrap().depth(), 100);

    let cfg = RenderConfig { max_depth: 64 };
    let view = render_with(payload.node(), &default_registry(), &cfg);
    let placeholders = view.placeholders();
    assert_eq!(placeholders.len(), 1);
    assert!(placeholders[0].contains("exceeds max depth 64"));
    assert!(view.texts().is_empty());
    assert_eq!(summarize(payload.node().unwrap(), &default_registry(), &cfg).truncated, 1);
}
