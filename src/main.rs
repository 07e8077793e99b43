//! hourglass CLI.
//!
//! Usage:
//!   hourglass reshape <rows.json>     - reshape result as JSON
//!   hourglass dashboard <rows.json>   - marked dashboard payload
//!   hourglass render <payload>        - rendered outline of a UI payload
//!
//! Configuration comes from the environment (see `ReshapeConfig::from_env`,
//! `RenderConfig::from_env`, `LOG_LEVEL`, `LOG_DOMAINS`, `LOG_DIR`).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;

use hourglass::config::{RenderConfig, ReshapeConfig};
use hourglass::dashboard::{self, DashboardOptions};
use hourglass::envelope::{self, Payload};
use hourglass::fingerprint;
use hourglass::io::read_payload;
use hourglass::logging::{self, log, obj, v_str, Domain, Level, ProfileScope};
use hourglass::reshape::{reshape_rows, rows_from_slice, Reshaped};
use hourglass::ui::{self, primitives::default_registry};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (cmd, path) = match args.as_slice() {
        [cmd, path, ..] => (cmd.as_str(), PathBuf::from(path)),
        _ => bail!("usage: hourglass <reshape|dashboard|render> <file>"),
    };

    log(
        Level::Info,
        Domain::System,
        "start",
        obj(&[("cmd", v_str(cmd)), ("path", v_str(&path.display().to_string()))]),
    );

    match cmd {
        "reshape" => {
            let reshaped = load_and_reshape(&path)?;
            println!("{}", serde_json::to_string_pretty(&reshaped)?);
        }
        "dashboard" => {
            let reshaped = load_and_reshape(&path)?;
            let opts = DashboardOptions {
                title: env::var("DASHBOARD_TITLE")
                    .unwrap_or_else(|_| DashboardOptions::default().title),
                ..Default::default()
            };
            let node = {
                let _scope = ProfileScope::new("dashboard");
                dashboard::build(&reshaped, &opts)
            };
            println!("{}", envelope::wrap(&node)?);
        }
        "render" => render_payload(&path)?,
        other => bail!("unknown command: {}", other),
    }
    Ok(())
}

fn load_and_reshape(path: &Path) -> Result<Reshaped> {
    let cfg = ReshapeConfig::from_env();
    let bytes = fs::read(path).with_context(|| format!("reading rows {}", path.display()))?;
    let input_hash = fingerprint::sha256_hex(&bytes);
    let rows = rows_from_slice(&bytes, &cfg).map_err(|e| {
        logging::log_error(Domain::Reshape, "rows", e.code(), &e.to_string());
        anyhow!("{}: {}", path.display(), e)
    })?;
    let _scope = ProfileScope::with_context("reshape", &[("rows", json!(rows.len()))]);
    let (reshaped, report) = reshape_rows(&rows, &cfg);
    logging::log_reshape_report(
        &path.display().to_string(),
        &report,
        reshaped.points.len(),
        reshaped.series.len(),
        reshaped.anomalies.len(),
    );
    logging::log_audit("reshape", &input_hash, &fingerprint::of_json(&reshaped)?);
    Ok(reshaped)
}

fn render_payload(path: &Path) -> Result<()> {
    let payload = read_payload(path)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("reading payload {}", path.display()))?;
    let node = match payload {
        Payload::Text(text) => {
            if let Some(body) = text.strip_prefix(envelope::MARKER) {
                if let Err(e) = envelope::parse_tree(body) {
                    logging::log_error(Domain::Envelope, "bad_tree", e.code(), &e.to_string());
                }
            }
            log(
                Level::Info,
                Domain::Envelope,
                "plain_text",
                obj(&[("chars", json!(text.chars().count()))]),
            );
            println!("{}", text);
            return Ok(());
        }
        Payload::Tree(node) | Payload::Json(node) => node,
    };

    let cfg = RenderConfig::from_env();
    let registry = default_registry();
    let _scope = ProfileScope::with_context("render", &[("nodes", json!(node.size()))]);
    let summary = ui::summarize(&node, &registry, &cfg);
    logging::log_render_summary(&path.display().to_string(), &summary);
    let view = ui::render_with(Some(&node), &registry, &cfg);
    logging::log_audit(
        "render",
        &fingerprint::of_json(&node)?,
        &fingerprint::of_json(&view)?,
    );
    print!("{}", view.outline());
    Ok(())
}
