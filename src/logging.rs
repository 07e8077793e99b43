//! Structured logging for the hourglass tools.
//!
//! One JSON object per line with a run id, sequence number, level and
//! domain. Lines go to stderr so stdout stays free for tool output; when
//! `LOG_DIR` is set they are also appended to `<LOG_DIR>/<run_id>/events.jsonl`
//! (trace/debug go to `trace.jsonl`).
//!
//! The reshaper and interpreter never log. They return reports, and the
//! binaries turn those into log lines with the helpers below.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use crate::reshape::ReshapeReport;
use crate::ui::RenderSummary;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    pub fn from_env() -> Self {
        std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Level::parse(&v))
            .unwrap_or(Level::Info)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

// =============================================================================
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Reshape,  // Row ingestion, bucket parsing, anomalies
    Render,   // Tree interpretation
    Envelope, // Payload classification
    Io,       // File loading
    System,   // Startup, shutdown
    Profile,  // Timing
    Audit,    // Input/output fingerprints
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Reshape => "reshape",
            Domain::Render => "render",
            Domain::Envelope => "envelope",
            Domain::Io => "io",
            Domain::System => "system",
            Domain::Profile => "profile",
            Domain::Audit => "audit",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // LOG_DOMAINS: comma-separated list or "all"
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    events: Option<Mutex<BufWriter<File>>>,
    trace: Option<Mutex<BufWriter<File>>>,
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let Ok(base) = std::env::var("LOG_DIR") else {
            return RunContext {
                run_id,
                events: None,
                trace: None,
            };
        };
        let mut run_dir = PathBuf::from(base);
        run_dir.push(&run_id);
        if let Err(err) = create_dir_all(&run_dir) {
            eprintln!("[log] failed to create run dir: {}", err);
        }
        let open = |name: &str| match File::create(run_dir.join(name)) {
            Ok(f) => Some(Mutex::new(BufWriter::new(f))),
            Err(err) => {
                eprintln!("[log] failed to create {}: {}", name, err);
                None
            }
        };
        RunContext {
            events: open("events.jsonl"),
            trace: open("trace.jsonl"),
            run_id,
        }
    })
}

fn write_line(writer: &Option<Mutex<BufWriter<File>>>, line: &str) {
    if let Some(Ok(mut w)) = writer.as_ref().map(|m| m.lock()) {
        let _ = writeln!(w, "{}", line);
        let _ = w.flush();
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Epoch milliseconds
pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    let ctx = ensure_run_context();
    let line = format_record(&ctx.run_id, next_seq(), level, domain, event, fields);
    match level {
        Level::Trace | Level::Debug => write_line(&ctx.trace, &line),
        _ => write_line(&ctx.events, &line),
    }
    eprintln!("{}", line);
}

fn format_record(
    run_id: &str,
    seq: u64,
    level: Level,
    domain: Domain,
    event: &str,
    mut fields: Map<String, Value>,
) -> String {
    let msg = fields.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(run_id));
    entry.insert("seq".to_string(), json!(seq));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(domain.as_str()));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    entry.insert("data".to_string(), Value::Object(fields));
    Value::Object(entry).to_string()
}

// =============================================================================
// Domain-specific helpers
// =============================================================================

pub fn log_reshape_report(source: &str, report: &ReshapeReport, points: usize, series: usize, anomalies: usize) {
    let level = if report.is_clean() { Level::Info } else { Level::Warn };
    log(
        level,
        Domain::Reshape,
        "reshape_done",
        obj(&[
            ("source", v_str(source)),
            ("rows", json!(report.rows)),
            ("skipped_rows", json!(report.skipped_rows)),
            ("skipped_fields", json!(report.skipped_fields)),
            ("skipped_anomalies", json!(report.skipped_anomalies)),
            ("points", json!(points)),
            ("series", json!(series)),
            ("anomalies", json!(anomalies)),
        ]),
    );
    for warning in &report.warnings {
        log(
            Level::Debug,
            Domain::Reshape,
            "skipped",
            obj(&[("source", v_str(source)), ("msg", v_str(warning))]),
        );
    }
}

pub fn log_render_summary(source: &str, summary: &RenderSummary) {
    let level = if summary.unknown_kinds.is_empty() && summary.truncated == 0 {
        Level::Info
    } else {
        Level::Warn
    };
    log(
        level,
        Domain::Render,
        "render_done",
        obj(&[
            ("source", v_str(source)),
            ("nodes", json!(summary.nodes)),
            ("resolved", json!(summary.resolved)),
            ("placeholders", json!(summary.placeholders)),
            ("truncated", json!(summary.truncated)),
            ("unknown_kinds", json!(summary.unknown_kinds)),
        ]),
    );
}

/// Input/output fingerprints for replay comparison
pub fn log_audit(event_type: &str, input_hash: &str, output_hash: &str) {
    log(
        Level::Info,
        Domain::Audit,
        event_type,
        obj(&[
            ("input_hash", v_str(input_hash)),
            ("output_hash", v_str(output_hash)),
        ]),
    );
}

pub fn log_error(domain: Domain, event: &str, code: i32, err: &str) {
    log(
        Level::Error,
        domain,
        event,
        obj(&[("code", json!(code)), ("msg", v_str(err))]),
    );
}

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Profiling Scope
// =============================================================================

/// Emits structured timing on drop.
pub struct ProfileScope {
    label: &'static str,
    context: Map<String, Value>,
    started: Instant,
}

impl ProfileScope {
    pub fn new(label: &'static str) -> Self {
        Self::with_context(label, &[])
    }

    pub fn with_context(label: &'static str, fields: &[(&str, Value)]) -> Self {
        Self {
            label,
            context: obj(fields),
            started: Instant::now(),
        }
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let mut fields = std::mem::take(&mut self.context);
        fields.insert("label".to_string(), v_str(self.label));
        fields.insert("elapsed_ms".to_string(), v_num(elapsed_ms));
        log(Level::Trace, Domain::Profile, "profile", fields);
    }
}
