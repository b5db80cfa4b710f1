//! Structured JSONL logging.
//!
//! One JSON object per line on stdout (and appended to `LOG_FILE` when set):
//! `ts`, `run_id`, `seq`, `lvl`, `component`, `event`, `msg`, `data`.
//! `LOG_LEVEL` sets the floor, `LOG_DOMAINS` (comma list or `all`) filters.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use crate::chart::ChartSpec;

// =============================================================================
// Levels and domains
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
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            _ => Level::Info,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Snapshot, // Page load, mount, parse
    Series,   // Series extraction
    Render,   // Chart assembly and output
    Refresh,  // Reload timer
    Source,   // File/HTTP delivery
    System,   // Startup, shutdown
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Snapshot => "snapshot",
            Domain::Series => "series",
            Domain::Render => "render",
            Domain::Refresh => "refresh",
            Domain::Source => "source",
            Domain::System => "system",
        }
    }

    pub fn is_enabled(&self) -> bool {
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

struct RunContext {
    run_id: String,
    file: Option<Mutex<BufWriter<File>>>,
}

fn run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let file = std::env::var("LOG_FILE").ok().and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(f) => Some(Mutex::new(BufWriter::new(f))),
                Err(err) => {
                    eprintln!("[log] cannot open {}: {}", path, err);
                    None
                }
            }
        });
        RunContext { run_id, file }
    })
}

pub fn run_id() -> &'static str {
    &run_context().run_id
}

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

// =============================================================================
// Core
// =============================================================================

pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    emit_record(level, domain.as_str(), event, fields);
}

fn build_record(level: Level, component: &str, event: &str, mut fields: Map<String, Value>) -> Value {
    let msg = fields.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(run_id()));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    entry.insert("data".to_string(), Value::Object(fields));
    Value::Object(entry)
}

fn emit_record(level: Level, component: &str, event: &str, fields: Map<String, Value>) {
    let line = build_record(level, component, event, fields).to_string();
    if let Some(file) = &run_context().file {
        if let Ok(mut w) = file.lock() {
            let _ = writeln!(w, "{}", line);
            let _ = w.flush();
        }
    }
    println!("{}", line);
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
// Dashboard events
// =============================================================================

pub fn log_page_loaded(source: &str, digest: &str, bytes: usize) {
    log(
        Level::Info,
        Domain::Snapshot,
        "page_loaded",
        obj(&[
            ("source", v_str(source)),
            ("sha256", v_str(digest)),
            ("bytes", json!(bytes)),
        ]),
    );
}

pub fn log_mounted(system_rows: usize, tables: usize, cells: usize, has_latency: bool) {
    log(
        Level::Info,
        Domain::Snapshot,
        "mounted",
        obj(&[
            ("system_rows", json!(system_rows)),
            ("tables", json!(tables)),
            ("table_cells", json!(cells)),
            ("latency_document", json!(has_latency)),
        ]),
    );
}

fn stage_domain(stage: &str) -> Domain {
    match stage {
        "source" => Domain::Source,
        "write" => Domain::Render,
        _ => Domain::Snapshot,
    }
}

pub fn log_load_failed(stage: &str, error: &str) {
    log(
        Level::Error,
        stage_domain(stage),
        "load_failed",
        obj(&[("stage", v_str(stage)), ("msg", v_str(error))]),
    );
}

pub fn log_panel(chart: &ChartSpec) {
    let names: Vec<Value> = chart.series.iter().map(|s| v_str(&s.name)).collect();
    log(
        Level::Debug,
        Domain::Series,
        "panel",
        obj(&[
            ("panel", v_str(chart.id)),
            ("series", Value::Array(names)),
            ("points", json!(chart.point_count())),
            ("latest", chart.latest_label().map(|l| v_str(&l)).unwrap_or(Value::Null)),
        ]),
    );
}

pub fn log_rendered(panels: usize, empty_panels: usize, out_path: &str) {
    log(
        Level::Info,
        Domain::Render,
        "rendered",
        obj(&[
            ("panels", json!(panels)),
            ("empty_panels", json!(empty_panels)),
            ("out", v_str(out_path)),
        ]),
    );
}

pub fn log_reload_armed(delay_secs: u64) {
    log(
        Level::Info,
        Domain::Refresh,
        "reload_armed",
        obj(&[("delay_secs", json!(delay_secs))]),
    );
}

// =============================================================================
// Profiling scope
// =============================================================================

/// Emits elapsed time on drop.
pub struct ProfileScope {
    domain: Domain,
    label: &'static str,
    started: Instant,
}

impl ProfileScope {
    pub fn new(domain: Domain, label: &'static str) -> Self {
        Self {
            domain,
            label,
            started: Instant::now(),
        }
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        log(
            Level::Trace,
            self.domain,
            "profile",
            obj(&[("label", v_str(self.label)), ("elapsed_ms", v_num(elapsed_ms))]),
        );
    }
}
