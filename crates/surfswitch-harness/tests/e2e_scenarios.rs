//! End-to-end scenarios through the CLI entry point.
//!
//! Each test builds a [`Cli`] the way the binary would and checks the
//! rendered output, exit codes, and the log events a run emits.
//!
//! Run:
//!   cargo test -p surfswitch-harness --test e2e_scenarios

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use clap::Parser;
use surfswitch_harness::{Cli, CliError, execute};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["surfswitch-harness"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn json(args: &[&str]) -> serde_json::Value {
    let mut argv = vec!["--json"];
    argv.extend_from_slice(args);
    let out = execute(&cli(&argv)).unwrap();
    serde_json::from_str(&out).unwrap()
}

// ── Scenarios ─────────────────────────────────────────────────────────────

#[test]
fn default_script_cycles_and_survives_lost_input() {
    let v = json(&[]);
    assert_eq!(v["label"], "RED");
    assert_eq!(v["presses"], 3);
    assert_eq!(v["ticks"], 12);
    assert_eq!(v["a"]["drawn"], 12);
    assert_eq!(v["b"]["drawn"], 6);
    assert_eq!(v["b"]["not_ready"], 6);
    assert_eq!(v["degraded"], false);
}

#[test]
fn full_press_cycle_points_renderer_at_each_input() {
    let v = json(&["-e", "create output; create a; create b; press; expect BLUE"]);
    // a = surface#2, b = surface#3
    assert_eq!(v["renderer_input"], 3);
    assert_eq!(v["renderer_output"], 1);

    let v = json(&["-e", "create a; create b; press 2; expect NULL"]);
    assert_eq!(v["renderer_input"], serde_json::Value::Null);

    let v = json(&["-e", "create a; create b; press 3; expect RED"]);
    assert_eq!(v["renderer_input"], 1);
}

#[test]
fn input_lost_while_selected_stays_until_next_press() {
    let v = json(&["-e", "create a; create b; press; destroy b; tick"]);
    assert_eq!(v["renderer_input"], 2);
    assert_eq!(v["b"]["not_ready"], 1);
    assert_eq!(v["a"]["drawn"], 1);

    let v = json(&["-e", "create a; create b; press; destroy b; tick; press"]);
    assert_eq!(v["renderer_input"], serde_json::Value::Null);
    assert_eq!(v["label"], "NULL");
}

#[test]
fn loop_runs_with_only_a() {
    let v = json(&["-e", "create a; tick 30"]);
    assert_eq!(v["ticks"], 30);
    assert_eq!(v["frame_registrations"], 31);
    assert_eq!(v["a"]["drawn"], 30);
    assert_eq!(v["b"]["not_ready"], 30);
}

#[test]
fn recreated_input_a_does_not_restart_loop() {
    let v = json(&["-e", "create a; tick 2; destroy a; tick 2; create a; tick 2"]);
    assert_eq!(v["ticks"], 6);
    assert_eq!(v["frame_registrations"], 7);
    assert_eq!(v["a"]["drawn"], 4);
    assert_eq!(v["a"]["not_ready"], 2);
}

#[test]
fn failed_expectation_exits_nonzero() {
    let err = execute(&cli(&["-e", "create a; expect NULL"])).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("expected label NULL, got RED"));
}

#[test]
fn unsupported_renderer_degrades_by_default() {
    let v = json(&["--unsupported-renderer", "-e", "create a; tick"]);
    assert_eq!(v["degraded"], true);
    assert_eq!(v["ticks"], 1);
}

// ── Files ─────────────────────────────────────────────────────────────────

#[test]
fn script_file_with_comments() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "# lost input scenario\ncreate output\ncreate a\ncreate b\npress   # to B\ndestroy b\ntick 4\nexpect BLUE"
    )
    .unwrap();
    let path = file.path().to_str().unwrap();
    let v = json(&["--script", path]);
    assert_eq!(v["b"]["not_ready"], 4);
    assert_eq!(v["steps"], 7);
}

#[test]
fn config_file_policy_and_cli_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("surfswitch.toml");
    std::fs::write(&path, "unsupported_renderer = \"abort\"\n").unwrap();
    let path = path.to_str().unwrap();

    let err = execute(&cli(&["-c", path, "--unsupported-renderer"])).unwrap_err();
    assert_eq!(err.exit_code(), 3);

    let v = json(&[
        "-c",
        path,
        "--unsupported-renderer",
        "--on-unsupported",
        "degrade",
        "-e",
        "create a",
    ]);
    assert_eq!(v["degraded"], true);
}

#[test]
fn invalid_config_file_exits_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r##"{"overlay": {"marker_a": "#0000ff"}}"##).unwrap();
    let err = execute(&cli(&["-c", path.to_str().unwrap()])).unwrap_err();
    assert!(matches!(err, CliError::Harness(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn oversized_overlay_and_surfaces_are_refused_up_front() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.toml");
    std::fs::write(&path, "[overlay]\ntext_size = 1000000000\n").unwrap();
    let err = execute(&cli(&["-c", path.to_str().unwrap(), "-e", "create a; tick"])).unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("overlay.text_size must be at most"));

    let err = execute(&cli(&["-e", "create a 100000x100000"])).unwrap_err();
    assert!(matches!(err, CliError::Script(_)));
    assert_eq!(err.exit_code(), 2);
}

// ── Log events ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: Option<String>,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message");
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn with_captured_events<F>(f: F) -> Vec<CapturedEvent>
where
    F: FnOnce(),
{
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    events.lock().unwrap().clone()
}

#[test]
fn run_logs_presses_and_summary() {
    let events = with_captured_events(|| {
        execute(&cli(&["-e", "create a; create b; press; tick 2"])).unwrap();
    });

    let press = events
        .iter()
        .find(|e| e.message.as_deref() == Some("operator press"))
        .expect("press event");
    assert_eq!(press.level, tracing::Level::INFO);
    assert_eq!(press.fields.get("from").map(String::as_str), Some("RED"));
    assert_eq!(press.fields.get("to").map(String::as_str), Some("BLUE"));

    let done = events
        .iter()
        .find(|e| e.message.as_deref() == Some("session finished"))
        .expect("summary event");
    assert_eq!(done.fields.get("ticks").map(String::as_str), Some("2"));
    assert_eq!(done.fields.get("label").map(String::as_str), Some("BLUE"));
}

#[test]
fn degraded_run_warns_once() {
    let events = with_captured_events(|| {
        execute(&cli(&["--unsupported-renderer", "-e", "create a"])).unwrap();
    });
    let warnings: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].message.as_deref(),
        Some("renderer unsupported, continuing in degraded mode")
    );
}
