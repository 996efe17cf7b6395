//! Structured log events emitted by a harness session.
//!
//! Captures events with a tracing-subscriber layer and asserts on level,
//! message and fields:
//! - Unsupported renderer in degrade mode logs a WARN and continues
//! - Abort mode logs an ERROR
//! - A refused lock is logged at DEBUG with slot and surface fields
//! - Presses log the transition labels

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use surfswitch_core::{InputSlot, Size, SurfaceEvent, SurfaceRole};
use surfswitch_runtime::{
    Harness, HarnessConfig, HeadlessHost, ManualClock, RecordingRenderer,
    UnsupportedRendererPolicy,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use web_time::Duration;

// ── Capture layer ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: Option<String>,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    fn new() -> (Self, Arc<Mutex<Vec<CapturedEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: Arc::clone(&events),
            },
            events,
        )
    }
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
    let (layer, events) = EventCapture::new();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    events.lock().unwrap().clone()
}

fn find<'a>(events: &'a [CapturedEvent], message: &str) -> Option<&'a CapturedEvent> {
    events
        .iter()
        .find(|e| e.message.as_deref() == Some(message))
}

fn harness(
    renderer: RecordingRenderer,
    config: HarnessConfig,
) -> Harness<RecordingRenderer, HeadlessHost, ManualClock> {
    Harness::new(config, renderer, HeadlessHost::new(), ManualClock::new(0)).unwrap()
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[test]
fn degraded_renderer_logs_warning() {
    let events = with_captured_events(|| {
        let mut h = harness(RecordingRenderer::unsupported(), HarnessConfig::default());
        h.on_create().unwrap();
        assert!(h.is_degraded());
    });

    let probe = find(&events, "renderer capability probe").expect("probe event");
    assert_eq!(probe.level, tracing::Level::INFO);
    assert_eq!(probe.fields.get("supported").map(String::as_str), Some("false"));

    let warn = find(&events, "renderer unsupported, continuing in degraded mode")
        .expect("degrade warning");
    assert_eq!(warn.level, tracing::Level::WARN);
    assert!(events.iter().all(|e| e.level != tracing::Level::ERROR));
}

#[test]
fn supported_renderer_logs_no_warning() {
    let events = with_captured_events(|| {
        let mut h = harness(RecordingRenderer::new(), HarnessConfig::default());
        h.on_create().unwrap();
    });
    assert!(events.iter().all(|e| e.level > tracing::Level::WARN));
}

#[test]
fn abort_policy_logs_error() {
    let config = HarnessConfig {
        unsupported_renderer: UnsupportedRendererPolicy::Abort,
        ..HarnessConfig::default()
    };
    let events = with_captured_events(|| {
        let mut h = harness(RecordingRenderer::unsupported(), config);
        assert!(h.on_create().is_err());
    });
    let err = find(&events, "renderer unsupported, aborting setup").expect("abort event");
    assert_eq!(err.level, tracing::Level::ERROR);
}

#[test]
fn refused_lock_is_logged_at_debug() {
    let events = with_captured_events(|| {
        let mut h = harness(RecordingRenderer::new(), HarnessConfig::default());
        let a = h.host_mut().create_surface(Size::new(320, 160));
        h.handle_surface_event(SurfaceRole::Input(InputSlot::A), SurfaceEvent::Created(a));
        h.host_mut().fail_next_lock(a);
        let report = h.on_refresh(Duration::from_millis(16)).unwrap();
        assert!(!report.a.is_drawn());
    });

    let lock = find(&events, "lock failed, skipping frame").expect("lock event");
    assert_eq!(lock.level, tracing::Level::DEBUG);
    assert_eq!(lock.fields.get("slot").map(String::as_str), Some("a"));
    assert_eq!(lock.fields.get("surface").map(String::as_str), Some("surface#1"));
    assert_eq!(
        lock.fields.get("error").map(String::as_str),
        Some("injected failure on surface#1")
    );
}

#[test]
fn press_logs_transition_labels() {
    let events = with_captured_events(|| {
        let mut h = harness(RecordingRenderer::new(), HarnessConfig::default());
        h.advance();
    });
    let press = find(&events, "input selection advanced").expect("press event");
    assert_eq!(press.fields.get("from").map(String::as_str), Some("RED"));
    assert_eq!(press.fields.get("to").map(String::as_str), Some("BLUE"));
    assert_eq!(press.fields.get("input").map(String::as_str), Some("None"));
}
