#![forbid(unsafe_code)]

//! Modifier diagnostic events at the core level.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use css_handles_core::config::{BuildMode, DiagnosticsConfig};
use css_handles_core::diagnostics::ModifierDiagnostics;
use css_handles_core::modifier::apply_modifiers_with;
use tracing_subscriber::layer::SubscriberExt;

const BASE: &str = "vtex-app-2-x-handle";

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone, Default)]
struct CapturedEvent {
    target: String,
    message: String,
    count: Option<u64>,
    values: Option<String>,
}

#[derive(Clone, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }
}

struct FieldVisitor<'a>(&'a mut CapturedEvent);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        if field.name() == "count" {
            self.0.count = Some(value);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.0.message = format!("{value:?}"),
            "values" => self.0.values = Some(format!("{value:?}")),
            _ => {}
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut captured = CapturedEvent {
            target: event.metadata().target().to_owned(),
            ..CapturedEvent::default()
        };
        event.record(&mut FieldVisitor(&mut captured));
        self.events.lock().unwrap().push(captured);
    }
}

fn with_capture<T>(f: impl FnOnce() -> T) -> (T, EventCapture) {
    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, capture)
}

fn diagnostics(delay: Duration) -> ModifierDiagnostics {
    ModifierDiagnostics::new(
        DiagnosticsConfig::default()
            .with_mode(BuildMode::Development)
            .with_flush_delay(delay),
    )
}

// ============================================================================
// Coalesced report
// ============================================================================

#[test]
fn coalesced_report_carries_count_and_values() {
    let delay = Duration::from_secs(3);
    let d = diagnostics(delay);

    let (_, capture) = with_capture(|| {
        apply_modifiers_with(BASE, "a b", &d);
        apply_modifiers_with(BASE, serde_json::json!(["c!", true]), &d);
        d.tick_at(Instant::now() + delay)
    });

    let events = capture.events();
    assert_eq!(events.len(), 1, "{events:?}");
    let event = &events[0];
    assert_eq!(event.target, "css_handles.modifier");
    assert_eq!(event.count, Some(3));
    assert_eq!(event.values.as_deref(), Some("a b, c!, true"));
    assert!(event.message.starts_with("Invalid CSS modifiers."));
}

#[test]
fn elapsed_window_fires_before_next_expansion() {
    let d = diagnostics(Duration::from_millis(10));

    let (out, capture) = with_capture(|| {
        apply_modifiers_with(BASE, "bad!", &d);
        std::thread::sleep(Duration::from_millis(50));
        apply_modifiers_with(BASE, "ok", &d)
    });

    assert_eq!(out, format!("{BASE} {BASE}--ok"));
    assert!(!d.has_pending());
    let events = capture.events();
    assert_eq!(events.len(), 1, "{events:?}");
    assert_eq!(events[0].values.as_deref(), Some("bad!"));
}

// ============================================================================
// Invalid call shape
// ============================================================================

#[test]
fn invalid_call_shape_is_reported_immediately() {
    let d = diagnostics(Duration::from_secs(3));

    let (out, capture) = with_capture(|| apply_modifiers_with(BASE, serde_json::json!({"a": 1}), &d));

    assert_eq!(out, BASE);
    assert!(!d.has_pending());
    let events = capture.events();
    assert_eq!(events.len(), 1, "{events:?}");
    assert_eq!(events[0].target, "css_handles.modifier");
    assert!(events[0].message.starts_with("Invalid modifier type on `withModifiers`"));
}
