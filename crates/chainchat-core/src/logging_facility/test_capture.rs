//! In-memory event capture for logging assertions
//!
//! Installs one process-wide registry whose layer records every event's
//! fields as strings. Tests run in parallel against the same capture, so
//! lookups are always narrowed to one operation, and usually to one caller.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use chainchat_core_types::schema::{FIELD_CALLER, FIELD_COMPONENT, FIELD_EVENT, FIELD_OP};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    /// String form of a recorded field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn is_op(&self, op: &str) -> bool {
        self.op.as_deref() == Some(op)
    }
}

#[derive(Default)]
struct FieldRecorder(HashMap<String, String>);

impl FieldRecorder {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldRecorder {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }
}

type Sink = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer {
    sink: Sink,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        let fields = recorder.0;

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            component: fields.get(FIELD_COMPONENT).cloned(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            fields,
        };

        if let Ok(mut events) = self.sink.lock() {
            events.push(captured);
        }
    }
}

/// Read handle over the captured events
#[derive(Clone)]
pub struct TestCapture {
    sink: Sink,
}

impl TestCapture {
    /// Everything captured so far, in emission order
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.sink.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events of one operation, in emission order
    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.events().into_iter().filter(|e| e.is_op(op)).collect()
    }

    /// Events of one operation issued by one caller, in emission order
    ///
    /// Engine entry points tag every event with the caller, so a caller name
    /// unique to a test isolates that test's calls.
    pub fn events_for_call(&self, op: &str, caller: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.is_op(op) && e.field(FIELD_CALLER) == Some(caller))
            .collect()
    }

    /// # Panics
    ///
    /// Panics unless some event has the given operation and event name.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events_for_op(op);
        assert!(
            events.iter().any(|e| e.event.as_deref() == Some(event)),
            "no {}/{} event among {} captured for that op",
            op,
            event,
            events.len()
        );
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture subscriber once and return a handle to it
///
/// If another global subscriber won the race, the handle stays empty.
///
/// ```
/// use chainchat_core::logging_facility::test_capture::init_test_capture;
/// use chainchat_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_op", caller = "doc_wallet");
/// assert_eq!(capture.events_for_call("doc_capture_op", "doc_wallet").len(), 1);
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let sink = Sink::default();
            let layer = CaptureLayer { sink: sink.clone() };
            let _ = tracing_subscriber::registry().with(layer).try_init();
            TestCapture { sink }
        })
        .clone()
}
