use crate::document::{ProcessInfo, ThreadInfo};
use crate::handler::LogHandler;
use crate::record::{LogEvent, MessagePayload};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that converts events into [`LogEvent`]s and
/// dispatches them synchronously to a [`LogHandler`].
///
/// There is no buffering: the handler, and with it the database write, runs
/// on the thread that emitted the event and may block it for the duration
/// of the write. By default every event is captured;
/// [`with_level`](Self::with_level) restricts capture to a level and above.
pub struct HandlerLayer {
    handler: Arc<dyn LogHandler>,
    level: Option<Level>,
    /// Total events seen by the layer (before filtering by level).
    pub total_events: Arc<AtomicU64>,
    /// Events forwarded to the handler.
    pub handled_events: Arc<AtomicU64>,
}

impl HandlerLayer {
    /// Create a layer dispatching every event to `handler`.
    pub fn new(handler: Arc<dyn LogHandler>) -> Self {
        HandlerLayer {
            handler,
            level: None,
            total_events: Arc::new(AtomicU64::new(0)),
            handled_events: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Only forward events at `level` or more severe.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }
}

impl<S> Layer<S> for HandlerLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        if let Some(max) = self.level {
            if *event.metadata().level() > max {
                return;
            }
        }

        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;
        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let meta = event.metadata();
        let function = ctx
            .event_span(event)
            .map(|span| span.name().to_string())
            .unwrap_or_else(|| "<root>".to_string());

        let record = LogEvent {
            timestamp: Utc::now(),
            payload: MessagePayload::Plain(compose_message(message, &fields)),
            level: meta.level().to_string(),
            module: meta.module_path().unwrap_or_else(|| meta.target()).to_string(),
            function,
            line: meta.line().unwrap_or(0),
            thread: ThreadInfo::current(),
            process: ProcessInfo::current(),
        };

        self.handler.handle(&record);
        self.handled_events.fetch_add(1, Ordering::Relaxed);
    }
}

/// Fold non-message fields into the message as `key=value` pairs, keeping
/// the persisted document at its fixed eight-key shape.
fn compose_message(message: Option<String>, fields: &BTreeMap<String, serde_json::Value>) -> String {
    let mut msg = message.unwrap_or_default();
    for (key, value) in fields {
        if !msg.is_empty() {
            msg.push(' ');
        }
        // serde_json's Display quotes strings, matching fmt-layer output.
        msg.push_str(&format!("{}={}", key, value));
    }
    msg
}

use tracing::field::{Field, Visit};

pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, serde_json::Value>,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(value.to_string()),
            );
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // The `message` field of the event macros arrives here as
        // `fmt::Arguments`, whose Debug form is the formatted text.
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(format!("{:?}", value)),
            );
        }
    }
}
