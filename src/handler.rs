use crate::document::LogDocument;
use crate::mongo::{BuildError, MongoConfig, MongoSink};
use crate::record::LogEvent;
use crate::sink::DocumentSink;
use chrono::Utc;
use std::error::Error;

/// Capability interface for log event destinations.
///
/// Anything that can take a [`LogEvent`] can be registered as a handler;
/// [`HandlerLayer`](crate::layer::HandlerLayer) dispatches every captured
/// tracing event through this trait.
pub trait LogHandler: Send + Sync {
    /// Handle one log event. Implementations must not propagate failures
    /// back into the code that emitted the event.
    fn handle(&self, event: &LogEvent);
}

type ErrorHook = Box<dyn Fn(&LogEvent, &(dyn Error + Send + Sync)) + Send + Sync>;

/// Log record adapter that persists events as documents in MongoDB.
///
/// Each event is mapped to a [`LogDocument`] by [`format`](Self::format)
/// and written synchronously by [`save`](Self::save) through the configured
/// [`DocumentSink`]. Failures never reach the code that emitted the log
/// call: [`emit`](Self::emit) catches them and reports through the error
/// hook, which defaults to a single stderr line.
///
/// The handler is stateless across calls except for the held sink and the
/// hook, both fixed at construction. Sharing one instance across threads is
/// safe; concurrent-use guarantees for the connection itself are the
/// driver's.
pub struct MongoHandler {
    sink: Box<dyn DocumentSink>,
    error_hook: ErrorHook,
}

impl MongoHandler {
    /// Create a handler writing to the MongoDB described by `config`.
    ///
    /// The underlying client connects lazily; construction succeeding does
    /// not mean the server is reachable (see [`MongoSink::connect`]).
    pub fn new(config: MongoConfig) -> Result<Self, BuildError> {
        Ok(Self::with_sink(MongoSink::connect(config)?))
    }

    /// Create a handler writing through an arbitrary [`DocumentSink`].
    pub fn with_sink(sink: impl DocumentSink + 'static) -> Self {
        MongoHandler {
            sink: Box::new(sink),
            error_hook: Box::new(|event, err| {
                eprintln!(
                    "mongo log handler: failed to persist event from {}: {}",
                    event.module, err
                );
            }),
        }
    }

    /// Replace the hook invoked when a write fails.
    ///
    /// The default hook writes one line to stderr and carries on, which is
    /// what logging frameworks do when a sink misbehaves.
    pub fn with_error_hook(
        mut self,
        hook: impl Fn(&LogEvent, &(dyn Error + Send + Sync)) + Send + Sync + 'static,
    ) -> Self {
        self.error_hook = Box::new(hook);
        self
    }

    /// Convert a log event into the document shape written to the store.
    ///
    /// The payload renders to a plain string and the timestamp is the
    /// current wall-clock time, not the event's own timestamp. This cannot
    /// fail for any well-formed event.
    pub fn format(&self, event: &LogEvent) -> LogDocument {
        LogDocument {
            timestamp: Utc::now(),
            msg: event.payload.to_string(),
            level: event.level.clone(),
            module: event.module.clone(),
            function: event.function.clone(),
            lineno: event.line,
            thread: event.thread.clone(),
            process: event.process.clone(),
        }
    }

    /// Format and persist one event.
    ///
    /// Any error from the write is handed to the error hook; nothing is
    /// retried and nothing propagates to the caller.
    pub fn emit(&self, event: &LogEvent) {
        if let Err(err) = self.save(&self.format(event)) {
            (self.error_hook)(event, &*err);
        }
    }

    /// Write one document through the sink. Best effort; the errors
    /// returned here are exactly what [`emit`](Self::emit) catches.
    pub fn save(&self, document: &LogDocument) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.sink.insert(document)
    }
}

impl LogHandler for MongoHandler {
    fn handle(&self, event: &LogEvent) {
        self.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ProcessInfo, ThreadInfo};
    use crate::record::MessagePayload;
    use crate::testutil::{CapturingSink, FailingSink};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn worker_event(payload: MessagePayload) -> LogEvent {
        LogEvent {
            timestamp: Utc::now(),
            payload,
            level: "ERROR".to_string(),
            module: "worker".to_string(),
            function: "run".to_string(),
            line: 42,
            thread: ThreadInfo {
                id: 7,
                name: "MainThread".to_string(),
            },
            process: ProcessInfo {
                name: "MainProcess".to_string(),
                id: 100,
            },
        }
    }

    #[test]
    fn format_passes_plain_message_through() {
        let handler = MongoHandler::with_sink(CapturingSink::default());
        let event = worker_event(MessagePayload::Plain("queue drained".to_string()));

        let doc = handler.format(&event);
        assert_eq!(doc.msg, "queue drained");
        assert_eq!(doc.level, "ERROR");
        assert_eq!(doc.module, "worker");
        assert_eq!(doc.function, "run");
        assert_eq!(doc.lineno, 42);
        assert_eq!(doc.thread, event.thread);
        assert_eq!(doc.process, event.process);
    }

    #[test]
    fn format_renders_error_payload() {
        let handler = MongoHandler::with_sink(CapturingSink::default());
        let event = worker_event(MessagePayload::Error {
            type_name: "CustomError".to_string(),
            message: "disk full".to_string(),
            args: vec!["1".to_string(), "2".to_string()],
        });

        assert_eq!(handler.format(&event).msg, "CustomError: disk full, (1, 2)");
    }

    #[test]
    fn format_stamps_wall_clock_time() {
        let handler = MongoHandler::with_sink(CapturingSink::default());
        let mut event = worker_event(MessagePayload::Plain("tick".to_string()));
        // The event's own timestamp is deliberately ignored.
        event.timestamp = Utc::now() - chrono::Duration::hours(3);

        let before = Utc::now();
        let doc = handler.format(&event);
        let after = Utc::now();
        assert!(doc.timestamp >= before && doc.timestamp <= after);
    }

    #[test]
    fn emit_saves_exactly_one_document() {
        let sink = CapturingSink::default();
        let documents = sink.documents();
        let handler = MongoHandler::with_sink(sink);
        let event = worker_event(MessagePayload::Plain("queue drained".to_string()));

        handler.emit(&event);

        let documents = documents.lock().unwrap();
        assert_eq!(documents.len(), 1);
        let doc = &documents[0];
        let formatted = handler.format(&event);
        // Equal except for the timestamp, which is stamped per format call.
        assert_eq!(doc.msg, formatted.msg);
        assert_eq!(doc.level, formatted.level);
        assert_eq!(doc.module, formatted.module);
        assert_eq!(doc.function, formatted.function);
        assert_eq!(doc.lineno, formatted.lineno);
        assert_eq!(doc.thread, formatted.thread);
        assert_eq!(doc.process, formatted.process);
    }

    #[test]
    fn emit_never_propagates_sink_failures() {
        let reported = Arc::new(AtomicUsize::new(0));
        let seen = reported.clone();
        let handler = MongoHandler::with_sink(FailingSink).with_error_hook(move |event, err| {
            assert_eq!(event.module, "worker");
            assert_eq!(err.to_string(), "collection unavailable");
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let event = worker_event(MessagePayload::Plain("queue drained".to_string()));

        handler.emit(&event);
        assert_eq!(reported.load(Ordering::SeqCst), 1);

        handler.emit(&event);
        assert_eq!(reported.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn handle_is_emit() {
        let sink = CapturingSink::default();
        let documents = sink.documents();
        let handler: Arc<dyn LogHandler> = Arc::new(MongoHandler::with_sink(sink));

        handler.handle(&worker_event(MessagePayload::Plain("via trait".to_string())));

        assert_eq!(documents.lock().unwrap().len(), 1);
    }
}
