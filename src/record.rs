use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt;

use crate::document::{ProcessInfo, ThreadInfo};

/// Message payload of a [`LogEvent`].
///
/// A log call either carries plain text or an error value. Both resolve into
/// a single string at format time; the conversion is total and cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePayload {
    /// Plain message, persisted as-is.
    Plain(String),
    /// Error value, persisted as `"type: message, (args)"`.
    Error {
        /// Unqualified type name of the error value.
        type_name: String,
        /// `Display` rendering of the error itself.
        message: String,
        /// Auxiliary values, rendered as a parenthesized tuple.
        args: Vec<String>,
    },
}

impl MessagePayload {
    /// Build an error payload from any [`std::error::Error`] value.
    ///
    /// The type name is the unqualified name of `E`, the message is the
    /// error's `Display` form, and the args tuple is the `source()` chain,
    /// outermost cause first.
    pub fn from_error<E: Error>(err: &E) -> Self {
        let mut args = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            args.push(cause.to_string());
            source = cause.source();
        }

        MessagePayload::Error {
            type_name: short_type_name::<E>().to_string(),
            message: err.to_string(),
            args,
        }
    }
}

impl fmt::Display for MessagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagePayload::Plain(msg) => f.write_str(msg),
            MessagePayload::Error {
                type_name,
                message,
                args,
            } => write!(f, "{}: {}, ({})", type_name, message, args.join(", ")),
        }
    }
}

impl From<String> for MessagePayload {
    fn from(msg: String) -> Self {
        MessagePayload::Plain(msg)
    }
}

impl From<&str> for MessagePayload {
    fn from(msg: &str) -> Self {
        MessagePayload::Plain(msg.to_string())
    }
}

/// Trailing path segment of `T`'s type name.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// A structured log event, the inbound shape of the `handle(event)` contract.
///
/// [`HandlerLayer`](crate::layer::HandlerLayer) converts `tracing` events
/// into this shape; callers can also construct events directly. All fields
/// are public and always populated.
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// When the event was created. The persisted document is stamped at
    /// format time, not with this value.
    pub timestamp: DateTime<Utc>,
    pub payload: MessagePayload,
    /// Uppercase severity name ("ERROR", "WARN", ...).
    pub level: String,
    /// Originating module path.
    pub module: String,
    /// Originating function name; for tracing events, the enclosing span.
    pub function: String,
    /// Originating source line, 0 when unknown.
    pub line: u32,
    pub thread: ThreadInfo,
    pub process: ProcessInfo,
}

impl LogEvent {
    /// Create an event stamped now, with the calling thread and current
    /// process captured. Source location stays at placeholder values until
    /// [`at`](Self::at) is called.
    pub fn new(level: impl Into<String>, payload: impl Into<MessagePayload>) -> Self {
        LogEvent {
            timestamp: Utc::now(),
            payload: payload.into(),
            level: level.into(),
            module: "<unknown>".to_string(),
            function: "<root>".to_string(),
            line: 0,
            thread: ThreadInfo::current(),
            process: ProcessInfo::current(),
        }
    }

    /// Attach the originating source location.
    pub fn at(
        mut self,
        module: impl Into<String>,
        function: impl Into<String>,
        line: u32,
    ) -> Self {
        self.module = module.into();
        self.function = function.into();
        self.line = line;
        self
    }
}
