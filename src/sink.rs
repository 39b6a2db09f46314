use crate::document::LogDocument;
use std::error::Error;

/// Destination for [`LogDocument`]s produced by the handler.
///
/// Implementations transport documents to a concrete store (MongoDB in
/// production, in-memory sinks in tests). `insert` runs on whatever thread
/// emitted the log event and is allowed to block it for the duration of
/// the write; nothing in this crate buffers or retries around it.
pub trait DocumentSink: Send + Sync {
    /// Write a single document to the underlying store.
    ///
    /// **Parameters**
    /// - `document`: fully-populated [`LogDocument`] produced by
    ///   [`MongoHandler::format`](crate::handler::MongoHandler::format).
    ///
    /// **Returns**
    /// - `Ok(())` if the store accepted the document.
    /// - `Err(..)` on any driver, serialization or connectivity failure.
    ///   The handler reports the error through its hook and drops the
    ///   document; it is never retried.
    fn insert(&self, document: &LogDocument) -> Result<(), Box<dyn Error + Send + Sync>>;
}
