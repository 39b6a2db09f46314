use crate::document::LogDocument;
use crate::sink::DocumentSink;
use std::error::Error;

/// A sink that simply drops all documents.
///
/// Useful for measuring the overhead of the handler itself without any
/// external I/O, and for unit tests that don't care about persistence.
#[derive(Clone, Default)]
pub struct NoopSink;

impl DocumentSink for NoopSink {
    fn insert(&self, _document: &LogDocument) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
