//! In-memory sinks shared by the unit tests.

use crate::document::LogDocument;
use crate::sink::DocumentSink;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Sink that records every document it receives.
#[derive(Clone, Default)]
pub(crate) struct CapturingSink {
    documents: Arc<Mutex<Vec<LogDocument>>>,
}

impl CapturingSink {
    /// Handle to the recorded documents, usable after the sink is moved
    /// into a handler.
    pub(crate) fn documents(&self) -> Arc<Mutex<Vec<LogDocument>>> {
        self.documents.clone()
    }
}

impl DocumentSink for CapturingSink {
    fn insert(&self, document: &LogDocument) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.documents.lock().unwrap().push(document.clone());
        Ok(())
    }
}

/// Sink that fails every insert.
pub(crate) struct FailingSink;

impl DocumentSink for FailingSink {
    fn insert(&self, _document: &LogDocument) -> Result<(), Box<dyn Error + Send + Sync>> {
        Err("collection unavailable".into())
    }
}
