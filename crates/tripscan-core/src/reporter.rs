//! Reporter trait for dependency injection
//!
//! This trait allows the fan-out and session logic to report progress without
//! being coupled to a specific terminal or GUI front-end.

use std::time::Duration;
use tripscan_schema::{Destination, SourceId};

use crate::session::SearchSummary;

/// Receives progress from a search as it happens.
pub trait Reporter: Send + Sync {
    /// A search has been dispatched to the given sources.
    fn search_started(&self, destination: &Destination, sources: &[SourceId]);

    /// A source moved to `loading`.
    fn source_loading(&self, source: &SourceId);

    /// A source settled with a well-formed batch.
    fn source_succeeded(&self, source: &SourceId, count: usize, elapsed: Duration);

    /// A source settled with an error.
    fn source_failed(&self, source: &SourceId, reason: &str, elapsed: Duration);

    /// All sources settled and the canonical set was stored.
    fn search_finished(&self, summary: &SearchSummary);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn search_started(&self, destination: &Destination, sources: &[SourceId]) {
        (**self).search_started(destination, sources);
    }
    fn source_loading(&self, source: &SourceId) {
        (**self).source_loading(source);
    }
    fn source_succeeded(&self, source: &SourceId, count: usize, elapsed: Duration) {
        (**self).source_succeeded(source, count, elapsed);
    }
    fn source_failed(&self, source: &SourceId, reason: &str, elapsed: Duration) {
        (**self).source_failed(source, reason, elapsed);
    }
    fn search_finished(&self, summary: &SearchSummary) {
        (**self).search_finished(summary);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn error(&self, msg: &str) {
        (**self).error(msg);
    }
}

impl std::fmt::Debug for dyn Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Reporter")
    }
}

/// A no-op reporter for silent operations (e.g., `--json` output, testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn search_started(&self, _: &Destination, _: &[SourceId]) {}
    fn source_loading(&self, _: &SourceId) {}
    fn source_succeeded(&self, _: &SourceId, _: usize, _: Duration) {}
    fn source_failed(&self, _: &SourceId, _: &str, _: Duration) {}
    fn search_finished(&self, _: &SearchSummary) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, _: &str) {}
}
