//! Progress reporting hooks for long-running batch processing.
//!
//! A run over a directory of PDFs can take minutes; callers that drive a
//! terminal UI (or a web frontend) need to know where the run is without
//! the library depending on any particular UI crate. The seam is a trait
//! with no-op defaults: implement only the events you care about and pass
//! an `Arc` of it through [`crate::config::ProcessConfig`].

use std::sync::Arc;

/// Observer for batch-processing events.
///
/// All methods have empty default bodies. Calls arrive sequentially from
/// the processing loop; implementations should return quickly and must not
/// block on I/O.
pub trait ProcessProgressCallback: Send + Sync {
    /// A run over `total_documents` documents is starting.
    fn on_run_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Document `index` (1-based) of `total` is about to be processed.
    fn on_document_start(&self, index: usize, total: usize, file: &str) {
        let _ = (index, total, file);
    }

    /// Document `index` finished and contributed `records` records.
    fn on_document_complete(&self, index: usize, total: usize, file: &str, records: usize) {
        let _ = (index, total, file, records);
    }

    /// Document `index` was skipped; `reason` is the operator-facing detail.
    fn on_document_skipped(&self, index: usize, total: usize, file: &str, reason: &str) {
        let _ = (index, total, file, reason);
    }

    /// Chunk `chunk` (1-based) of `total_chunks` in `file` produced `items` items.
    fn on_chunk_complete(&self, file: &str, chunk: usize, total_chunks: usize, items: usize) {
        let _ = (file, chunk, total_chunks, items);
    }

    /// The whole run finished with `total_records` records across `total_documents`.
    fn on_run_complete(&self, total_documents: usize, total_records: usize) {
        let _ = (total_documents, total_records);
    }
}

/// Callback that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressCallback;

impl ProcessProgressCallback for NoopProgressCallback {}

/// Shared handle to a progress callback.
pub type ProgressCallback = Arc<dyn ProcessProgressCallback>;
