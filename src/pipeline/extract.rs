//! Text acquisition: turn raw document bytes into plain text.
//!
//! ## Why spawn_blocking?
//!
//! The PDF text parse is CPU-bound and synchronous. Running it on the
//! blocking thread pool keeps the Tokio worker threads free while a large
//! leaflet is being parsed.
//!
//! ## Per-page tolerance
//!
//! Pages are joined with a double newline so paragraph boundaries survive
//! into the chunking stage. A page whose extracted text is blank contributes
//! nothing (no separator either). Only an unreadable container — not a bad
//! page — fails the document.

use crate::error::DocumentError;
use std::path::Path;
use tracing::{debug, warn};

/// Separator between extracted pages; doubles as the paragraph delimiter
/// the chunker splits on.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// The supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Extracted via the PDF text library.
    Pdf,
    /// Already plain text — acquisition is the identity transform.
    Text,
}

impl DocumentKind {
    /// Classify a path by extension, case-insensitively.
    ///
    /// Returns `None` for unsupported extensions; the caller reports those
    /// as an extraction failure for that document.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" | "md" | "markdown" => Some(DocumentKind::Text),
            _ => None,
        }
    }
}

/// Extract plain text from document bytes (blocking).
///
/// For PDFs, per-page text is joined with [`PAGE_SEPARATOR`], skipping
/// blank pages. Text formats pass through as UTF-8.
///
/// Page tolerance ends at the container: the PDF library parses all pages
/// in one call, so a page corrupt enough to error out (rather than extract
/// as blank) fails the whole document, not just that page.
pub fn extract_text(bytes: &[u8], kind: DocumentKind, file: &str) -> Result<String, DocumentError> {
    match kind {
        DocumentKind::Pdf => {
            let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
                DocumentError::ExtractionFailed {
                    file: file.to_string(),
                    detail: e.to_string(),
                }
            })?;
            let page_count = pages.len();
            let text = pages
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .collect::<Vec<_>>()
                .join(PAGE_SEPARATOR);
            debug!(file, pages = page_count, chars = text.len(), "extracted PDF text");
            Ok(text)
        }
        DocumentKind::Text => match String::from_utf8(bytes.to_vec()) {
            Ok(text) => Ok(text),
            Err(e) => Err(DocumentError::ExtractionFailed {
                file: file.to_string(),
                detail: format!("not valid UTF-8: {e}"),
            }),
        },
    }
}

/// Read a document from disk and extract its text.
///
/// The blocking parse runs on the blocking thread pool so a large PDF does
/// not stall the async runtime.
pub async fn acquire(path: &Path) -> Result<String, DocumentError> {
    let file = file_name(path);

    let Some(kind) = DocumentKind::from_path(path) else {
        warn!(file, "unsupported document extension");
        return Err(DocumentError::ExtractionFailed {
            file,
            detail: "unsupported extension (expected .pdf, .txt, or .md)".to_string(),
        });
    };

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DocumentError::ExtractionFailed {
            file: file.clone(),
            detail: format!("read failed: {e}"),
        })?;

    let task_file = file.clone();
    tokio::task::spawn_blocking(move || extract_text(&bytes, kind, &task_file))
        .await
        .map_err(|e| DocumentError::ExtractionFailed {
            file,
            detail: format!("extraction task panicked: {e}"),
        })?
}

/// The file name component of a path, for logs and provenance stamps.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
