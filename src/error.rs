//! Error types for the pdf2qa library.
//!
//! Three distinct error types reflect three distinct failure scopes:
//!
//! * [`Pdf2QaError`] — **Fatal**: the run cannot proceed or produced nothing
//!   (bad input directory, generator not configured, empty run). Returned as
//!   `Err(Pdf2QaError)` from the top-level `process_*` functions.
//!
//! * [`DocumentError`] — **Non-fatal, per document**: one document could not
//!   contribute records (unreadable bytes, too little text, no chunks). The
//!   document is skipped and the run continues. Stored inside
//!   [`crate::output::DocumentResult`].
//!
//! * [`ChunkError`] — **Non-fatal, per chunk**: one generation call failed or
//!   timed out. The chunk yields zero items and the chunk loop continues.
//!   Stored inside [`crate::output::DocumentResult`].
//!
//! The separation lets callers decide their own tolerance: abort when any
//! document is skipped, log and continue, or collect everything for a
//! post-run report. Malformed model output is not an error type at all — the
//! parser degrades it to zero items (see [`crate::pipeline::parse`]).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2qa library.
///
/// Document- and chunk-level failures use [`DocumentError`] / [`ChunkError`]
/// and are stored in [`crate::output::DocumentResult`] rather than
/// propagated here.
#[derive(Debug, Error)]
pub enum Pdf2QaError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input path was not found.
    #[error("Input not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Input path exists but is not a directory.
    #[error("'{path}' is not a directory\nPoint --input at a directory of .pdf/.txt/.md documents.")]
    NotADirectory { path: PathBuf },

    /// Directory exists but holds no documents in a supported format.
    #[error("No documents found in '{dir}'\nSupported extensions: .pdf, .txt, .md")]
    NoDocuments { dir: PathBuf },

    /// Failed to read the directory listing.
    #[error("Failed to read directory '{dir}': {source}")]
    ReadDirFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Generator errors ──────────────────────────────────────────────────
    /// No generator could be constructed (missing API key etc.).
    #[error("Generation endpoint is not configured.\n{hint}")]
    GeneratorNotConfigured { hint: String },

    // ── Run errors ────────────────────────────────────────────────────────
    /// Every document yielded zero records; the output would be empty.
    ///
    /// No output file is written when this is returned.
    #[error("No Q&A records were produced across {documents} document(s).\nNothing was written. Check the per-document log entries above for skip reasons.")]
    EmptyRun { documents: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error explaining why one document was skipped.
///
/// Stored in [`crate::output::DocumentResult`] when a document contributes
/// no records. The run continues with the remaining documents; only a fully
/// empty run escalates to [`Pdf2QaError::EmptyRun`].
#[derive(Debug, Clone, Error, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The document bytes could not be turned into text at all.
    #[error("'{file}': text extraction failed: {detail}")]
    ExtractionFailed { file: String, detail: String },

    /// Text came out, but below the minimum useful length.
    #[error("'{file}': insufficient text ({chars} chars, minimum {min})")]
    InsufficientText {
        file: String,
        chars: usize,
        min: usize,
    },

    /// Chunking produced nothing to send to the generator.
    #[error("'{file}': no chunks produced from extracted text")]
    NoChunks { file: String },
}

/// A non-fatal error for a single chunk's generation call.
///
/// The chunk contributes zero items; the chunk loop continues.
#[derive(Debug, Clone, Error, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ChunkError {
    /// The generation endpoint returned an error.
    #[error("chunk {chunk}: generation failed: {detail}")]
    Generation { chunk: usize, detail: String },

    /// The generation call exceeded the configured timeout.
    #[error("chunk {chunk}: generation timed out after {secs}s")]
    Timeout { chunk: usize, secs: u64 },
}
