//! Pipeline stages for document-to-Q&A extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. a different chunking policy) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ chunk ──▶ prompt ──▶ generate ──▶ parse ──▶ aggregate
//! (bytes→text) (paras)  (request)  (LLM call)   (items)   (records)
//! ```
//!
//! 1. [`extract`]   — turn document bytes into plain text; the PDF parse
//!    runs in `spawn_blocking`
//! 2. [`chunk`]     — split text into bounded segments on paragraph
//!    boundaries
//! 3. [`prompt`]    — build the structured-generation request for one chunk
//! 4. [`generate`]  — drive one chunk end-to-end (request → call → parse);
//!    the only stage with network I/O, and the stage that absorbs failures
//! 5. [`parse`]     — tolerant extraction of the JSON item array from raw
//!    model text
//! 6. [`aggregate`] — normalise items into canonical records with sno and
//!    provenance stamps

pub mod aggregate;
pub mod chunk;
pub mod extract;
pub mod generate;
pub mod parse;
pub mod prompt;
