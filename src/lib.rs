//! # pdf2qa
//!
//! Turn a directory of medical patient-information documents (PDF, plain
//! text, Markdown) into a reviewed-ready, tab-delimited sheet of structured
//! Q&A records, using any OpenAI-compatible chat-completions endpoint for
//! generation.
//!
//! ## Pipeline
//!
//! ```text
//!   directory ──► extract ──► chunk ──► prompt ──► generate ──► parse ──► aggregate ──► sink
//!                (pdf/txt)  (paragraph  (template + (one API     (tolerant  (categories,  (atomic
//!                            greedy)    taxonomy)   call/chunk)  JSON)      sno, dates)   .tsv)
//! ```
//!
//! Failures narrow, never widen: a malformed model reply costs one chunk its
//! items, a broken document is skipped, and only whole-run problems — bad
//! input directory, no generator, zero records overall — abort the run.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pdf2qa::{process_directory_to_file, ProcessConfig};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pdf2qa::Pdf2QaError> {
//!     let config = ProcessConfig::builder()
//!         .model("gpt-4o-mini")
//!         .questions_per_chunk(15)
//!         .build()?;
//!
//!     let run = process_directory_to_file(
//!         Path::new("leaflets/"),
//!         Path::new("qa_records.tsv"),
//!         &config,
//!     )
//!     .await?;
//!
//!     println!("{} records from {} documents", run.stats.total_records, run.stats.total_documents);
//!     Ok(())
//! }
//! ```
//!
//! Tests and offline runs inject a [`MockGenerator`] through
//! [`ProcessConfigBuilder::generator`] instead of hitting an endpoint.
//!
//! ## Feature flags
//!
//! | Feature | Default | What it adds |
//! |---------|---------|--------------|
//! | `cli`   | on      | The `pdf2qa` binary (clap, indicatif, anyhow, tracing-subscriber) |

pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod prompts;
pub mod sink;
pub mod taxonomy;

pub use config::{ProcessConfig, ProcessConfigBuilder, SAMPLE_DOCUMENT_LIMIT};
pub use error::{ChunkError, DocumentError, Pdf2QaError};
pub use llm::{
    GenerationError, GenerationRequest, MockGenerator, OpenAiGenerator, QaGenerator,
    GENERATION_TEMPERATURE,
};
pub use output::{
    DocumentResult, QaRecord, RunOutput, RunStats, RunSummary, OUTPUT_COLUMNS,
};
pub use process::{
    enumerate_documents, process_directory, process_directory_to_file, process_document,
    process_documents,
};
pub use progress::{NoopProgressCallback, ProcessProgressCallback, ProgressCallback};
