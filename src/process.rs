//! High-level orchestration: directory in, Q&A records out.
//!
//! Entry points, from narrowest to widest:
//!
//! * [`process_document`] — one file, starting from a given serial number.
//! * [`process_documents`] — an explicit file list, serial numbers threaded
//!   across the whole run.
//! * [`process_directory`] — enumerate a directory, then process.
//! * [`process_directory_to_file`] — process a directory and write the
//!   tab-delimited output file.
//!
//! Failure policy: a document that cannot contribute is skipped (recorded in
//! its [`DocumentResult`]), a chunk that fails yields zero items, and only
//! whole-run conditions — bad input, unconfigured generator, zero records
//! overall — surface as `Err`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::{ProcessConfig, SAMPLE_DOCUMENT_LIMIT};
use crate::error::Pdf2QaError;
use crate::llm::{OpenAiGenerator, QaGenerator};
use crate::output::{DocumentResult, QaRecord, RunOutput, RunStats, RunSummary};
use crate::pipeline::aggregate::normalize;
use crate::pipeline::chunk::chunk_paragraphs;
use crate::pipeline::extract::{self, DocumentKind};
use crate::pipeline::generate::process_chunk;
use crate::sink;

/// Build the generator a run will use.
///
/// An injected generator wins; otherwise an HTTP client is constructed from
/// `model`/`base_url` and the API key from config or `OPENAI_API_KEY`.
fn resolve_generator(config: &ProcessConfig) -> Result<Arc<dyn QaGenerator>, Pdf2QaError> {
    if let Some(generator) = &config.generator {
        return Ok(Arc::clone(generator));
    }
    let api_key = match &config.api_key {
        Some(key) => key.clone(),
        None => std::env::var("OPENAI_API_KEY").map_err(|_| Pdf2QaError::GeneratorNotConfigured {
            hint: "Set OPENAI_API_KEY, pass an API key in the config, or inject a generator."
                .to_string(),
        })?,
    };
    Ok(Arc::new(OpenAiGenerator::new(
        &config.model,
        &config.base_url,
        api_key,
    )))
}

/// Today's date in the form stamped into every record.
fn run_date() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Process one document with an already-resolved generator.
///
/// Never fails: extraction problems become a skip recorded on the returned
/// [`DocumentResult`], chunk failures become entries in `failed_chunks`.
async fn process_document_with(
    generator: &Arc<dyn QaGenerator>,
    path: &Path,
    start_sno: u64,
    date: &str,
    config: &ProcessConfig,
) -> (Vec<QaRecord>, DocumentResult) {
    let file = extract::file_name(path);
    let started = Instant::now();

    let skip = |reason: crate::error::DocumentError, started: Instant| {
        warn!("document skipped: {reason}");
        DocumentResult {
            file: extract::file_name(path),
            chunks: 0,
            failed_chunks: Vec::new(),
            records: 0,
            duration_ms: started.elapsed().as_millis() as u64,
            skipped: Some(reason),
        }
    };

    // ── Step 1: extract text ─────────────────────────────────────────────
    let text = match extract::acquire(path).await {
        Ok(text) => text,
        Err(e) => return (Vec::new(), skip(e, started)),
    };
    let chars = text.chars().count();
    if chars < config.min_text_chars {
        let reason = crate::error::DocumentError::InsufficientText {
            file: file.clone(),
            chars,
            min: config.min_text_chars,
        };
        return (Vec::new(), skip(reason, started));
    }

    // ── Step 2: chunk ────────────────────────────────────────────────────
    let chunks = chunk_paragraphs(&text, config.max_chunk_size);
    if chunks.is_empty() {
        let reason = crate::error::DocumentError::NoChunks { file: file.clone() };
        return (Vec::new(), skip(reason, started));
    }
    info!(file = %file, chars, chunks = chunks.len(), "document chunked");

    // ── Step 3: generate, parse, normalise — chunk by chunk ──────────────
    let mut records = Vec::new();
    let mut failed_chunks = Vec::new();
    let mut sno = start_sno;
    for (i, chunk_text) in chunks.iter().enumerate() {
        let outcome = process_chunk(generator, i + 1, chunk_text, &file, config).await;
        if let Some(e) = outcome.error {
            failed_chunks.push(e);
        }
        let item_count = outcome.items.len();
        for item in outcome.items {
            records.push(normalize(item, sno, &file, date, config));
            sno += 1;
        }
        if let Some(cb) = &config.progress_callback {
            cb.on_chunk_complete(&file, i + 1, chunks.len(), item_count);
        }
    }

    let result = DocumentResult {
        file,
        chunks: chunks.len(),
        failed_chunks,
        records: records.len(),
        duration_ms: started.elapsed().as_millis() as u64,
        skipped: None,
    };
    (records, result)
}

/// Process a single document, assigning serial numbers from `start_sno`.
///
/// Resolves a generator per the config. Skips (`InsufficientText` etc.) are
/// reported on the [`DocumentResult`], not as `Err`.
pub async fn process_document(
    path: &Path,
    start_sno: u64,
    config: &ProcessConfig,
) -> Result<(Vec<QaRecord>, DocumentResult), Pdf2QaError> {
    let generator = resolve_generator(config)?;
    let date = run_date();
    Ok(process_document_with(&generator, path, start_sno, &date, config).await)
}

/// Process an explicit list of documents into a [`RunOutput`].
///
/// Serial numbers are threaded across the whole list: the first record of
/// document N+1 continues where document N left off, so the final record
/// list is 1..=total, gap-free. Returns [`Pdf2QaError::EmptyRun`] — and
/// writes nothing — when no document yields any record.
pub async fn process_documents(
    paths: &[PathBuf],
    config: &ProcessConfig,
) -> Result<RunOutput, Pdf2QaError> {
    let generator = resolve_generator(config)?;
    let date = run_date();
    let run_started = Instant::now();
    let total = paths.len();

    info!(documents = total, model = %config.model, "starting run");
    if let Some(cb) = &config.progress_callback {
        cb.on_run_start(total);
    }

    let mut records: Vec<QaRecord> = Vec::new();
    let mut documents: Vec<DocumentResult> = Vec::new();

    for (i, path) in paths.iter().enumerate() {
        let file = extract::file_name(path);
        if let Some(cb) = &config.progress_callback {
            cb.on_document_start(i + 1, total, &file);
        }

        let start_sno = records.len() as u64 + 1;
        let (doc_records, result) =
            process_document_with(&generator, path, start_sno, &date, config).await;

        if let Some(cb) = &config.progress_callback {
            match &result.skipped {
                Some(reason) => cb.on_document_skipped(i + 1, total, &file, &reason.to_string()),
                None => cb.on_document_complete(i + 1, total, &file, doc_records.len()),
            }
        }

        records.extend(doc_records);
        documents.push(result);
    }

    if records.is_empty() {
        return Err(Pdf2QaError::EmptyRun { documents: total });
    }

    let stats = RunStats {
        total_documents: total,
        skipped_documents: documents.iter().filter(|d| d.skipped.is_some()).count(),
        total_chunks: documents.iter().map(|d| d.chunks).sum(),
        failed_chunks: documents.iter().map(|d| d.failed_chunks.len()).sum(),
        total_records: records.len(),
        total_duration_ms: run_started.elapsed().as_millis() as u64,
    };
    let summary = RunSummary::from_records(&records, total);

    info!(
        records = stats.total_records,
        skipped = stats.skipped_documents,
        failed_chunks = stats.failed_chunks,
        duration_ms = stats.total_duration_ms,
        "run complete"
    );
    if let Some(cb) = &config.progress_callback {
        cb.on_run_complete(total, stats.total_records);
    }

    Ok(RunOutput {
        records,
        documents,
        stats,
        summary,
    })
}

/// Enumerate the supported documents in `dir`, sorted by file name.
///
/// In sample mode the sorted list is truncated to
/// [`SAMPLE_DOCUMENT_LIMIT`] documents.
pub fn enumerate_documents(dir: &Path, config: &ProcessConfig) -> Result<Vec<PathBuf>, Pdf2QaError> {
    if !dir.exists() {
        return Err(Pdf2QaError::InputNotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(Pdf2QaError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|source| Pdf2QaError::ReadDirFailed {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && DocumentKind::from_path(p).is_some())
        .collect();
    paths.sort_by_key(|p| extract::file_name(p));

    if config.sample && paths.len() > SAMPLE_DOCUMENT_LIMIT {
        info!(
            limit = SAMPLE_DOCUMENT_LIMIT,
            available = paths.len(),
            "sample mode: truncating document list"
        );
        paths.truncate(SAMPLE_DOCUMENT_LIMIT);
    }

    if paths.is_empty() {
        return Err(Pdf2QaError::NoDocuments {
            dir: dir.to_path_buf(),
        });
    }
    Ok(paths)
}

/// Process every supported document found in `dir`.
pub async fn process_directory(dir: &Path, config: &ProcessConfig) -> Result<RunOutput, Pdf2QaError> {
    let paths = enumerate_documents(dir, config)?;
    process_documents(&paths, config).await
}

/// Process a directory and write the records to `output` as tab-delimited
/// text. Nothing is written when the run errors (including an empty run).
pub async fn process_directory_to_file(
    dir: &Path,
    output: &Path,
    config: &ProcessConfig,
) -> Result<RunOutput, Pdf2QaError> {
    let run = process_directory(dir, config).await?;
    sink::write_records(output, &run.records).await?;
    Ok(run)
}
