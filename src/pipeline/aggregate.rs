//! Normalisation of raw model items into finished [`QaRecord`]s.
//!
//! This is where free-form model output gets stamped with provenance
//! (source file, run date, author, pathway) and where the category and
//! excerpt policies are applied. Serial numbers are assigned by the
//! caller, which threads a single counter across every document in the
//! run so the output is globally monotonic and gap-free.

use tracing::warn;

use crate::config::ProcessConfig;
use crate::output::QaRecord;
use crate::pipeline::parse::RawQaItem;
use crate::taxonomy::{self, DEFAULT_CATEGORY};

/// Pathway stage stamped on every record.
pub const PATHWAY_STAGE: &str = "All Stages";
/// Hospitals value stamped on every record.
pub const HOSPITALS: &str = "All";

/// Turn one raw item into a finished record with provenance fields.
pub fn normalize(
    item: RawQaItem,
    sno: u64,
    source_file: &str,
    run_date: &str,
    config: &ProcessConfig,
) -> QaRecord {
    QaRecord {
        sno,
        question: item.question.trim().to_string(),
        answer: item.answer.trim().to_string(),
        category: normalize_category(&item.category),
        pathways: config.pathway.clone(),
        pathway_stage: PATHWAY_STAGE.to_string(),
        source_file: source_file.to_string(),
        excerpt: truncate_excerpt(item.excerpt.trim(), config.excerpt_max_chars),
        hospitals: HOSPITALS.to_string(),
        date: run_date.to_string(),
        author: config.author.clone(),
        reviewed_by: String::new(),
        expiry_date: String::new(),
    }
}

/// Category policy: blank falls back to the default, recognized values pass
/// through, and unrecognized non-empty values are preserved verbatim (after
/// trimming) with a warning so operators can spot taxonomy drift.
fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_CATEGORY.to_string();
    }
    if !taxonomy::is_recognized(trimmed) {
        warn!(category = trimmed, "unrecognized category, keeping verbatim");
    }
    trimmed.to_string()
}

/// Cap the excerpt at `max` characters, cutting on a char boundary.
fn truncate_excerpt(excerpt: &str, max: usize) -> String {
    match excerpt.char_indices().nth(max) {
        Some((byte_idx, _)) => excerpt[..byte_idx].to_string(),
        None => excerpt.to_string(),
    }
}
