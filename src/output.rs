//! Output types: canonical Q&A records, per-document results, and run totals.
//!
//! Everything here is `Serialize` so a whole run can be dumped as JSON for
//! machine consumption (`--json-report` in the CLI) and inspected in tests.

use crate::error::{ChunkError, DocumentError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column headers of the tab-delimited output file, in the exact order the
/// downstream knowledge-base import expects them.
///
/// The somewhat baroque names (word limits, sheet references) are part of the
/// import contract and must not be "cleaned up".
pub const OUTPUT_COLUMNS: [&str; 13] = [
    "Sno.",
    "Question (100 words)",
    "Answer (Max 2000 words)",
    "Question Category (Refer Sheet 2)",
    "Applicable to Pathways",
    "Pathway Stage",
    "Source of Data (Preferable URL)",
    "Actual Excerpt from the Source Data",
    "Hospitals Applicable",
    "Date",
    "Author Name",
    "Reviewed By",
    "Expiry Date",
];

/// One canonical Q&A record — one row of the output file.
///
/// Field order matches [`OUTPUT_COLUMNS`]. `sno` is 1-based and globally
/// monotonic across every document in a run; it is assigned by the
/// aggregation stage and never reused or reset. `reviewed_by` and
/// `expiry_date` are left empty for human reviewers downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRecord {
    pub sno: u64,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub pathways: String,
    pub pathway_stage: String,
    pub source_file: String,
    pub excerpt: String,
    pub hospitals: String,
    pub date: String,
    pub author: String,
    pub reviewed_by: String,
    pub expiry_date: String,
}

impl QaRecord {
    /// Field values in [`OUTPUT_COLUMNS`] order, `sno` rendered as text.
    ///
    /// Used by the sink; kept here so the column list and the field order
    /// live in the same file.
    pub fn field_values(&self) -> [String; 13] {
        [
            self.sno.to_string(),
            self.question.clone(),
            self.answer.clone(),
            self.category.clone(),
            self.pathways.clone(),
            self.pathway_stage.clone(),
            self.source_file.clone(),
            self.excerpt.clone(),
            self.hospitals.clone(),
            self.date.clone(),
            self.author.clone(),
            self.reviewed_by.clone(),
            self.expiry_date.clone(),
        ]
    }
}

/// What happened to one document during a run.
///
/// A document that contributed records has `skipped: None`; a skipped
/// document carries the reason and zero records. Chunk failures are recorded
/// individually — a document can produce records *and* have failed chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    /// File name (not the full path) — also stamped into each record.
    pub file: String,
    /// Number of chunks the extracted text was split into (0 when skipped).
    pub chunks: usize,
    /// Per-chunk failures. Each one cost the run up to
    /// `questions_per_chunk` records but never aborted the document.
    pub failed_chunks: Vec<ChunkError>,
    /// Records this document contributed to the run.
    pub records: usize,
    /// Wall-clock time spent on this document.
    pub duration_ms: u64,
    /// Why the document was skipped, if it was.
    pub skipped: Option<DocumentError>,
}

/// Whole-run statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Every document enumerated for the run, skipped ones included.
    pub total_documents: usize,
    /// Documents that contributed zero records (see their `skipped` reason).
    pub skipped_documents: usize,
    /// Chunks sent to the generation endpoint.
    pub total_chunks: usize,
    /// Chunks whose generation call failed or timed out.
    pub failed_chunks: usize,
    /// Records produced across the run.
    pub total_records: usize,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
}

/// Per-category breakdown plus run averages, recomputed at end of run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Record count per category label, sorted by category name.
    pub per_category: BTreeMap<String, usize>,
    pub total_records: usize,
    pub total_documents: usize,
    /// `total_records / total_documents`; 0.0 for an empty enumeration.
    pub avg_records_per_document: f64,
}

impl RunSummary {
    /// Derive the summary from the final record list.
    ///
    /// `total_documents` counts every enumerated document, including skipped
    /// ones, so the average reflects the whole corpus rather than only the
    /// documents that happened to succeed.
    pub fn from_records(records: &[QaRecord], total_documents: usize) -> Self {
        let mut per_category: BTreeMap<String, usize> = BTreeMap::new();
        for record in records {
            *per_category.entry(record.category.clone()).or_insert(0) += 1;
        }
        let avg = if total_documents == 0 {
            0.0
        } else {
            records.len() as f64 / total_documents as f64
        };
        Self {
            per_category,
            total_records: records.len(),
            total_documents,
            avg_records_per_document: avg,
        }
    }
}

/// Complete result of a run: the records plus everything needed to report on
/// how they were produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    /// All records, in sno order (1..=total_records, gap-free).
    pub records: Vec<QaRecord>,
    /// Per-document results, in processing order.
    pub documents: Vec<DocumentResult>,
    pub stats: RunStats,
    pub summary: RunSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sno: u64, category: &str) -> QaRecord {
        QaRecord {
            sno,
            question: format!("Q{sno}"),
            answer: format!("A{sno}"),
            category: category.to_string(),
            pathways: "Breast Cancer".into(),
            pathway_stage: "All Stages".into(),
            source_file: "leaflet.pdf".into(),
            excerpt: String::new(),
            hospitals: "All".into(),
            date: "2026-08-30".into(),
            author: "Healthcare AI Team".into(),
            reviewed_by: String::new(),
            expiry_date: String::new(),
        }
    }

    #[test]
    fn field_values_align_with_columns() {
        let values = record(7, "MEDICATION").field_values();
        assert_eq!(values.len(), OUTPUT_COLUMNS.len());
        assert_eq!(values[0], "7");
        assert_eq!(values[3], "MEDICATION");
        assert_eq!(values[6], "leaflet.pdf");
        assert_eq!(values[11], ""); // Reviewed By stays empty
    }

    #[test]
    fn summary_counts_per_category() {
        let records = vec![
            record(1, "MEDICATION"),
            record(2, "SYMPTOMS"),
            record(3, "MEDICATION"),
        ];
        let summary = RunSummary::from_records(&records, 2);
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.per_category["MEDICATION"], 2);
        assert_eq!(summary.per_category["SYMPTOMS"], 1);
        assert!((summary.avg_records_per_document - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_of_empty_enumeration_has_zero_average() {
        let summary = RunSummary::from_records(&[], 0);
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.avg_records_per_document, 0.0);
        assert!(summary.per_category.is_empty());
    }

    #[test]
    fn summary_categories_iterate_sorted() {
        let records = vec![
            record(1, "SYMPTOMS"),
            record(2, "GENERAL"),
            record(3, "MEDICATION"),
        ];
        let summary = RunSummary::from_records(&records, 3);
        let names: Vec<&str> = summary.per_category.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["GENERAL", "MEDICATION", "SYMPTOMS"]);
    }

    #[test]
    fn run_output_round_trips_through_json() {
        let records = vec![record(1, "LIFESTYLE")];
        let output = RunOutput {
            summary: RunSummary::from_records(&records, 1),
            records,
            documents: vec![DocumentResult {
                file: "leaflet.pdf".into(),
                chunks: 1,
                failed_chunks: vec![],
                records: 1,
                duration_ms: 12,
                skipped: None,
            }],
            stats: RunStats {
                total_documents: 1,
                total_chunks: 1,
                total_records: 1,
                ..Default::default()
            },
        };
        let json = serde_json::to_string_pretty(&output).unwrap();
        let back: RunOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.records, output.records);
        assert_eq!(back.stats.total_records, 1);
    }
}
