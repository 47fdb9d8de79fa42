//! Tab-delimited output writing.
//!
//! The output format is deliberately simple: a header row of the 13 fixed
//! column names followed by one row per record, fields joined by tabs.
//! Because the delimiter carries structure, every field is sanitised —
//! runs of tabs, carriage returns, and newlines collapse to a single
//! space — so the file is always rectangular.
//!
//! Writes are atomic: content goes to a `.tmp` sibling first and is
//! renamed into place, so a crash mid-write never leaves a truncated file
//! at the destination path.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::error::Pdf2QaError;
use crate::output::{QaRecord, OUTPUT_COLUMNS};

static FIELD_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\t\r\n]+").expect("valid regex"));

/// Collapse delimiter and line-break characters so a field stays one cell.
fn sanitize(field: &str) -> String {
    FIELD_BREAKS.replace_all(field, " ").into_owned()
}

/// Render records as tab-delimited text, header row included.
fn render(records: &[QaRecord]) -> String {
    let mut out = String::with_capacity(records.len() * 256 + 256);
    out.push_str(&OUTPUT_COLUMNS.join("\t"));
    out.push('\n');
    for record in records {
        let row: Vec<String> = record.field_values().iter().map(|f| sanitize(f)).collect();
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out
}

/// Write all records to `path` atomically.
///
/// Parent directories are created as needed. The file at `path` is only
/// ever replaced wholesale, never partially written.
pub async fn write_records(path: &Path, records: &[QaRecord]) -> Result<(), Pdf2QaError> {
    let wrap = |source: std::io::Error| Pdf2QaError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(wrap)?;
        }
    }

    let content = render(records);
    let tmp = path.with_extension("tsv.tmp");
    tokio::fs::write(&tmp, content.as_bytes()).await.map_err(wrap)?;
    tokio::fs::rename(&tmp, path).await.map_err(wrap)?;

    info!(
        path = %path.display(),
        records = records.len(),
        "output file written"
    );
    Ok(())
}
