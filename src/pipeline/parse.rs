//! Tolerant parsing of raw model output into Q&A items.
//!
//! Model output is untrusted external input: it may wrap the JSON array in
//! prose ("Here are the pairs: …"), fence it in markdown, truncate it, or
//! not contain an array at all. The contract is **never crash, always
//! degrade to fewer records** — every malformed shape maps to an empty (or
//! shorter) item list plus a warning, never an error the caller must handle.

use serde_json::Value;
use tracing::warn;

/// One proposed Q&A pair as the model returned it.
///
/// Fields are free-form and unvalidated — the category may be outside the
/// taxonomy and any field may be empty. Normalisation happens in
/// [`crate::pipeline::aggregate`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawQaItem {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub excerpt: String,
}

/// Extract Q&A items from raw model text.
///
/// Locates the first `[` and the last `]`, decodes that span as a JSON
/// array, and keeps every object element — missing fields become empty
/// strings, non-object elements are dropped individually. Returns an empty
/// vec (with a warning logged) when no well-formed array is present.
pub fn parse_items(raw: &str) -> Vec<RawQaItem> {
    let span = match array_span(raw) {
        Some(span) => span,
        None => {
            warn!("no JSON array found in model output ({} chars)", raw.len());
            return Vec::new();
        }
    };

    let value: Value = match serde_json::from_str(span) {
        Ok(v) => v,
        Err(e) => {
            warn!("model output span is not valid JSON: {e}");
            return Vec::new();
        }
    };

    let Some(elements) = value.as_array() else {
        // Unreachable with the span rule, but the contract is no-crash.
        warn!("decoded model output is not an array");
        return Vec::new();
    };

    let mut items = Vec::with_capacity(elements.len());
    for (idx, element) in elements.iter().enumerate() {
        match element.as_object() {
            Some(obj) => items.push(RawQaItem {
                question: string_field(obj, "question"),
                answer: string_field(obj, "answer"),
                category: string_field(obj, "category"),
                excerpt: string_field(obj, "excerpt"),
            }),
            None => warn!("dropping non-object element {idx} in model output"),
        }
    }
    items
}

/// The `first '[' ..= last ']'` span, or `None` when absent or inverted.
fn array_span(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    // Both '[' and ']' are single-byte, so the slice is boundary-safe.
    (start < end).then(|| &raw[start..=end])
}

/// A string field, or empty when the key is missing or not a string.
fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
