//! Chunking: split extracted text into bounded segments on paragraph
//! boundaries.
//!
//! ## Why never split inside a paragraph?
//!
//! The generation step needs semantically whole units — a question grounded
//! in half a sentence is worthless. A single paragraph larger than the limit
//! is therefore kept whole in its own chunk, deliberately exceeding the
//! nominal cap. The prompt stage's character budget is the backstop against
//! a truly pathological paragraph.

use crate::pipeline::extract::PAGE_SEPARATOR;

/// Split `text` into chunks of at most `max_chunk_size` characters,
/// accumulating whole paragraphs greedily.
///
/// Paragraphs are delimited by a double newline and rejoined with the same
/// separator, so concatenating the chunks (with separators) reconstructs a
/// paragraph-equivalent of the input. Empty or whitespace-only input yields
/// zero chunks — the caller must treat that as insufficient content, not an
/// empty success.
pub fn chunk_paragraphs(text: &str, max_chunk_size: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_size = 0usize;

    for para in text.split(PAGE_SEPARATOR) {
        let para_size = para.chars().count();

        if current_size + para_size > max_chunk_size && !current.is_empty() {
            chunks.push(current.join(PAGE_SEPARATOR));
            current = vec![para];
            current_size = para_size;
        } else {
            current.push(para);
            current_size += para_size;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(PAGE_SEPARATOR));
    }

    chunks
}
