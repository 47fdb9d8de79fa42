//! Request building: turn one chunk into a structured-generation request.
//!
//! The chunk text is truncated to the configured character budget before it
//! is embedded — a lossy cap that protects the endpoint from oversized
//! payloads. Content beyond the budget is simply not considered for that
//! request. With default settings the budget equals the chunk size, so the
//! cap only bites on oversized single paragraphs the chunker kept whole.

use crate::config::ProcessConfig;
use crate::llm::GenerationRequest;
use crate::prompts;
use tracing::debug;

/// Build the generation request for one chunk.
pub fn build_request(
    chunk_text: &str,
    source_name: &str,
    target_count: usize,
    config: &ProcessConfig,
) -> GenerationRequest {
    let budgeted = truncate_chars(chunk_text, config.prompt_char_budget);
    if budgeted.len() < chunk_text.len() {
        debug!(
            source = source_name,
            budget = config.prompt_char_budget,
            dropped = chunk_text.chars().count() - config.prompt_char_budget,
            "chunk truncated to prompt budget"
        );
    }

    GenerationRequest {
        prompt: prompts::qa_generation_prompt(source_name, budgeted, target_count),
        max_tokens: config.max_output_tokens,
    }
}

/// Truncate to at most `max_chars` characters, on a character boundary.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}
