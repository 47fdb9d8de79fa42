//! Per-chunk generation: prompt the model, bound the wait, parse the reply.
//!
//! A chunk is the unit of failure isolation. Whatever goes wrong here —
//! transport error, API rejection, timeout — is recorded as a
//! [`ChunkError`] and the run moves on to the next chunk with zero items.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::ProcessConfig;
use crate::error::ChunkError;
use crate::llm::QaGenerator;
use crate::pipeline::parse::{parse_items, RawQaItem};
use crate::pipeline::prompt::build_request;

/// What one chunk produced: its items, and the error that cost it them.
#[derive(Debug, Default)]
pub struct ChunkOutcome {
    pub items: Vec<RawQaItem>,
    pub error: Option<ChunkError>,
}

/// Run one chunk through the generator.
///
/// `chunk_index` is 1-based and only used for reporting. The generator call
/// is bounded by `config.api_timeout_secs`; a timeout or generation failure
/// yields an outcome with zero items and a recorded error, never an `Err`.
pub async fn process_chunk(
    generator: &Arc<dyn QaGenerator>,
    chunk_index: usize,
    chunk_text: &str,
    source_name: &str,
    config: &ProcessConfig,
) -> ChunkOutcome {
    let request = build_request(chunk_text, source_name, config.questions_per_chunk, config);
    let timeout = Duration::from_secs(config.api_timeout_secs);

    let reply = match tokio::time::timeout(timeout, generator.generate(&request)).await {
        Err(_) => {
            warn!(
                chunk = chunk_index,
                secs = config.api_timeout_secs,
                "generation timed out, chunk yields no records"
            );
            return ChunkOutcome {
                items: Vec::new(),
                error: Some(ChunkError::Timeout {
                    chunk: chunk_index,
                    secs: config.api_timeout_secs,
                }),
            };
        }
        Ok(Err(e)) => {
            warn!(chunk = chunk_index, "generation failed: {e}");
            return ChunkOutcome {
                items: Vec::new(),
                error: Some(ChunkError::Generation {
                    chunk: chunk_index,
                    detail: e.to_string(),
                }),
            };
        }
        Ok(Ok(text)) => text,
    };

    let items = parse_items(&reply);
    debug!(
        chunk = chunk_index,
        items = items.len(),
        reply_chars = reply.chars().count(),
        "chunk generated"
    );
    ChunkOutcome { items, error: None }
}
