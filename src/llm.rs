//! Generation client: the [`QaGenerator`] trait plus its HTTP and mock
//! implementations.
//!
//! The trait is the seam between the pipeline and the inference endpoint.
//! Production code uses [`OpenAiGenerator`] (any OpenAI-compatible
//! chat-completions endpoint); tests and offline dry runs inject a
//! [`MockGenerator`] via [`crate::config::ProcessConfigBuilder::generator`].
//!
//! ## No retries
//!
//! A failed call is a failed chunk — the caller records zero items and moves
//! to the next chunk. Each call is stateless per chunk, so a retry layer
//! could be added without idempotence concerns, but the current design
//! deliberately omits one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tracing::debug;

/// Decoding temperature for every generation call.
///
/// Fixed at 0.0: the same leaflet must produce the same records on every
/// run. This is a domain requirement, not a default — there is no
/// configuration knob for it.
pub const GENERATION_TEMPERATURE: f32 = 0.0;

/// A fully assembled structured-generation request.
///
/// Built by [`crate::pipeline::prompt::build_request`]; the prompt already
/// carries the instruction template, taxonomy, and (budget-truncated) chunk
/// text.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// The single user-role prompt.
    pub prompt: String,
    /// Bound on generated output length.
    pub max_tokens: usize,
}

/// Why a single generation call failed.
///
/// Always absorbed by the per-chunk unit as "zero items for this chunk" —
/// never fatal to the run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationError {
    /// The request never produced an HTTP response (DNS, TLS, connection).
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status (429 quota, 401 auth,
    /// 400 malformed request, 5xx outage).
    #[error("endpoint returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body was not the expected chat-completions shape.
    #[error("failed to decode endpoint response: {0}")]
    Decode(String),

    /// A well-formed response with no choices.
    #[error("endpoint returned no completion choices")]
    EmptyResponse,
}

/// A text-generation backend: one prompt in, raw model text out.
///
/// `Send + Sync` so a single generator can be shared across a run behind an
/// `Arc`. Implementations must not retry internally.
#[async_trait]
pub trait QaGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

// ── OpenAI-compatible HTTP client ────────────────────────────────────────

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// HTTP generator for any OpenAI-compatible chat-completions endpoint.
///
/// Sends a single user-role message at temperature 0.0 with a bounded
/// `max_tokens`. One attempt per call; the overall call deadline is
/// enforced by the caller ([`crate::pipeline::generate`]), not here.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(
        model: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl QaGenerator for OpenAiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: GENERATION_TEMPERATURE,
            max_tokens: request.max_tokens,
        };

        debug!(
            model = %self.model,
            prompt_chars = request.prompt.len(),
            "sending generation request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, message });
        }

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(GenerationError::EmptyResponse)
    }
}

// ── Mock generator ───────────────────────────────────────────────────────

/// Canned-response generator for tests and offline dry runs.
///
/// Replies are handed out in order; once the sequence is exhausted the last
/// reply repeats, so a single canned reply serves any number of chunks.
pub struct MockGenerator {
    replies: Vec<Result<String, GenerationError>>,
    next: AtomicUsize,
    calls: AtomicUsize,
}

impl MockGenerator {
    /// Every call returns `reply`.
    pub fn always(reply: impl Into<String>) -> Self {
        Self::sequence(vec![Ok(reply.into())])
    }

    /// Every call fails with [`GenerationError::Transport`].
    pub fn failing(detail: impl Into<String>) -> Self {
        Self::sequence(vec![Err(GenerationError::Transport(detail.into()))])
    }

    /// Calls consume `replies` in order; the last entry repeats thereafter.
    pub fn sequence(mut replies: Vec<Result<String, GenerationError>>) -> Self {
        if replies.is_empty() {
            replies.push(Ok("[]".to_string()));
        }
        Self {
            replies,
            next: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `generate` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QaGenerator for MockGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.replies[i.min(self.replies.len() - 1)].clone()
    }
}
