//! Configuration types for a Q&A extraction run.
//!
//! All run behaviour is controlled through [`ProcessConfig`], built via its
//! [`ProcessConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share configs across documents, log them, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest.
//!
//! # What is deliberately *not* configurable
//! The sampling temperature. Generation runs at temperature 0.0
//! ([`crate::llm::GENERATION_TEMPERATURE`]) because reproducibility of
//! factual medical content is a hard requirement of the domain, not a knob.

use crate::error::Pdf2QaError;
use crate::llm::QaGenerator;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Configuration for a document-to-Q&A extraction run.
///
/// Built via [`ProcessConfig::builder()`] or [`ProcessConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2qa::ProcessConfig;
///
/// let config = ProcessConfig::builder()
///     .model("gpt-4o-mini")
///     .questions_per_chunk(10)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ProcessConfig {
    /// Model identifier sent to the chat-completions endpoint. Default: "gpt-4o-mini".
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint. Default: "https://api.openai.com/v1".
    ///
    /// Any endpoint speaking the chat-completions protocol works (Ollama,
    /// vLLM, LiteLLM, Azure gateways).
    pub base_url: String,

    /// API key. If None, `OPENAI_API_KEY` is read from the environment when
    /// the generator is resolved.
    pub api_key: Option<String>,

    /// Pre-constructed generator. Takes precedence over `model`/`base_url`/
    /// `api_key` — the injection seam used by tests and embedders.
    pub generator: Option<Arc<dyn QaGenerator>>,

    /// Maximum characters per chunk. Default: 15 000.
    ///
    /// Chunks are cut on paragraph boundaries, so a single paragraph longer
    /// than this is kept whole and the chunk exceeds the nominal limit.
    /// Larger chunks mean fewer generation calls but each call sees more
    /// text than the model can ground questions in; 15 000 characters is
    /// roughly 3 000–4 000 tokens, comfortably inside context.
    pub max_chunk_size: usize,

    /// Maximum chunk characters embedded in a prompt. Default: 15 000.
    ///
    /// Chunk text beyond this budget is silently dropped from the request —
    /// a lossy safety cap against oversized payloads. With the default
    /// `max_chunk_size` the cap only bites on oversized single paragraphs.
    pub prompt_char_budget: usize,

    /// Target Q&A pairs requested per chunk. Default: 15.
    ///
    /// A target, not a guarantee: the model may return fewer, and malformed
    /// output degrades to zero items for that chunk.
    pub questions_per_chunk: usize,

    /// Minimum extracted characters for a document to be worth processing.
    /// Default: 100. Below this the document is skipped with
    /// [`crate::error::DocumentError::InsufficientText`].
    pub min_text_chars: usize,

    /// Maximum tokens the model may generate per chunk. Default: 4 000.
    ///
    /// 15 Q&A pairs with multi-sentence answers routinely exceed 2 000
    /// tokens; setting this too low truncates the JSON array mid-object and
    /// the whole chunk degrades to zero items.
    pub max_output_tokens: usize,

    /// Per-generation-call timeout in seconds. Default: 120.
    ///
    /// A call that exceeds this is recorded as a chunk failure (zero items),
    /// never escalated. There are no retries: each chunk gets one call.
    pub api_timeout_secs: u64,

    /// Hard cap on excerpt length in characters. Default: 500.
    pub excerpt_max_chars: usize,

    /// Value of the "Applicable to Pathways" provenance column.
    /// Default: "Breast Cancer".
    pub pathway: String,

    /// Value of the "Author Name" provenance column.
    /// Default: "Healthcare AI Team".
    pub author: String,

    /// Sample mode: process only the first 3 documents (after sorting) for a
    /// cheap smoke pass over a new corpus. Default: false.
    pub sample: bool,

    /// Progress callback fired as documents and chunks complete.
    pub progress_callback: Option<ProgressCallback>,
}

/// How many documents a `sample: true` run processes.
pub const SAMPLE_DOCUMENT_LIMIT: usize = 3;

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            generator: None,
            max_chunk_size: 15_000,
            prompt_char_budget: 15_000,
            questions_per_chunk: 15,
            min_text_chars: 100,
            max_output_tokens: 4_000,
            api_timeout_secs: 120,
            excerpt_max_chars: 500,
            pathway: "Breast Cancer".to_string(),
            author: "Healthcare AI Team".to_string(),
            sample: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ProcessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("generator", &self.generator.as_ref().map(|_| "<dyn QaGenerator>"))
            .field("max_chunk_size", &self.max_chunk_size)
            .field("prompt_char_budget", &self.prompt_char_budget)
            .field("questions_per_chunk", &self.questions_per_chunk)
            .field("min_text_chars", &self.min_text_chars)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("excerpt_max_chars", &self.excerpt_max_chars)
            .field("pathway", &self.pathway)
            .field("author", &self.author)
            .field("sample", &self.sample)
            .finish()
    }
}

impl ProcessConfig {
    /// Create a new builder for `ProcessConfig`.
    pub fn builder() -> ProcessConfigBuilder {
        ProcessConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ProcessConfig`].
#[derive(Debug)]
pub struct ProcessConfigBuilder {
    config: ProcessConfig,
}

impl ProcessConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        // The HTTP client appends "/chat/completions" itself.
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn generator(mut self, generator: Arc<dyn QaGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn max_chunk_size(mut self, chars: usize) -> Self {
        self.config.max_chunk_size = chars.max(100);
        self
    }

    pub fn prompt_char_budget(mut self, chars: usize) -> Self {
        self.config.prompt_char_budget = chars.max(100);
        self
    }

    pub fn questions_per_chunk(mut self, n: usize) -> Self {
        self.config.questions_per_chunk = n.max(1);
        self
    }

    pub fn min_text_chars(mut self, chars: usize) -> Self {
        self.config.min_text_chars = chars;
        self
    }

    pub fn max_output_tokens(mut self, n: usize) -> Self {
        self.config.max_output_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn excerpt_max_chars(mut self, chars: usize) -> Self {
        self.config.excerpt_max_chars = chars;
        self
    }

    pub fn pathway(mut self, pathway: impl Into<String>) -> Self {
        self.config.pathway = pathway.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.config.author = author.into();
        self
    }

    pub fn sample(mut self, v: bool) -> Self {
        self.config.sample = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ProcessConfig, Pdf2QaError> {
        let c = &self.config;
        if c.model.is_empty() {
            return Err(Pdf2QaError::InvalidConfig("Model must not be empty".into()));
        }
        if c.max_output_tokens == 0 {
            return Err(Pdf2QaError::InvalidConfig(
                "max_output_tokens must be ≥ 1".into(),
            ));
        }
        if c.questions_per_chunk == 0 {
            return Err(Pdf2QaError::InvalidConfig(
                "questions_per_chunk must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
