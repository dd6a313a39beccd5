//! AI trait for chat-completion calls.
//!
//! Every pipeline stage reduces to one call: a fixed system prompt, a user
//! prompt built from the stage inputs, and a sampling temperature. The
//! trait returns the raw completion text; turning that text into a typed
//! artifact is the pipeline's job.

use async_trait::async_trait;

use crate::error::Result;

/// Sampling temperature for analysis and ProductInfo/pitch revisions.
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Sampling temperature for generative stages.
pub const CREATIVE_TEMPERATURE: f32 = 0.7;

/// A single chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,

    /// Ask the provider for a bare JSON object
    pub json_mode: bool,

    /// Model override (None = the implementation's default)
    pub model: Option<String>,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: CREATIVE_TEMPERATURE,
            max_tokens: None,
            json_mode: false,
            model: None,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    pub fn model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

/// Chat-completion provider.
///
/// Implementations wrap a specific LLM API and return the assistant text
/// verbatim. They should not strip fences or parse JSON.
#[async_trait]
pub trait AI: Send + Sync {
    /// Run one completion and return the assistant message content.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Whether `json_mode` requests are honored by the provider.
    fn supports_json_mode(&self) -> bool {
        false
    }

    /// Provider name for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<T: AI + ?Sized> AI for std::sync::Arc<T> {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        (**self).complete(request).await
    }

    fn supports_json_mode(&self) -> bool {
        (**self).supports_json_mode()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
