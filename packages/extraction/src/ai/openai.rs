//! OpenAI implementation of the AI trait.
//!
//! A reference implementation over the chat completions API.
//!
//! # Example
//!
//! ```rust,ignore
//! use pitch_extraction::ai::OpenAI;
//!
//! let ai = OpenAI::new("sk-...").with_model("gpt-4o");
//! let engine = PitchEngine::new(ai, ingestor);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};
use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::security::AICredentials;
use crate::traits::ai::{CompletionRequest, AI};

/// OpenAI-based AI implementation.
///
/// Uses GPT-4o unless a request names another model.
#[derive(Clone, Debug)]
pub struct OpenAI {
    client: OpenAIClient,
    model: String,
}

impl OpenAI {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
            model: "gpt-4o".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let client =
            OpenAIClient::from_env().map_err(|e| ExtractionError::Config(Box::new(e)))?;
        Ok(Self {
            client,
            model: "gpt-4o".to_string(),
        })
    }

    /// Build from stored credentials; the generation model is the default.
    pub fn from_credentials(credentials: &AICredentials) -> Self {
        let mut client = OpenAIClient::new(credentials.api_key.expose());
        if let Some(base_url) = &credentials.base_url {
            client = client.with_base_url(base_url);
        }
        Self {
            client,
            model: credentials.generation_model.clone(),
        }
    }

    /// Set the default chat model (default: gpt-4o).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Bound every HTTP request by `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }

    /// Get the default model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_request(&self, request: CompletionRequest) -> ChatRequest {
        let model = request.model.unwrap_or_else(|| self.model.clone());

        let mut chat = ChatRequest::new(model)
            .message(Message::system(request.system))
            .message(Message::user(request.user))
            .temperature(request.temperature);
        if let Some(limit) = request.max_tokens {
            chat = chat.token_limit(limit);
        }
        if request.json_mode {
            chat = chat.json_object();
        }
        chat
    }
}

#[async_trait]
impl AI for OpenAI {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let chat = self.chat_request(request);
        let model = chat.model.clone();

        let response = self
            .client
            .chat_completion(chat)
            .await
            .map_err(|e| ExtractionError::AI(Box::new(e)))?;

        if let Some(usage) = &response.usage {
            debug!(
                model = %model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "OpenAI usage"
            );
        }
        Ok(response.content)
    }

    fn supports_json_mode(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openai_client::ResponseFormat;

    #[test]
    fn test_chat_request_mapping() {
        let ai = OpenAI::new("sk-test");
        let chat = ai.chat_request(
            CompletionRequest::new("system", "user")
                .temperature(0.3)
                .max_tokens(1000)
                .json_mode(true),
        );

        assert_eq!(chat.model, "gpt-4o");
        assert_eq!(chat.messages[0].content, "system");
        assert_eq!(chat.messages[1].role, "user");
        assert_eq!(chat.temperature, Some(0.3));
        assert_eq!(chat.max_tokens, Some(1000));
        assert_eq!(chat.response_format, Some(ResponseFormat::JsonObject));
    }

    #[test]
    fn test_request_model_overrides_default() {
        let ai = OpenAI::new("sk-test").with_model("gpt-4o");
        let chat = ai.chat_request(
            CompletionRequest::new("s", "u").model(Some("gpt-4o-mini".into())),
        );

        assert_eq!(chat.model, "gpt-4o-mini");
        assert_eq!(chat.response_format, None);
    }

    #[test]
    fn test_from_credentials_uses_generation_model() {
        let credentials = AICredentials::new("sk-test").with_generation_model("gpt-4.1");
        let ai = OpenAI::from_credentials(&credentials);

        assert_eq!(ai.model(), "gpt-4.1");
        assert!(ai.supports_json_mode());
    }
}
