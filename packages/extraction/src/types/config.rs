//! Configuration for the pitch pipeline.

use std::time::Duration;

/// Default deadline for a single model call.
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(30);

/// Default deadline for a whole website or PDF analysis.
pub const DEFAULT_DOCUMENT_TIMEOUT: Duration = Duration::from_secs(45);

/// Default ceiling on decoded PDF size (5 MiB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

/// Characters of page text sent to the model for website analysis.
pub const DEFAULT_WEBSITE_TEXT_LIMIT: usize = 4_000;

/// Configuration for [`PitchEngine`](crate::pipeline::PitchEngine).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Deadline for each model call.
    ///
    /// Generation stages degrade to the fallback on expiry; analysis stages
    /// surface a timeout error. Default: 30s.
    pub ai_timeout: Duration,

    /// Deadline for the whole fetch + analyze path of a document. Default: 45s.
    pub document_timeout: Duration,

    /// Ask the provider for a JSON object and skip the locator cascade.
    ///
    /// Only honored when the AI implementation supports it. Default: false.
    pub json_mode: bool,

    /// Extra attempts for the objection-handling revision. Default: 2.
    pub revision_retries: u32,

    /// Fixed delay between revision attempts. Default: 1s.
    pub retry_delay: Duration,

    /// Model for the generation stages (None = provider default).
    pub generation_model: Option<String>,

    /// Model for analysis and objection stages (None = provider default).
    pub analysis_model: Option<String>,

    /// Ceiling on decoded PDF bytes.
    pub max_document_bytes: usize,

    /// Characters of website text kept for analysis.
    pub website_text_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ai_timeout: DEFAULT_AI_TIMEOUT,
            document_timeout: DEFAULT_DOCUMENT_TIMEOUT,
            json_mode: false,
            revision_retries: 2,
            retry_delay: Duration::from_secs(1),
            generation_model: None,
            analysis_model: None,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            website_text_limit: DEFAULT_WEBSITE_TEXT_LIMIT,
        }
    }
}

impl PipelineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ai_timeout(mut self, timeout: Duration) -> Self {
        self.ai_timeout = timeout;
        self
    }

    pub fn with_document_timeout(mut self, timeout: Duration) -> Self {
        self.document_timeout = timeout;
        self
    }

    pub fn with_json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    /// Set retry count and delay for the objection-handling revision.
    pub fn with_revision_retries(mut self, retries: u32, delay: Duration) -> Self {
        self.revision_retries = retries;
        self.retry_delay = delay;
        self
    }

    pub fn with_generation_model(mut self, model: impl Into<String>) -> Self {
        self.generation_model = Some(model.into());
        self
    }

    pub fn with_analysis_model(mut self, model: impl Into<String>) -> Self {
        self.analysis_model = Some(model.into());
        self
    }

    pub fn with_max_document_bytes(mut self, bytes: usize) -> Self {
        self.max_document_bytes = bytes;
        self
    }

    pub fn with_website_text_limit(mut self, chars: usize) -> Self {
        self.website_text_limit = chars;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.ai_timeout, Duration::from_secs(30));
        assert_eq!(config.document_timeout, Duration::from_secs(45));
        assert_eq!(config.revision_retries, 2);
        assert_eq!(config.max_document_bytes, 5 * 1024 * 1024);
        assert!(!config.json_mode);
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::new()
            .with_json_mode(true)
            .with_revision_retries(0, Duration::ZERO)
            .with_analysis_model("gpt-4o-mini");

        assert!(config.json_mode);
        assert_eq!(config.revision_retries, 0);
        assert_eq!(config.analysis_model.as_deref(), Some("gpt-4o-mini"));
    }
}
