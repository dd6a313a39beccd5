//! Error types for OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// OpenAI client errors.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response (rate limit, invalid request, server error)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Well-formed response without a usable message
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OpenAIError {
    /// True for failures worth retrying (network, 429, 5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            OpenAIError::Network(_) => true,
            OpenAIError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(OpenAIError::Network("reset".into()).is_transient());
        assert!(OpenAIError::Api { status: 429, message: "slow down".into() }.is_transient());
        assert!(OpenAIError::Api { status: 503, message: "busy".into() }.is_transient());
        assert!(!OpenAIError::Api { status: 401, message: "bad key".into() }.is_transient());
        assert!(!OpenAIError::Parse("eof".into()).is_transient());
    }
}
