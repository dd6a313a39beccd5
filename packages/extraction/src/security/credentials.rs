//! API credentials kept out of logs.
//!
//! Uses the `secrecy` crate so keys never show up in Debug or Display output.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

const REDACTED: &str = "[REDACTED]";

/// A string that redacts itself when formatted.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(value.into().into_boxed_str()))
    }

    /// Expose the secret value. Call only at the point of use.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// True when the secret holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Chat-completion provider settings.
///
/// Generation stages use `generation_model`; website, PDF and objection
/// stages use the cheaper `analysis_model`.
#[derive(Clone)]
pub struct AICredentials {
    pub api_key: SecretString,
    pub generation_model: String,
    pub analysis_model: String,
    pub base_url: Option<String>,
}

impl AICredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            generation_model: "gpt-4o".to_string(),
            analysis_model: "gpt-4o-mini".to_string(),
            base_url: None,
        }
    }

    pub fn with_generation_model(mut self, model: impl Into<String>) -> Self {
        self.generation_model = model.into();
        self
    }

    pub fn with_analysis_model(mut self, model: impl Into<String>) -> Self {
        self.analysis_model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}

impl fmt::Debug for AICredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AICredentials")
            .field("api_key", &REDACTED)
            .field("generation_model", &self.generation_model)
            .field("analysis_model", &self.analysis_model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_redacted() {
        let secret = SecretString::new("sk-live-abc123");
        assert_eq!(format!("{:?}", secret), REDACTED);
        assert_eq!(format!("{}", secret), REDACTED);
        assert_eq!(secret.expose(), "sk-live-abc123");
    }

    #[test]
    fn test_blank_secret() {
        assert!(SecretString::new("  ").is_blank());
        assert!(!SecretString::from("sk").is_blank());
    }

    #[test]
    fn test_credentials_debug_hides_key() {
        let creds = AICredentials::new("sk-live-abc123").with_analysis_model("gpt-4.1-mini");
        let debug = format!("{:?}", creds);

        assert!(!debug.contains("sk-live"));
        assert!(debug.contains("gpt-4o"));
        assert!(debug.contains("gpt-4.1-mini"));
    }
}
