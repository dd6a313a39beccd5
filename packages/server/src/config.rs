use anyhow::{Context, Result};
use dotenvy::dotenv;
use pitch_extraction::types::config::DEFAULT_MAX_DOCUMENT_BYTES;
use pitch_extraction::{AICredentials, PipelineConfig};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub credentials: AICredentials,
    pub pipeline: PipelineConfig,
    /// Browser origins allowed by CORS (empty = any)
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("OPENAI_API_KEY must be set")?;

        let mut credentials = AICredentials::new(api_key)
            .with_generation_model(
                lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            )
            .with_analysis_model(
                lookup("OPENAI_ANALYSIS_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            );
        if let Some(base_url) = lookup("OPENAI_BASE_URL").filter(|url| !url.trim().is_empty()) {
            credentials = credentials.with_base_url(base_url);
        }

        let ai_timeout_secs: u64 = parse_or(&lookup, "AI_TIMEOUT_SECS", 30)?;
        let document_timeout_secs: u64 = parse_or(&lookup, "DOCUMENT_TIMEOUT_SECS", 45)?;
        let max_pdf_bytes: usize = parse_or(&lookup, "MAX_PDF_BYTES", DEFAULT_MAX_DOCUMENT_BYTES)?;
        let revision_retries: u32 = parse_or(&lookup, "REVISION_RETRIES", 2)?;
        let retry_delay_ms: u64 = parse_or(&lookup, "RETRY_DELAY_MS", 1000)?;

        let pipeline = PipelineConfig::new()
            .with_ai_timeout(Duration::from_secs(ai_timeout_secs))
            .with_document_timeout(Duration::from_secs(document_timeout_secs))
            .with_max_document_bytes(max_pdf_bytes)
            .with_json_mode(flag(lookup("JSON_MODE")))
            .with_revision_retries(revision_retries, Duration::from_millis(retry_delay_ms))
            .with_generation_model(credentials.generation_model.clone())
            .with_analysis_model(credentials.analysis_model.clone());

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            port: parse_or(&lookup, "PORT", 8080)?,
            credentials,
            pipeline,
            allowed_origins,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a valid number")),
        _ => Ok(default),
    }
}

fn flag(value: Option<String>) -> bool {
    value
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
