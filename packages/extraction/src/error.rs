//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Only *input* problems, document problems and (for the analysis stages)
//! upstream failures ever reach a caller. Model-output problems in the
//! generation stages are absorbed by the fallback synthesizer and show up
//! as a [`FallbackReason`](crate::pipeline::FallbackReason) instead.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during extraction operations.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Required request field missing or unusable
    #[error("{0}")]
    InvalidInput(String),

    /// Uploaded document rejected or unreadable
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Website fetch failed
    #[error("website fetch failed: {0}")]
    Crawl(#[from] CrawlError),

    /// AI service unavailable or failed
    #[error("AI service error: {0}")]
    AI(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A deadline elapsed before the operation finished
    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ExtractionError {
    /// Shorthand for an input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// True for a deadline error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Errors from the PDF text extractor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// Payload exceeds the configured ceiling (checked before decoding)
    #[error("PDF file is too large ({size} bytes). Please use a file smaller than {limit} bytes.")]
    TooLarge { size: usize, limit: usize },

    /// Payload is not valid base64
    #[error("invalid base64 PDF content: {0}")]
    InvalidBase64(String),

    /// Too little readable text was recovered
    #[error(
        "could not extract sufficient text from PDF ({extracted} characters). \
         The PDF might be image-based, encrypted, or contain no readable text."
    )]
    InsufficientText { extracted: usize },
}

/// Errors that can occur while fetching a website.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Security validation failed
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Connection timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },
}

/// Security-related errors, primarily for SSRF protection.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, internal IPs)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// A redirect pointed somewhere the validator rejects
    #[error("redirect blocked: {0}")]
    BlockedRedirect(String),

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    DnsResolution(String),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for crawl operations.
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;
