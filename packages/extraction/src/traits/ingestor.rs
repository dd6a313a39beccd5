//! Ingestor trait for fetching a product website.
//!
//! The website analysis stage needs exactly one page: the URL the user
//! typed. Implementations return the raw body; HTML-to-text conversion
//! happens in [`crate::document::html`].
//!
//! # SSRF Protection
//!
//! Always wrap network ingestors with [`ValidatedIngestor`] in production:
//!
//! ```rust,ignore
//! let ingestor = ValidatedIngestor::new(HttpIngestor::new()?);
//! let page = ingestor.fetch("acme.example.com").await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CrawlError, CrawlResult};
use crate::security::UrlValidator;

/// Raw page body as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
    /// Final URL after redirects
    pub url: String,

    /// Raw body (HTML or plain text)
    pub content: String,

    /// MIME type from the response, if any
    pub content_type: Option<String>,

    pub fetched_at: DateTime<Utc>,
}

impl RawPage {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
            content_type: None,
            fetched_at: Utc::now(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// True when the body looks like markup rather than plain text.
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            Some(ct) => ct.contains("html"),
            None => self.content.trim_start().starts_with('<'),
        }
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Fetches a single page.
#[async_trait]
pub trait Ingestor: Send + Sync {
    /// Fetch one URL. A non-success HTTP status is an error.
    async fn fetch(&self, url: &str) -> CrawlResult<RawPage>;

    /// Ingestor name for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<T: Ingestor + ?Sized> Ingestor for std::sync::Arc<T> {
    async fn fetch(&self, url: &str) -> CrawlResult<RawPage> {
        (**self).fetch(url).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// An ingestor that validates URLs before fetching (SSRF protection).
///
/// The requested URL is checked with DNS resolution; the final URL after
/// redirects is checked again statically.
pub struct ValidatedIngestor<I: Ingestor> {
    inner: I,
    validator: UrlValidator,
}

impl<I: Ingestor> ValidatedIngestor<I> {
    pub fn new(ingestor: I) -> Self {
        Self::with_validator(ingestor, UrlValidator::new())
    }

    pub fn with_validator(ingestor: I, validator: UrlValidator) -> Self {
        Self {
            inner: ingestor,
            validator,
        }
    }
}

#[async_trait]
impl<I: Ingestor> Ingestor for ValidatedIngestor<I> {
    async fn fetch(&self, url: &str) -> CrawlResult<RawPage> {
        let target = self.validator.validate_with_dns(url).await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Blocked website URL");
            CrawlError::Security(e)
        })?;

        let page = self.inner.fetch(target.as_str()).await?;

        // Redirects may land somewhere the original URL did not point to.
        self.validator.validate(&page.url)?;
        Ok(page)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockIngestor;

    #[test]
    fn test_raw_page_html_detection() {
        assert!(RawPage::new("https://a.test", "<html></html>").is_html());
        assert!(!RawPage::new("https://a.test", "plain text").is_html());
        assert!(RawPage::new("https://a.test", "x")
            .with_content_type("text/html; charset=utf-8")
            .is_html());
    }

    #[test]
    fn test_empty_content_detection() {
        assert!(!RawPage::new("https://a.test", "  \n").has_content());
    }

    #[tokio::test]
    async fn test_validated_ingestor_blocks_private_url() {
        let inner = MockIngestor::new();
        let ingestor = ValidatedIngestor::new(inner.clone());

        let err = ingestor.fetch("http://192.168.1.1/admin").await.unwrap_err();

        assert!(matches!(err, CrawlError::Security(_)));
        assert!(inner.fetched_urls().is_empty());
    }

    #[tokio::test]
    async fn test_validated_ingestor_normalizes_and_fetches() {
        let inner = MockIngestor::new().with_page("https://8.8.8.8/", "<p>Hi</p>");
        let ingestor = ValidatedIngestor::new(inner.clone());

        let page = ingestor.fetch("8.8.8.8").await.unwrap();

        assert_eq!(page.content, "<p>Hi</p>");
        assert_eq!(inner.fetched_urls(), vec!["https://8.8.8.8/".to_string()]);
    }

    #[tokio::test]
    async fn test_validated_ingestor_rejects_private_redirect() {
        let inner = MockIngestor::new()
            .with_redirect("https://8.8.8.8/", "http://10.0.0.5/internal", "secret");
        let ingestor = ValidatedIngestor::new(inner);

        assert!(ingestor.fetch("https://8.8.8.8/").await.is_err());
    }
}
