//! HTTP ingestor for single-page website fetches.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use tracing::{debug, warn};

use crate::error::{CrawlError, CrawlResult, SecurityError};
use crate::security::UrlValidator;
use crate::traits::ingestor::{Ingestor, RawPage};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; PitchBuilder/1.0)";
const MAX_REDIRECTS: usize = 5;

/// Body bytes kept per page; the rest is dropped.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Fetches one page over HTTP(S).
///
/// Every redirect hop is checked against a [`UrlValidator`] before it is
/// followed. The first URL is not; wrap in
/// [`ValidatedIngestor`](crate::traits::ingestor::ValidatedIngestor) before
/// handing it user input.
pub struct HttpIngestor {
    client: reqwest::Client,
    user_agent: String,
    max_body_bytes: usize,
}

impl HttpIngestor {
    pub fn new() -> CrawlResult<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create an ingestor whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> CrawlResult<Self> {
        Self::with_validator(timeout, UrlValidator::new())
    }

    /// Create an ingestor that checks redirect targets with `validator`.
    pub fn with_validator(timeout: Duration, validator: UrlValidator) -> CrawlResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(redirect_policy(validator))
            .build()
            .map_err(|e| CrawlError::Http(Box::new(e)))?;

        Ok(Self {
            client,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Replace the client. Its redirect policy is the caller's concern.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

fn redirect_policy(validator: UrlValidator) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        match validator.validate(attempt.url().as_str()) {
            Ok(_) => attempt.follow(),
            Err(e) => {
                warn!(location = %attempt.url(), error = %e, "Refusing redirect");
                attempt.error(e)
            }
        }
    })
}

/// The validator error behind a refused redirect, if that is what failed.
fn refused_redirect(error: &reqwest::Error) -> Option<String> {
    let mut source = std::error::Error::source(error);
    while let Some(err) = source {
        if let Some(security) = err.downcast_ref::<SecurityError>() {
            return Some(security.to_string());
        }
        source = err.source();
    }
    None
}

/// Read the body up to `limit` bytes.
async fn read_capped(mut response: reqwest::Response, limit: usize) -> CrawlResult<String> {
    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| CrawlError::Http(Box::new(e)))?
    {
        let room = limit - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            debug!(limit, "Page body truncated");
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

#[async_trait]
impl Ingestor for HttpIngestor {
    async fn fetch(&self, url: &str) -> CrawlResult<RawPage> {
        debug!(url = %url, "HTTP fetch starting");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                if let Some(reason) = refused_redirect(&e) {
                    CrawlError::Security(SecurityError::BlockedRedirect(reason))
                } else if e.is_timeout() {
                    CrawlError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    CrawlError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Website returned error status");
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = read_capped(response, self.max_body_bytes).await?;

        debug!(url = %final_url, bytes = body.len(), "HTTP fetch complete");

        let mut page = RawPage::new(final_url, body);
        if let Some(ct) = content_type {
            page = page.with_content_type(ct);
        }
        Ok(page)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single connection on a local port with `response`.
    async fn serve_once(response: String) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = socket.read(&mut request).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        addr
    }

    fn ok_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    #[test]
    fn test_builder() {
        let ingestor = HttpIngestor::with_timeout(Duration::from_secs(5))
            .unwrap()
            .with_user_agent("Test/1.0")
            .with_max_body_bytes(1024);
        assert_eq!(ingestor.user_agent, "Test/1.0");
        assert_eq!(ingestor.max_body_bytes, 1024);
        assert_eq!(ingestor.name(), "http");
    }

    #[tokio::test]
    async fn test_fetches_page() {
        let addr = serve_once(ok_response("<h1>Acme</h1>")).await;
        let ingestor = HttpIngestor::new().unwrap();

        let page = ingestor.fetch(&format!("http://{addr}/")).await.unwrap();

        assert_eq!(page.content, "<h1>Acme</h1>");
        assert!(page.is_html());
    }

    #[tokio::test]
    async fn test_body_is_capped() {
        let addr = serve_once(ok_response(&"a".repeat(10_000))).await;
        let ingestor = HttpIngestor::new().unwrap().with_max_body_bytes(64);

        let page = ingestor.fetch(&format!("http://{addr}/")).await.unwrap();

        assert_eq!(page.content.len(), 64);
    }

    #[tokio::test]
    async fn test_redirect_to_private_address_is_not_followed() {
        // Loopback is blocked by the default validator, so this target must stay untouched.
        let internal = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let internal_addr = internal.local_addr().unwrap();
        let redirect = format!(
            "HTTP/1.1 302 Found\r\nLocation: http://{internal_addr}/secret\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );
        let addr = serve_once(redirect).await;
        let ingestor = HttpIngestor::new().unwrap();

        let err = ingestor.fetch(&format!("http://{addr}/")).await.unwrap_err();

        assert!(matches!(
            err,
            CrawlError::Security(SecurityError::BlockedRedirect(_))
        ));
        let contacted = tokio::time::timeout(Duration::from_millis(100), internal.accept()).await;
        assert!(contacted.is_err());
    }

    #[tokio::test]
    async fn test_redirect_to_allowed_host_is_followed() {
        let target = serve_once(ok_response("landed")).await;
        let redirect = format!(
            "HTTP/1.1 301 Moved Permanently\r\nLocation: http://{target}/home\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );
        let addr = serve_once(redirect).await;
        let ingestor =
            HttpIngestor::with_validator(Duration::from_secs(5), UrlValidator::new().allow_host("127.0.0.1"))
                .unwrap();

        let page = ingestor.fetch(&format!("http://{addr}/")).await.unwrap();

        assert_eq!(page.content, "landed");
        assert_eq!(page.url, format!("http://{target}/home"));
    }
}
