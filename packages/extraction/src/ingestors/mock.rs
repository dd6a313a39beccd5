//! Mock ingestor for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{CrawlError, CrawlResult};
use crate::traits::ingestor::{Ingestor, RawPage};

#[derive(Debug, Clone)]
enum CannedResponse {
    Page(RawPage),
    Status(u16),
}

/// Ingestor returning canned pages keyed by requested URL.
///
/// Unknown URLs answer with HTTP 404. Clones share state, so a test can
/// keep a handle for assertions after moving a clone into the engine.
///
/// ```rust
/// use pitch_extraction::ingestors::MockIngestor;
///
/// let mock = MockIngestor::new().with_page("https://acme.test/", "<h1>Acme</h1>");
/// ```
#[derive(Clone, Default)]
pub struct MockIngestor {
    responses: Arc<RwLock<HashMap<String, CannedResponse>>>,
    fetched: Arc<RwLock<Vec<String>>>,
}

impl MockIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` as HTML for `url`.
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        let url = url.into();
        let page = RawPage::new(url.clone(), body).with_content_type("text/html");
        self.insert(url, CannedResponse::Page(page));
        self
    }

    /// Serve `body` for `url` as if the server redirected to `final_url`.
    pub fn with_redirect(
        self,
        url: impl Into<String>,
        final_url: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let page = RawPage::new(final_url, body).with_content_type("text/html");
        self.insert(url.into(), CannedResponse::Page(page));
        self
    }

    /// Answer `url` with a non-success status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.insert(url.into(), CannedResponse::Status(status));
        self
    }

    /// URLs requested so far, in order.
    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.read().unwrap().clone()
    }

    fn insert(&self, url: String, response: CannedResponse) {
        self.responses.write().unwrap().insert(url, response);
    }
}

#[async_trait]
impl Ingestor for MockIngestor {
    async fn fetch(&self, url: &str) -> CrawlResult<RawPage> {
        self.fetched.write().unwrap().push(url.to_string());

        let response = self.responses.read().unwrap().get(url).cloned();
        match response {
            Some(CannedResponse::Page(page)) => Ok(page),
            Some(CannedResponse::Status(status)) => Err(CrawlError::Status {
                url: url.to_string(),
                status,
            }),
            None => Err(CrawlError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
