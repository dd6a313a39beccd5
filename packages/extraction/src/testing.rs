//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the pitch pipeline
//! without making real AI or network calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{ExtractionError, Result};
use crate::traits::ai::{CompletionRequest, AI};

pub use crate::ingestors::MockIngestor;

/// One scripted answer.
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(String),
}

/// A mock AI implementation for testing.
///
/// Replies are consumed in order; once the queue is empty the default reply
/// (if any) is repeated. Clones share the script and the call log.
#[derive(Clone, Default)]
pub struct MockAI {
    /// Scripted replies, consumed front to back
    replies: Arc<RwLock<VecDeque<MockReply>>>,

    /// Reply used once the script runs out
    default_reply: Option<MockReply>,

    /// Artificial latency before each reply
    delay: Option<Duration>,

    /// Whether to claim JSON-mode support
    json_mode: bool,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<CompletionRequest>>>,
}

impl MockAI {
    /// Create a mock with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a completion text.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    /// Queue an upstream failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Fail(message.into()));
        self
    }

    /// Reply with `text` whenever the queue is empty.
    pub fn with_default_response(mut self, text: impl Into<String>) -> Self {
        self.default_reply = Some(MockReply::Text(text.into()));
        self
    }

    /// Fail whenever the queue is empty.
    pub fn with_default_failure(mut self, message: impl Into<String>) -> Self {
        self.default_reply = Some(MockReply::Fail(message.into()));
        self
    }

    /// Sleep before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Claim (or deny) JSON-mode support.
    pub fn with_json_mode(mut self, supported: bool) -> Self {
        self.json_mode = supported;
        self
    }

    /// Get all recorded requests.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    pub fn last_call(&self) -> Option<CompletionRequest> {
        self.calls.read().unwrap().last().cloned()
    }

    /// Clear recorded calls.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn push(&self, reply: MockReply) {
        self.replies.write().unwrap().push_back(reply);
    }

    fn next_reply(&self) -> Option<MockReply> {
        self.replies
            .write()
            .unwrap()
            .pop_front()
            .or_else(|| self.default_reply.clone())
    }
}

#[async_trait]
impl AI for MockAI {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.calls.write().unwrap().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_reply() {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(message)) => Err(ExtractionError::AI(message.into())),
            None => Err(ExtractionError::AI("no scripted response".into())),
        }
    }

    fn supports_json_mode(&self) -> bool {
        self.json_mode
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_then_default() {
        let ai = MockAI::new()
            .with_response("first")
            .with_failure("boom")
            .with_default_response("again");

        let request = CompletionRequest::new("s", "u");
        assert_eq!(ai.complete(request.clone()).await.unwrap(), "first");
        assert!(ai.complete(request.clone()).await.is_err());
        assert_eq!(ai.complete(request.clone()).await.unwrap(), "again");
        assert_eq!(ai.complete(request).await.unwrap(), "again");
        assert_eq!(ai.call_count(), 4);
    }

    #[tokio::test]
    async fn test_clones_share_call_log() {
        let ai = MockAI::new().with_default_response("{}");
        let handle = ai.clone();

        ai.complete(CompletionRequest::new("system", "user"))
            .await
            .unwrap();

        assert_eq!(handle.last_call().unwrap().user, "user");
        handle.clear_calls();
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_script_fails() {
        let ai = MockAI::new();
        let err = ai
            .complete(CompletionRequest::new("s", "u"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::AI(_)));
    }
}
