//! Testing utilities including a mock research service.
//!
//! Useful for testing applications that use the analyzer without making
//! real AI or network calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{AnalyzerError, Result};
use crate::traits::research::{DiscoveryRequest, ExtractionRequest, ResearchService};

/// Canned answer for one URL.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Free text returned as the model's answer
    Text(String),
    /// The request never reached the service
    TransportError(String),
    /// The service rejected the request
    ServiceError(String),
}

/// A mock research service for testing.
///
/// Discovery returns a configured list (empty by default). Extraction looks
/// up the requested URL; unknown URLs answer with an empty JSON array.
/// Every request is recorded for assertions.
pub struct MockResearchService {
    discovery: Arc<RwLock<std::result::Result<Vec<String>, String>>>,
    replies: Arc<RwLock<HashMap<String, MockReply>>>,
    discovery_calls: Arc<RwLock<Vec<DiscoveryRequest>>>,
    extraction_calls: Arc<RwLock<Vec<ExtractionRequest>>>,
}

impl MockResearchService {
    pub fn new() -> Self {
        Self {
            discovery: Arc::new(RwLock::new(Ok(Vec::new()))),
            replies: Arc::new(RwLock::new(HashMap::new())),
            discovery_calls: Arc::new(RwLock::new(Vec::new())),
            extraction_calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// URLs the next discovery returns.
    pub fn with_discovery(self, urls: Vec<String>) -> Self {
        *self.discovery.write().unwrap() = Ok(urls);
        self
    }

    /// Make discovery fail with a service error.
    pub fn with_discovery_error(self, message: impl Into<String>) -> Self {
        *self.discovery.write().unwrap() = Err(message.into());
        self
    }

    /// Answer extraction for `url` with `text`.
    pub fn with_extraction(self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_reply(url, MockReply::Text(text.into()))
    }

    /// Fail extraction for `url` as if the connection dropped.
    pub fn with_extraction_transport_error(
        self,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.with_reply(url, MockReply::TransportError(message.into()))
    }

    /// Fail extraction for `url` with a service error.
    pub fn with_extraction_service_error(
        self,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.with_reply(url, MockReply::ServiceError(message.into()))
    }

    fn with_reply(self, url: impl Into<String>, reply: MockReply) -> Self {
        self.replies.write().unwrap().insert(url.into(), reply);
        self
    }

    /// Discovery requests seen so far.
    pub fn discovery_requests(&self) -> Vec<DiscoveryRequest> {
        self.discovery_calls.read().unwrap().clone()
    }

    /// Extraction requests seen so far, in call order.
    pub fn extraction_requests(&self) -> Vec<ExtractionRequest> {
        self.extraction_calls.read().unwrap().clone()
    }

    /// URLs extraction was asked for, in call order.
    pub fn extracted_urls(&self) -> Vec<String> {
        self.extraction_calls
            .read()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }
}

impl Default for MockResearchService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResearchService for MockResearchService {
    async fn discover(&self, request: &DiscoveryRequest) -> Result<Vec<String>> {
        self.discovery_calls.write().unwrap().push(request.clone());

        self.discovery
            .read()
            .unwrap()
            .clone()
            .map_err(AnalyzerError::service)
    }

    async fn extract(&self, request: &ExtractionRequest) -> Result<String> {
        self.extraction_calls.write().unwrap().push(request.clone());

        let reply = self.replies.read().unwrap().get(&request.url).cloned();
        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::TransportError(message)) => Err(AnalyzerError::Transport(message)),
            Some(MockReply::ServiceError(message)) => Err(AnalyzerError::service(message)),
            None => Ok("[]".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extraction(url: &str) -> ExtractionRequest {
        ExtractionRequest {
            url: url.to_string(),
            prompt: format!("prices from {}", url),
        }
    }

    #[test]
    fn test_unknown_url_answers_empty_array() {
        let mock = MockResearchService::new();

        let text = tokio_test::block_on(mock.extract(&extraction("https://nowhere.lt"))).unwrap();

        assert_eq!(text, "[]");
        assert_eq!(mock.extracted_urls(), vec!["https://nowhere.lt"]);
    }

    #[test]
    fn test_configured_failures() {
        let mock = MockResearchService::new()
            .with_extraction_transport_error("https://a.lt", "connection reset")
            .with_extraction_service_error("https://b.lt", "429 rate limited");

        let a = tokio_test::block_on(mock.extract(&extraction("https://a.lt")));
        let b = tokio_test::block_on(mock.extract(&extraction("https://b.lt")));

        assert!(matches!(a, Err(AnalyzerError::Transport(_))));
        assert!(matches!(b, Err(AnalyzerError::Service(_))));
    }
}
