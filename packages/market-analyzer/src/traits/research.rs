//! The external AI boundary.
//!
//! Everything the analyzer knows about the web comes through this trait:
//! a browsing model that can list shop URLs and read a product page.
//! Implementations wrap a specific provider; tests use
//! [`MockResearchService`](crate::testing::MockResearchService).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Regional market the search is biased toward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// ISO 3166-1 alpha-2 country code
    pub country: String,
    pub city: String,
}

impl Default for Market {
    fn default() -> Self {
        Self {
            country: "LT".to_string(),
            city: "Vilnius".to_string(),
        }
    }
}

/// A request for candidate product-listing URLs.
#[derive(Debug, Clone)]
pub struct DiscoveryRequest {
    /// Rendered discovery prompt
    pub prompt: String,
    pub market: Market,
}

/// A request to read products off one URL.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Page the model should browse
    pub url: String,
    /// Rendered extraction prompt (already mentions `url`)
    pub prompt: String,
}

/// Browsing LLM capability.
#[async_trait]
pub trait ResearchService: Send + Sync {
    /// Search the web and return candidate URLs, as structured output with
    /// a single `urls` field.
    ///
    /// Raw model output: no deduplication or limit is applied here.
    async fn discover(&self, request: &DiscoveryRequest) -> Result<Vec<String>>;

    /// Browse `request.url` and answer the prompt in free text.
    ///
    /// The text is expected, not guaranteed, to hold a JSON array of
    /// products.
    async fn extract(&self, request: &ExtractionRequest) -> Result<String>;
}

#[async_trait]
impl<T: ResearchService + ?Sized> ResearchService for std::sync::Arc<T> {
    async fn discover(&self, request: &DiscoveryRequest) -> Result<Vec<String>> {
        (**self).discover(request).await
    }

    async fn extract(&self, request: &ExtractionRequest) -> Result<String> {
        (**self).extract(request).await
    }
}
