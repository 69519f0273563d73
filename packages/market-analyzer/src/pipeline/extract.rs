//! Product extraction: read offers off one URL.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::pipeline::parsing::parse_products;
use crate::pipeline::prompts::{build_extraction_prompt_for_basis, prompt_fingerprint};
use crate::traits::research::{ExtractionRequest, ResearchService};
use crate::types::{product::ProductRecord, query::SearchQuery};

/// Why a URL contributed no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The service call itself failed
    Service,
    /// The service answered, but not with a product list
    Parse,
}

/// A recovered per-URL failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionWarning {
    pub url: String,
    pub kind: WarningKind,
    pub message: String,
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::Service => write!(f, "API request failed for {}: {}", self.url, self.message),
            WarningKind::Parse => write!(
                f,
                "Could not parse products from {}: {}",
                self.url, self.message
            ),
        }
    }
}

/// Result of extracting one URL.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    pub products: Vec<ProductRecord>,
    pub warning: Option<ExtractionWarning>,
}

/// Extraction client over a research service.
pub struct ProductExtractor<S> {
    service: Arc<S>,
}

impl<S: ResearchService> ProductExtractor<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    /// Ask the service for the products on `url` and parse its answer.
    ///
    /// Never fails: service and parse errors are logged and returned as a
    /// warning with no products.
    pub async fn extract(&self, query: &SearchQuery, url: &str) -> ExtractionOutcome {
        let prompt = build_extraction_prompt_for_basis(
            query.category(),
            query.product_name(),
            query.tech_spec(),
            url,
            query.price_basis(),
            query.unit_label(),
        );

        debug!(url, prompt_sha = %prompt_fingerprint(&prompt), "Requesting product extraction");

        let request = ExtractionRequest {
            url: url.to_string(),
            prompt,
        };

        let text = match self.service.extract(&request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(url, error = %e, "Product extraction request failed");
                return ExtractionOutcome {
                    products: Vec::new(),
                    warning: Some(ExtractionWarning {
                        url: url.to_string(),
                        kind: WarningKind::Service,
                        message: e.to_string(),
                    }),
                };
            }
        };

        match parse_products(&text) {
            Ok(products) => {
                info!(url, count = products.len(), "Extracted products");
                ExtractionOutcome {
                    products,
                    warning: None,
                }
            }
            Err(e) => {
                warn!(
                    url,
                    error = %e,
                    response_len = text.len(),
                    "Could not parse products from response"
                );
                ExtractionOutcome {
                    products: Vec::new(),
                    warning: Some(ExtractionWarning {
                        url: url.to_string(),
                        kind: WarningKind::Parse,
                        message: e.to_string(),
                    }),
                }
            }
        }
    }
}
