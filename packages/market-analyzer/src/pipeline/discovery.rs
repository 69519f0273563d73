//! URL discovery: ask the browsing model where the product is sold.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::pipeline::prompts::{build_discovery_prompt, prompt_fingerprint};
use crate::stores::validate_url;
use crate::traits::research::{DiscoveryRequest, Market, ResearchService};
use crate::types::query::SearchQuery;

/// Most URLs a discovery run returns.
pub const MAX_DISCOVERED_URLS: usize = 20;

/// Result of one discovery run.
///
/// A failed run is an empty list plus `error`; an empty list without an
/// error means the model simply found nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryOutcome {
    pub urls: Vec<String>,
    pub error: Option<String>,
}

impl DiscoveryOutcome {
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Discovery client over a research service.
pub struct UrlDiscovery<S> {
    service: Arc<S>,
    market: Market,
}

impl<S: ResearchService> UrlDiscovery<S> {
    pub fn new(service: Arc<S>, market: Market) -> Self {
        Self { service, market }
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    /// Find candidate URLs for `query`.
    ///
    /// Never fails: service errors are logged and returned in
    /// [`DiscoveryOutcome::error`] with no URLs.
    pub async fn discover(&self, query: &SearchQuery) -> DiscoveryOutcome {
        let prompt = build_discovery_prompt(query.category(), query.product_name(), query.tech_spec());

        debug!(
            prompt_sha = %prompt_fingerprint(&prompt),
            country = %self.market.country,
            city = %self.market.city,
            "Requesting URL discovery"
        );

        let request = DiscoveryRequest {
            prompt,
            market: self.market.clone(),
        };

        match self.service.discover(&request).await {
            Ok(raw) => {
                let received = raw.len();
                let urls = normalize_urls(raw);
                info!(
                    product = query.product_name(),
                    received,
                    kept = urls.len(),
                    "URL discovery finished"
                );
                DiscoveryOutcome { urls, error: None }
            }
            Err(e) => {
                warn!(error = %e, product = query.product_name(), "URL discovery failed");
                DiscoveryOutcome {
                    urls: Vec::new(),
                    error: Some(format!("Error discovering URLs: {}", e)),
                }
            }
        }
    }
}

/// Trim, drop anything that is not an absolute http(s) URL, deduplicate
/// keeping first occurrences, and cap at [`MAX_DISCOVERED_URLS`].
pub fn normalize_urls(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for url in raw {
        let url = url.trim();
        if validate_url(url).is_err() {
            debug!(url, "Dropping unusable discovered URL");
            continue;
        }
        if seen.insert(url.to_string()) {
            urls.push(url.to_string());
            if urls.len() == MAX_DISCOVERED_URLS {
                break;
            }
        }
    }

    urls
}
