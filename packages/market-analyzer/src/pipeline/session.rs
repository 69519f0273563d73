//! Session - the main entry point for the analyzer.
//!
//! A session owns the curated URL list and the run history, and drives
//! discovery and extraction against one research service. Everything is
//! sequential: each service call finishes (or fails) before the next starts.

use std::sync::Arc;

use tracing::info;

use crate::pipeline::discovery::{DiscoveryOutcome, UrlDiscovery};
use crate::pipeline::extract::{ExtractionWarning, ProductExtractor};
use crate::stores::{CurationStore, SearchHistory};
use crate::traits::research::{Market, ResearchService};
use crate::types::{product::ProductRecord, query::SearchQuery};

/// How an analysis run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// At least one product; recorded in history
    Found,
    /// Every URL was tried and none yielded a product; not recorded
    NoResults,
    /// There were no URLs to try
    NoUrls,
}

/// Everything an analysis run produced.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Products in URL order, then in the order each URL returned them
    pub products: Vec<ProductRecord>,
    /// One entry per URL that failed
    pub warnings: Vec<ExtractionWarning>,
    pub urls_processed: usize,
    pub outcome: AnalysisOutcome,
}

/// Progress notification, sent before each URL is processed.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisProgress<'a> {
    /// 1-based position of `url`
    pub index: usize,
    pub total: usize,
    pub url: &'a str,
}

/// One interactive session: curated URLs, history, and the clients.
pub struct Session<S> {
    discovery: UrlDiscovery<S>,
    extractor: ProductExtractor<S>,
    curation: CurationStore,
    history: SearchHistory,
}

impl<S: ResearchService> Session<S> {
    /// Create a session that targets `market`.
    pub fn new(service: S, market: Market) -> Self {
        Self::with_shared(Arc::new(service), market)
    }

    /// Create a session over a service the caller keeps a handle to.
    pub fn with_shared(service: Arc<S>, market: Market) -> Self {
        Self {
            discovery: UrlDiscovery::new(service.clone(), market),
            extractor: ProductExtractor::new(service),
            curation: CurationStore::new(),
            history: SearchHistory::new(),
        }
    }

    /// Discover URLs for `query` and make them the new working set.
    ///
    /// The working set is replaced even when discovery fails or finds
    /// nothing.
    pub async fn discover(&mut self, query: &SearchQuery) -> DiscoveryOutcome {
        let outcome = self.discovery.discover(query).await;
        self.curation.replace_discovered(outcome.urls.iter().cloned());
        outcome
    }

    /// Analyze the currently included URLs.
    pub async fn analyze_active(&mut self, query: &SearchQuery) -> AnalysisReport {
        let urls = self.curation.active_urls();
        self.run_analysis(query, &urls).await
    }

    /// Extract every URL in `active_urls`, in order, and aggregate.
    ///
    /// A failing URL contributes nothing and does not stop the run. A
    /// non-empty aggregate is appended to history.
    pub async fn run_analysis(&mut self, query: &SearchQuery, active_urls: &[String]) -> AnalysisReport {
        self.run_analysis_with_progress(query, active_urls, |_| {})
            .await
    }

    /// [`run_analysis`](Self::run_analysis) with a progress callback.
    pub async fn run_analysis_with_progress<F>(
        &mut self,
        query: &SearchQuery,
        active_urls: &[String],
        mut on_progress: F,
    ) -> AnalysisReport
    where
        F: FnMut(AnalysisProgress<'_>),
    {
        if active_urls.is_empty() {
            return AnalysisReport {
                products: Vec::new(),
                warnings: Vec::new(),
                urls_processed: 0,
                outcome: AnalysisOutcome::NoUrls,
            };
        }

        let total = active_urls.len();
        let mut products = Vec::new();
        let mut warnings = Vec::new();

        for (i, url) in active_urls.iter().enumerate() {
            on_progress(AnalysisProgress {
                index: i + 1,
                total,
                url,
            });

            let outcome = self.extractor.extract(query, url).await;
            products.extend(outcome.products);
            warnings.extend(outcome.warning);
        }

        let outcome = if products.is_empty() {
            AnalysisOutcome::NoResults
        } else {
            self.history.record(query.clone(), products.clone());
            AnalysisOutcome::Found
        };

        info!(
            product = query.product_name(),
            urls = total,
            products = products.len(),
            failed_urls = warnings.len(),
            ?outcome,
            "Analysis finished"
        );

        AnalysisReport {
            products,
            warnings,
            urls_processed: total,
            outcome,
        }
    }

    pub fn curation(&self) -> &CurationStore {
        &self.curation
    }

    pub fn curation_mut(&mut self) -> &mut CurationStore {
        &mut self.curation
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn market(&self) -> &Market {
        self.discovery.market()
    }
}
