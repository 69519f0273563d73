//! Lithuanian Market Product Price Analyzer
//!
//! Describe a product, let a browsing LLM find shops that sell it, curate
//! the list, then have the LLM read each page and return structured offers
//! that can be compared on a common price basis.
//!
//! # Flow
//!
//! 1. Build a [`SearchQuery`] (category, product name, spec, price basis)
//! 2. [`Session::discover`] asks the service for candidate URLs
//! 3. The user curates them through [`Session::curation_mut`]
//! 4. [`Session::analyze_active`] extracts every included URL in order and
//!    records non-empty runs in the session history
//!
//! Failures of the AI service never abort a run. They surface as
//! [`DiscoveryOutcome::error`] or per-URL [`ExtractionWarning`]s.
//!
//! # Usage
//!
//! ```rust,ignore
//! use market_analyzer::{Market, PriceBasis, SearchQuery, Session};
//! use market_analyzer::testing::MockResearchService;
//!
//! let service = MockResearchService::new()
//!     .with_discovery(vec!["https://shop.lt/d3".into()])
//!     .with_extraction("https://shop.lt/d3", r#"[{"product_name":"D3","product_price":9.99}]"#);
//! let mut session = Session::new(service, Market::default());
//!
//! let query = SearchQuery::new("Vitamins", "Vitamin D", "2000 IU")?
//!     .with_price_basis(PriceBasis::Unit, Some("pill".into()));
//! session.discover(&query).await;
//! let report = session.analyze_active(&query).await;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - The research service boundary
//! - [`types`] - Query, product record and history entry
//! - [`pipeline`] - Prompts, discovery, extraction and the session
//! - [`stores`] - URL curation and run history
//! - [`render`] - Display model for results and history
//! - [`config`] - Environment and secrets-file configuration
//! - [`security`] - API key handling
//! - [`testing`] - Mock research service

pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use config::AppConfig;
pub use error::{AnalyzerError, Result};
pub use security::SecretString;
pub use traits::research::{DiscoveryRequest, ExtractionRequest, Market, ResearchService};
pub use types::{
    history::{SearchHistoryEntry, TIMESTAMP_FORMAT},
    product::{parse_decimal, ProductRecord},
    query::{PriceBasis, SearchQuery},
};

pub use pipeline::{
    // Prompts
    build_discovery_prompt, build_extraction_prompt, build_extraction_prompt_for_basis,
    prompt_fingerprint,
    // Discovery
    normalize_urls, DiscoveryOutcome, UrlDiscovery, MAX_DISCOVERED_URLS,
    // Extraction
    locate_product_json, parse_products, ExtractionOutcome, ExtractionWarning, ProductExtractor,
    WarningKind,
    // Session
    AnalysisOutcome, AnalysisProgress, AnalysisReport, Session,
};

pub use render::{
    format_price, history_title, history_views, per_basis_price, unit_suffix, HistoryEntryView,
    PerBasisPrice, ProductView, ResultsView,
};

pub use stores::{validate_url, CandidateUrl, CurationStore, SearchHistory, UrlOrigin};

#[cfg(feature = "openai")]
pub use ai::OpenAIResearch;
