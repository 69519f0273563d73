//! Analysis pipeline.
//!
//! The pipeline orchestrates:
//! - Prompt rendering
//! - URL discovery (one structured, browsing request)
//! - Per-URL product extraction and best-effort parsing
//! - Aggregation into history

pub mod discovery;
pub mod extract;
pub mod parsing;
pub mod prompts;
pub mod session;

pub use discovery::{normalize_urls, DiscoveryOutcome, UrlDiscovery, MAX_DISCOVERED_URLS};
pub use extract::{ExtractionOutcome, ExtractionWarning, ProductExtractor, WarningKind};
pub use parsing::{locate_product_json, parse_products};
pub use prompts::{
    build_discovery_prompt, build_extraction_prompt, build_extraction_prompt_for_basis,
    prompt_fingerprint, DISCOVERY_PROMPT, EXTRACTION_PROMPT,
};
pub use session::{AnalysisOutcome, AnalysisProgress, AnalysisReport, Session};
