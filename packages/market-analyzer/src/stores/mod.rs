//! Session-scoped in-memory stores.
//!
//! - `CurationStore` - the candidate URL working set
//! - `SearchHistory` - the append-only run log
//!
//! Nothing here is persisted; both live as long as the session.

pub mod curation;
pub mod history;

pub use curation::{validate_url, CandidateUrl, CurationStore, UrlOrigin};
pub use history::SearchHistory;
