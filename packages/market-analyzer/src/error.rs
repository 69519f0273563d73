//! Typed errors for the market analyzer.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the pipeline can
//! tell transport failures from unusable model output.

use thiserror::Error;

/// Errors that can occur in the analyzer.
///
/// Only configuration and input validation errors ever reach a caller of the
/// pipeline; service and parse errors are turned into warnings at the
/// discovery and extraction boundaries.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Missing credential or unreadable configuration
    #[error("config error: {0}")]
    Config(String),

    /// Query is missing a required field
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// Text is not an absolute http(s) URL
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// The request never got an answer (connection, DNS, timeout)
    #[error("transport error: {0}")]
    Transport(String),

    /// The AI service answered with an error or an unusable response
    #[error("AI service error: {0}")]
    Service(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Model output was not valid JSON
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Model output was JSON but not a product list
    #[error("expected a JSON array of products, got {found}")]
    UnexpectedShape { found: &'static str },
}

impl AnalyzerError {
    /// Wrap any error as a service failure.
    pub fn service(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Service(err.into())
    }
}

/// Result type alias for analyzer operations.
pub type Result<T> = std::result::Result<T, AnalyzerError>;
