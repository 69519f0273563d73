//! Pure OpenAI REST API client
//!
//! A minimal client for the OpenAI API with no domain-specific logic.
//! Supports chat completions (including the search-preview models' web
//! browsing), the Responses API with hosted tools, and strict structured
//! outputs generated from Rust types.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("gpt-4o-search-preview")
//!         .message(Message::user("Find current prices for ..."))
//!         .web_search(WebSearchOptions::default()),
//! ).await?;
//! ```
//!
//! # Structured Output with Web Search
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Links {
//!     urls: Vec<String>,
//! }
//!
//! let links: Links = client
//!     .parse_response::<Links>(
//!         ResponsesRequest::new("gpt-4.1", prompt)
//!             .tool(WebSearchTool::preview().located("LT", "Vilnius")),
//!     )
//!     .await?;
//! ```

pub mod error;
pub mod responses;
pub mod schema;
pub mod types;

pub use error::{OpenAIError, Result};
pub use responses::{
    ResponseOutput, ResponsesRequest, TextConfig, TextFormat, UserLocation, WebSearchTool,
};
pub use schema::StructuredOutput;
pub use types::*;

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply a whole-request timeout at the transport layer.
    ///
    /// Browsing models can take minutes to answer, so the default client
    /// has no timeout at all.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpenAIError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion API and get a response.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let chat_response: types::ChatResponseRaw =
            self.post_json("chat/completions", &request).await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OpenAIError::Api("No response from OpenAI".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }

    /// Create a model response through the Responses API.
    ///
    /// This is the endpoint that supports hosted tools such as
    /// `web_search_preview`.
    pub async fn create_response(&self, request: ResponsesRequest) -> Result<ResponseOutput> {
        let start = std::time::Instant::now();

        let output: ResponseOutput = self.post_json("responses", &request).await?;

        debug!(
            model = %request.model,
            status = output.status.as_deref().unwrap_or("unknown"),
            duration_ms = start.elapsed().as_millis(),
            "OpenAI response"
        );

        if let Some(error) = &output.error {
            return Err(OpenAIError::Api(format!(
                "OpenAI response failed: {}",
                error.message
            )));
        }

        Ok(output)
    }

    /// Type-safe structured output through the Responses API.
    ///
    /// Generates a strict JSON schema from `T`, attaches it as the request's
    /// text format, and deserializes the model's output text into `T`.
    pub async fn parse_response<T: StructuredOutput>(&self, request: ResponsesRequest) -> Result<T> {
        let schema = T::openai_schema();

        debug!(
            type_name = T::type_name(),
            schema = %serde_json::to_string(&schema).unwrap_or_default(),
            "Generated OpenAI schema for response parsing"
        );

        let request = request.json_schema(T::type_name(), schema);
        let output = self.create_response(request).await?;

        let text = match (output.output_text(), output.refusal()) {
            (Some(text), _) => text,
            (None, Some(refusal)) => {
                return Err(OpenAIError::Api(format!("Model refused: {}", refusal)))
            }
            (None, None) => {
                return Err(OpenAIError::Api("Response contained no output text".into()))
            }
        };

        serde_json::from_str(&text)
            .map_err(|e| OpenAIError::Parse(format!("Failed to deserialize response: {}", e)))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .http_client
            .post(format!("{}/{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, path, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(
                status = %status,
                error = %truncate_to_char_boundary(&error_text, 500),
                path,
                "OpenAI API error"
            );
            return Err(OpenAIError::Api(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = OpenAIClient::new("sk-test").with_base_url("https://custom.api.com/v1/");

        assert_eq!(client.api_key, "sk-test");
        assert_eq!(client.base_url, "https://custom.api.com/v1");
    }

    #[test]
    fn test_with_timeout_keeps_settings() {
        let client = OpenAIClient::new("sk-test")
            .with_base_url("https://proxy.local")
            .with_timeout(Duration::from_secs(5))
            .unwrap();

        assert_eq!(client.base_url(), "https://proxy.local");
        assert_eq!(client.api_key(), "sk-test");
    }
}
