//! OpenAI implementation of the research service.
//!
//! Discovery goes through the Responses API with the hosted
//! `web_search_preview` tool and a strict `{urls: [...]}` schema.
//! Extraction uses a search-preview chat model that browses on its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use market_analyzer::{AppConfig, OpenAIResearch, Session};
//!
//! let config = AppConfig::from_env()?;
//! let research = OpenAIResearch::from_config(&config)?;
//! let session = Session::new(research, config.market.clone());
//! ```

use async_trait::async_trait;
use openai_client::{
    ChatRequest, Message, OpenAIClient, OpenAIError, ResponsesRequest, WebSearchOptions,
    WebSearchTool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use crate::config::{AppConfig, DEFAULT_DISCOVERY_MODEL, DEFAULT_EXTRACTION_MODEL};
use crate::error::{AnalyzerError, Result};
use crate::traits::research::{DiscoveryRequest, ExtractionRequest, ResearchService};

/// Structured answer of a discovery request.
#[derive(Debug, Deserialize, JsonSchema)]
struct DiscoveredUrls {
    urls: Vec<String>,
}

/// OpenAI-backed research service.
#[derive(Clone)]
pub struct OpenAIResearch {
    client: OpenAIClient,
    discovery_model: String,
    extraction_model: String,
    temperature: f32,
}

impl OpenAIResearch {
    /// Create a research service over an existing client.
    pub fn new(client: OpenAIClient) -> Self {
        Self {
            client,
            discovery_model: DEFAULT_DISCOVERY_MODEL.to_string(),
            extraction_model: DEFAULT_EXTRACTION_MODEL.to_string(),
            temperature: 0.2,
        }
    }

    /// Build the client and models from application config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut client = OpenAIClient::new(config.api_key.expose());
        if let Some(base_url) = &config.base_url {
            client = client.with_base_url(base_url);
        }
        let client = client
            .with_timeout(config.request_timeout)
            .map_err(|e| AnalyzerError::Config(e.to_string()))?;

        Ok(Self::new(client)
            .with_discovery_model(&config.discovery_model)
            .with_extraction_model(&config.extraction_model))
    }

    /// Set the discovery model (default: gpt-4.1).
    pub fn with_discovery_model(mut self, model: impl Into<String>) -> Self {
        self.discovery_model = model.into();
        self
    }

    /// Set the extraction model (default: gpt-4o-search-preview).
    pub fn with_extraction_model(mut self, model: impl Into<String>) -> Self {
        self.extraction_model = model.into();
        self
    }

    /// Set the discovery temperature (default: 0.2).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn discovery_model(&self) -> &str {
        &self.discovery_model
    }

    pub fn extraction_model(&self) -> &str {
        &self.extraction_model
    }

    fn discovery_request(&self, request: &DiscoveryRequest) -> ResponsesRequest {
        ResponsesRequest::new(&self.discovery_model, &request.prompt)
            .tool(WebSearchTool::preview().located(&request.market.country, &request.market.city))
            .temperature(self.temperature)
    }

    // Search-preview models reject sampling parameters, so no temperature here.
    fn extraction_request(&self, request: &ExtractionRequest) -> ChatRequest {
        ChatRequest::new(&self.extraction_model)
            .message(Message::user(&request.prompt))
            .web_search(WebSearchOptions::default())
    }
}

fn map_openai_error(err: OpenAIError) -> AnalyzerError {
    if err.is_transport() {
        AnalyzerError::Transport(err.to_string())
    } else {
        AnalyzerError::service(err)
    }
}

#[async_trait]
impl ResearchService for OpenAIResearch {
    async fn discover(&self, request: &DiscoveryRequest) -> Result<Vec<String>> {
        let found: DiscoveredUrls = self
            .client
            .parse_response(self.discovery_request(request))
            .await
            .map_err(map_openai_error)?;

        debug!(count = found.urls.len(), model = %self.discovery_model, "Discovery response");
        Ok(found.urls)
    }

    async fn extract(&self, request: &ExtractionRequest) -> Result<String> {
        let response = self
            .client
            .chat_completion(self.extraction_request(request))
            .await
            .map_err(map_openai_error)?;

        debug!(
            url = %request.url,
            model = %self.extraction_model,
            response_len = response.content.len(),
            "Extraction response"
        );
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::research::Market;

    fn research() -> OpenAIResearch {
        OpenAIResearch::new(OpenAIClient::new("sk-test"))
    }

    #[test]
    fn test_defaults() {
        let r = research();
        assert_eq!(r.discovery_model(), "gpt-4.1");
        assert_eq!(r.extraction_model(), "gpt-4o-search-preview");
    }

    #[test]
    fn test_discovery_request_shape() {
        let request = DiscoveryRequest {
            prompt: "find shops".to_string(),
            market: Market::default(),
        };

        let body = serde_json::to_value(research().discovery_request(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4.1");
        assert_eq!(body["input"], "find shops");
        assert_eq!(body["tools"][0]["type"], "web_search_preview");
        assert_eq!(body["tools"][0]["user_location"]["country"], "LT");
        assert_eq!(body["tools"][0]["user_location"]["city"], "Vilnius");
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_extraction_request_shape() {
        let request = ExtractionRequest {
            url: "https://shop.lt".to_string(),
            prompt: "read https://shop.lt".to_string(),
        };

        let body = serde_json::to_value(
            research()
                .with_extraction_model("gpt-4o-mini-search-preview")
                .extraction_request(&request),
        )
        .unwrap();

        assert_eq!(body["model"], "gpt-4o-mini-search-preview");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "read https://shop.lt");
        assert_eq!(body["web_search_options"], serde_json::json!({}));
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            map_openai_error(OpenAIError::Network("reset".into())),
            AnalyzerError::Transport(_)
        ));
        assert!(matches!(
            map_openai_error(OpenAIError::Api("401".into())),
            AnalyzerError::Service(_)
        ));
    }

    #[test]
    fn test_discovered_urls_schema_is_strict() {
        use openai_client::StructuredOutput;

        let schema = DiscoveredUrls::openai_schema();
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["required"], serde_json::json!(["urls"]));
    }
}
