//! Responses API types.
//!
//! The Responses endpoint is the only one that combines hosted tools
//! (`web_search_preview`) with a strict `json_schema` text format, so URL
//! discovery goes through it while plain browsing uses chat completions.

use serde::{Deserialize, Serialize};

/// Request body for `POST /responses`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,

    /// Plain-text input prompt
    pub input: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WebSearchTool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextConfig>,
}

impl ResponsesRequest {
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            tools: Vec::new(),
            temperature: None,
            text: None,
        }
    }

    /// Attach a hosted tool.
    pub fn tool(mut self, tool: WebSearchTool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Constrain the output text to a strict JSON schema.
    pub fn json_schema(mut self, name: impl Into<String>, schema: serde_json::Value) -> Self {
        self.text = Some(TextConfig {
            format: TextFormat::JsonSchema {
                name: sanitize_schema_name(&name.into()),
                strict: true,
                schema,
            },
        });
        self
    }
}

/// The API only accepts `[a-zA-Z0-9_-]` in schema names.
fn sanitize_schema_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "structured_response".to_string()
    } else {
        cleaned
    }
}

/// Hosted web search tool.
#[derive(Debug, Clone, Serialize)]
pub struct WebSearchTool {
    #[serde(rename = "type")]
    pub tool_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_location: Option<UserLocation>,
}

impl WebSearchTool {
    /// The `web_search_preview` tool with no location bias.
    pub fn preview() -> Self {
        Self {
            tool_type: "web_search_preview".to_string(),
            user_location: None,
        }
    }

    /// Bias search results toward a country (ISO code) and city.
    pub fn located(mut self, country: impl Into<String>, city: impl Into<String>) -> Self {
        self.user_location = Some(UserLocation::approximate(country, city));
        self
    }
}

/// Approximate location hint for the search tool.
#[derive(Debug, Clone, Serialize)]
pub struct UserLocation {
    #[serde(rename = "type")]
    pub location_type: String,
    pub country: String,
    pub city: String,
}

impl UserLocation {
    pub fn approximate(country: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            location_type: "approximate".to_string(),
            country: country.into(),
            city: city.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TextConfig {
    pub format: TextFormat,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextFormat {
    Text,
    JsonSchema {
        name: String,
        strict: bool,
        schema: serde_json::Value,
    },
}

/// Response body from `POST /responses`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseOutput {
    #[serde(default)]
    pub id: Option<String>,

    /// "completed", "incomplete", "failed", ...
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub error: Option<ResponseError>,

    #[serde(default)]
    pub output: Vec<OutputItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// One item of the `output` array. Tool calls (`web_search_call`) are kept
/// only as their type; messages carry the content we read.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type")]
    pub item_type: String,

    #[serde(default)]
    pub content: Vec<OutputContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type")]
    pub content_type: String,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub refusal: Option<String>,
}

impl ResponseOutput {
    /// Concatenated `output_text` parts of every message item.
    pub fn output_text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .output
            .iter()
            .filter(|item| item.item_type == "message")
            .flat_map(|item| item.content.iter())
            .filter(|c| c.content_type == "output_text")
            .filter_map(|c| c.text.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }

    /// The model's refusal message, if it refused.
    pub fn refusal(&self) -> Option<&str> {
        self.output
            .iter()
            .flat_map(|item| item.content.iter())
            .find_map(|c| c.refusal.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let req = ResponsesRequest::new("gpt-4.1", "find shops")
            .tool(WebSearchTool::preview().located("LT", "Vilnius"))
            .temperature(0.2)
            .json_schema("Links", json!({"type": "object"}));

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["tools"][0]["type"], "web_search_preview");
        assert_eq!(value["tools"][0]["user_location"]["type"], "approximate");
        assert_eq!(value["tools"][0]["user_location"]["country"], "LT");
        assert_eq!(value["tools"][0]["user_location"]["city"], "Vilnius");
        assert_eq!(value["text"]["format"]["type"], "json_schema");
        assert_eq!(value["text"]["format"]["name"], "Links");
        assert_eq!(value["text"]["format"]["strict"], true);
    }

    #[test]
    fn test_schema_name_sanitized() {
        assert_eq!(sanitize_schema_name("Array_of_string"), "Array_of_string");
        assert_eq!(sanitize_schema_name("Vec<Url>"), "Vec_Url_");
        assert_eq!(sanitize_schema_name(""), "structured_response");
    }

    #[test]
    fn test_output_text_skips_tool_calls() {
        let output: ResponseOutput = serde_json::from_value(json!({
            "id": "resp_1",
            "status": "completed",
            "output": [
                {"type": "web_search_call", "id": "ws_1", "status": "completed"},
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "{\"urls\":", "annotations": []},
                    {"type": "output_text", "text": "[]}", "annotations": []}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(output.output_text().as_deref(), Some("{\"urls\":[]}"));
        assert!(output.refusal().is_none());
    }

    #[test]
    fn test_output_text_none_on_refusal() {
        let output: ResponseOutput = serde_json::from_value(json!({
            "output": [
                {"type": "message", "content": [
                    {"type": "refusal", "refusal": "I can't help with that."}
                ]}
            ]
        }))
        .unwrap();

        assert!(output.output_text().is_none());
        assert_eq!(output.refusal(), Some("I can't help with that."));
    }
}
