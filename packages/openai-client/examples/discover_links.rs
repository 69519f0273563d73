//! Structured web-search example: ask for shop links as a typed list.

use openai_client::{OpenAIClient, ResponsesRequest, WebSearchTool};
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
struct Links {
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAIClient::from_env()?;

    let request = ResponsesRequest::new(
        "gpt-4.1",
        "List up to 5 Lithuanian online shops selling vitamin D3 2000 IU with visible prices.",
    )
    .tool(WebSearchTool::preview().located("LT", "Vilnius"))
    .temperature(0.2);

    let links: Links = client.parse_response(request).await?;

    for (i, url) in links.urls.iter().enumerate() {
        println!("{}. {}", i + 1, url);
    }

    Ok(())
}
