//! Browsing chat completion example

use openai_client::{ChatRequest, Message, OpenAIClient, WebSearchOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAIClient::from_env()?;

    let response = client
        .chat_completion(
            ChatRequest::new("gpt-4o-search-preview")
                .message(Message::user(
                    "What does a 1 kg bag of Lavazza Qualita Oro coffee beans cost at barbora.lt?",
                ))
                .web_search(WebSearchOptions::default()),
        )
        .await?;

    println!("{}", response.content);

    if let Some(usage) = response.usage {
        println!("\n({} tokens)", usage.total_tokens);
    }

    Ok(())
}
