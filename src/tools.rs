use crate::llm::{ChatClient, ChatMessage};

const SEARCH_SYSTEM_PROMPT: &str = "You are a web search tool. Provide factual, up-to-date \
information about the query as if you were displaying search results. Format your response like \
real search results with bullet points for key information.";

// Lower temperature than chat: search results should read factual, not creative.
const SEARCH_TEMPERATURE: f32 = 0.3;

/// Simulated web search: a single model call with a search-results persona.
/// A real implementation would call a search API.
pub struct WebSearchTool;

impl WebSearchTool {
    pub async fn search(client: &ChatClient, query: &str) -> String {
        let messages = [
            ChatMessage::system(SEARCH_SYSTEM_PROMPT),
            ChatMessage::user(format!("Search query: {query}")),
        ];

        match client.chat_at(&messages, SEARCH_TEMPERATURE).await {
            Ok(results) => results,
            Err(e) => e.to_string(),
        }
    }
}
