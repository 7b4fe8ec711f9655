use std::env;

use anyhow::Result;
use rustyline::DefaultEditor;

use crate::llm::{ChatClient, DEFAULT_BASE_URL};

pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Resolved runtime settings: key from the environment (interactive prompt
/// as a fallback), base URL overridable for OpenAI-compatible servers.
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Config {
    pub fn resolve(model: String, temperature: f32) -> Result<Self> {
        let api_key = match env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => prompt_for_key()?,
        };
        let base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
            temperature,
        })
    }

    pub fn client(&self) -> ChatClient {
        ChatClient::new(&self.api_key, &self.model)
            .with_base_url(&self.base_url)
            .with_temperature(self.temperature)
    }
}

fn prompt_for_key() -> Result<String> {
    let mut rl = DefaultEditor::new()?;
    let key = rl.readline("Please enter your OpenAI API key: ")?;
    Ok(key.trim().to_string())
}
