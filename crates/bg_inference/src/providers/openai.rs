use std::fmt;

use bg_core::{ContentProvider, Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::prompt::build_prompt;

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: String,
}

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .ok_or_else(|| Error::Provider("OpenAI API key is required".to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
        })
    }
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait::async_trait]
impl ContentProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn generate(&self, topic: &str) -> Result<String> {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "You are a technical blog writer.".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(topic),
                },
            ],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::Provider(
                "OpenAI returned no usable choices".to_string(),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_requires_api_key() {
        let result = OpenAiProvider::new(None);
        assert!(result.is_err());

        let result = OpenAiProvider::new(Some("test-key".to_string()));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().name(), "OpenAI");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = OpenAiProvider::new(Some("sk-secret".to_string())).unwrap();
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
