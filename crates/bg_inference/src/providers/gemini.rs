use std::fmt;

use bg_core::{ContentProvider, Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::prompt::build_prompt;

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .ok_or_else(|| Error::Provider("Gemini API key is required".to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        })
    }
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait::async_trait]
impl ContentProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, topic: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(topic),
                }],
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/models/gemini-1.5-flash:generateContent?key={}",
                self.base_url, self.api_key
            ))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        // A safety-blocked prompt comes back with no candidates at all
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::Provider(
                "Gemini returned no usable candidates".to_string(),
            ));
        }
        Ok(text)
    }
}
