use bg_core::{ContentProvider, Error, Result};
use tracing::{info, warn};

use crate::ProviderConfig;

pub mod dummy;
pub mod gemini;
pub mod openai;

pub use dummy::DummyProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

pub type BoxedProvider = Box<dyn ContentProvider>;

/// Build the ordered backend list for a provider selection string.
/// `auto` yields every backend with configured credentials, primary first;
/// a concrete name yields just that backend and fails if its key is absent.
pub fn create_providers(selection: &str, config: &ProviderConfig) -> Result<Vec<BoxedProvider>> {
    match selection {
        "auto" => {
            let mut providers: Vec<BoxedProvider> = Vec::new();
            if config.gemini_api_key.is_some() {
                providers.push(Box::new(GeminiProvider::new(config.gemini_api_key.clone())?));
            }
            if config.openai_api_key.is_some() {
                providers.push(Box::new(OpenAiProvider::new(config.openai_api_key.clone())?));
            }
            Ok(providers)
        }
        "gemini" => Ok(vec![Box::new(GeminiProvider::new(
            config.gemini_api_key.clone(),
        )?)]),
        "openai" => Ok(vec![Box::new(OpenAiProvider::new(
            config.openai_api_key.clone(),
        )?)]),
        "dummy" => Ok(vec![Box::new(DummyProvider::new())]),
        other => Err(Error::Provider(format!("Unknown provider: {}", other))),
    }
}

/// Try each backend once, in order, and return the first usable response.
/// An empty or whitespace-only response counts as a failure and advances
/// the loop, same as a transport or provider-side error.
pub async fn generate_with_fallback(providers: &[BoxedProvider], topic: &str) -> Result<String> {
    if providers.is_empty() {
        return Err(Error::Provider(
            "no content backends are configured".to_string(),
        ));
    }

    for provider in providers {
        info!("🤖 Requesting draft from {}", provider.name());
        match provider.generate(topic).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(
                    "✨ {} returned {} bytes of draft text",
                    provider.name(),
                    text.len()
                );
                return Ok(text);
            }
            Ok(_) => {
                warn!(
                    "⚠️ {} returned an empty response, trying next backend",
                    provider.name()
                );
            }
            Err(e) => {
                warn!("⚠️ {} failed: {}, trying next backend", provider.name(), e);
            }
        }
    }

    Err(Error::Provider(
        "all content backends failed".to_string(),
    ))
}
