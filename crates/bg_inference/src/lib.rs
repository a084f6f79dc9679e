pub mod prompt;
pub mod providers;

/// Credentials for the remote backends. A missing key soft-disables the
/// corresponding backend rather than failing the run.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

pub mod prelude {
    pub use super::providers::{create_providers, generate_with_fallback};
    pub use super::ProviderConfig;
    pub use bg_core::{BlogPost, ContentProvider, Error, PostSection, Result};
}

pub use providers::{create_providers, generate_with_fallback};
