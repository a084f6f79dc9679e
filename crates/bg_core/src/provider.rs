use async_trait::async_trait;
use crate::Result;

#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Short name of the backend, used in log output
    fn name(&self) -> &str;

    /// Ask the backend to write an article about the given topic.
    /// Returns the raw response text; callers should not assume it is
    /// well-formed JSON.
    async fn generate(&self, topic: &str) -> Result<String>;
}
