use std::fmt;

use bg_core::{ContentProvider, Result};

/// Offline backend for development and tests. Produces a small but
/// well-formed payload derived only from the topic, so runs are
/// deterministic and need no credentials.
pub struct DummyProvider;

impl fmt::Debug for DummyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyProvider").finish()
    }
}

impl DummyProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ContentProvider for DummyProvider {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, topic: &str) -> Result<String> {
        let payload = serde_json::json!({
            "title": topic,
            "description": format!("A short overview of {}.", topic),
            "sections": [
                {
                    "heading": "Introduction",
                    "content": format!(
                        "This article takes a practical look at {}.\n\nIt walks through the core ideas and a small working example.",
                        topic
                    ),
                    "code_examples": []
                },
                {
                    "heading": "A Worked Example",
                    "content": "The snippet below shows the smallest useful setup you can start from.",
                    "code_examples": ["fn main() {\n    println!(\"hello\");\n}"]
                }
            ],
            "tags": ["Tutorial"],
            "read_time": 3
        });
        Ok(payload.to_string())
    }
}
