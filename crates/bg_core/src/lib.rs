pub mod error;
pub mod provider;

pub use error::Error;
pub use provider::ContentProvider;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub description: String,
    pub sections: Vec<PostSection>,
    pub tags: Vec<String>,
    pub read_time_minutes: u32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PostSection {
    pub heading: String,
    pub content: String,
    pub code_examples: Vec<String>,
}

impl BlogPost {
    /// A post is only worth rendering as a full article if at least one
    /// section carries actual body text.
    pub fn has_content(&self) -> bool {
        self.sections.iter().any(|s| !s.content.trim().is_empty())
    }
}

/// Everything the publishing side needs about a rendered page: the HTML
/// fragments plus the metadata derived during rendering.
#[derive(Debug, Clone)]
pub struct RenderedPost {
    pub title: String,
    pub description: String,
    pub content_html: String,
    pub toc_html: String,
    pub tags: Vec<String>,
    pub tags_html: String,
    pub read_time_minutes: u32,
}
