use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use bg_compose::slugify;
use bg_core::{RenderedPost, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

pub const INDEX_MARKER: &str = "<!-- BLOG-ENTRIES -->";
const UNTITLED_SLUG: &str = "untitled-post";

/// Writes finished pages into the blog directory and keeps the index page
/// listing up to date.
pub struct BlogDir {
    dir: PathBuf,
    index_file: PathBuf,
}

impl BlogDir {
    pub fn new(dir: impl Into<PathBuf>, index_file: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            index_file: index_file.into(),
        }
    }

    /// `<YYYY-MM-DD>-<slug>.html`; a title with no usable characters gets
    /// a fixed fallback slug.
    pub fn post_filename(title: &str, date: NaiveDate) -> String {
        let slug = slugify(title);
        let slug = if slug.is_empty() {
            UNTITLED_SLUG.to_string()
        } else {
            slug
        };
        format!("{}-{}.html", date.format("%Y-%m-%d"), slug)
    }

    /// Write the full page and return where it landed.
    pub fn save_post(&self, title: &str, page_html: &str, date: NaiveDate) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::post_filename(title, date));
        fs::write(&path, page_html)?;
        info!("💾 Draft saved to {}", path.display());
        Ok(path)
    }

    /// Insert a card for the new post at the marker comment and re-emit
    /// the marker so the next run can insert again. A missing index file
    /// or marker is logged and skipped; the article itself already exists
    /// on disk at this point.
    pub fn append_to_index(
        &self,
        post: &RenderedPost,
        filename: &str,
        date: NaiveDate,
    ) -> Result<()> {
        let html = match fs::read_to_string(&self.index_file) {
            Ok(html) => html,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "⚠️ Index file {} not found, skipping index update",
                    self.index_file.display()
                );
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if !html.contains(INDEX_MARKER) {
            warn!(
                "⚠️ Marker {} not found in {}, skipping index update",
                INDEX_MARKER,
                self.index_file.display()
            );
            return Ok(());
        }

        let card = index_card(post, filename, date);
        let html = html.replacen(INDEX_MARKER, &format!("{}\n{}", card, INDEX_MARKER), 1);
        fs::write(&self.index_file, html)?;
        info!("🗂️ Index updated with \"{}\"", post.title);
        Ok(())
    }
}

fn index_card(post: &RenderedPost, filename: &str, date: NaiveDate) -> String {
    let tag_spans = post
        .tags
        .iter()
        .map(|t| format!("        <span class=\"tag\">{}</span>", t))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<div class="blog-card rounded-xl p-6 border border-gray-800 card-hover">
    <div class="flex items-center mb-3">
        <span class="text-gray-400 text-sm">{date}</span>
    </div>
    <h3 class="text-xl font-bold text-primary mb-3">
        🚀 {title}
    </h3>
    <p class="text-gray-300 mb-4">
        {description}
    </p>
    <div class="flex flex-wrap gap-2 mb-4">
{tag_spans}
    </div>
    <div class="flex items-center justify-between">
        <span class="text-gray-400 text-sm">📖 {read_time} min read</span>
        <a href="{filename}" class="bg-primary text-white px-6 py-3 rounded-lg hover:bg-primary/80 transition-colors">
            Read Full Article →
        </a>
    </div>
</div>"#,
        date = date.format("%b %d, %Y"),
        title = post.title,
        description = post.description,
        tag_spans = tag_spans,
        read_time = post.read_time_minutes,
        filename = filename,
    )
}
