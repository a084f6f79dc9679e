use bg_core::{BlogPost, RenderedPost};
use lazy_static::lazy_static;
use regex::Regex;

use crate::tags;

const WORDS_PER_MINUTE: usize = 200;
const MIN_PARAGRAPH_CHARS: usize = 10;

lazy_static! {
    static ref HEADING_RE: Regex =
        Regex::new(r#"<h[23][^>]*\bid="([^"]+)"[^>]*>(.*?)</h[23]>"#).unwrap();
}

/// Render a post into its page fragments. Pure function of its inputs:
/// no clock, no randomness, so the same post and topic always produce
/// byte-identical output.
pub fn render_post(post: &BlogPost, topic: &str) -> RenderedPost {
    let content_html = render_sections(post);
    let toc_html = toc_html(&content_html);
    let tag_labels = tags::tags_for_topic(topic);
    let tags_html = tags::tags_html(&tag_labels);
    let read_time_minutes = estimate_read_time(&content_html);

    RenderedPost {
        title: post.title.clone(),
        description: post.description.clone(),
        content_html,
        toc_html,
        tags: tag_labels,
        tags_html,
        read_time_minutes,
    }
}

/// Lowercase, collapse every run of non-alphanumerics to a single hyphen,
/// trim hyphens at both ends. Shared by heading anchors and output
/// filenames.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn anchor_id(heading: &str, index: usize) -> String {
    let id = slugify(heading);
    if id.is_empty() {
        format!("section-{}", index + 1)
    } else {
        id
    }
}

fn render_sections(post: &BlogPost) -> String {
    let mut blocks = Vec::new();
    for (i, section) in post.sections.iter().enumerate() {
        let paragraphs: Vec<&str> = section
            .content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| p.len() > MIN_PARAGRAPH_CHARS)
            .collect();
        let snippets: Vec<&str> = section
            .code_examples
            .iter()
            .map(|c| c.as_str())
            .filter(|c| !is_placeholder_snippet(c))
            .collect();

        // nothing survived the filters, so no dangling heading either
        if paragraphs.is_empty() && snippets.is_empty() {
            continue;
        }

        let mut block = String::new();
        block.push_str(&format!(
            "<h2 id=\"{}\">{}</h2>\n",
            anchor_id(&section.heading, i),
            section.heading.trim()
        ));
        for paragraph in paragraphs {
            block.push_str(&format!("<p>{}</p>\n", paragraph));
        }
        for snippet in snippets {
            block.push_str(&format!("<pre><code>{}</code></pre>\n", snippet.trim()));
        }
        blocks.push(block);
    }

    if blocks.is_empty() {
        return "<p>No content could be generated for this article.</p>\n".to_string();
    }
    blocks.join("\n")
}

/// Snippets with nothing executable in them are noise in the rendered
/// page: empty strings, or stubs where every line is a comment
/// (e.g. "// Example: do something").
fn is_placeholder_snippet(code: &str) -> bool {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return true;
    }
    trimmed.lines().map(str::trim).all(|line| {
        line.is_empty()
            || line.starts_with("//")
            || line.starts_with('#')
            || line.starts_with("/*")
            || line.starts_with('*')
            || line.starts_with("<!--")
    })
}

/// One TOC entry per emitted h2/h3, in document order. A page without
/// headings still gets a single default entry.
pub fn toc_html(content_html: &str) -> String {
    let mut items: Vec<String> = HEADING_RE
        .captures_iter(content_html)
        .map(|cap| format!("<li><a href=\"#{}\">{}</a></li>", &cap[1], cap[2].trim()))
        .collect();
    if items.is_empty() {
        items.push("<li><a href=\"#introduction\">Introduction</a></li>".to_string());
    }
    format!("<ul>\n{}\n</ul>", items.join("\n"))
}

/// Reading speed estimate over the text that actually got rendered,
/// never below one minute.
pub fn estimate_read_time(content_html: &str) -> u32 {
    let words = strip_tags(content_html).split_whitespace().count();
    let minutes = (words as f64 / WORDS_PER_MINUTE as f64).round() as u32;
    minutes.max(1)
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bg_core::PostSection;

    fn post_with(sections: Vec<PostSection>) -> BlogPost {
        BlogPost {
            title: "Test Post".to_string(),
            description: "A test".to_string(),
            sections,
            tags: vec![],
            read_time_minutes: 5,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Cold Starts in Serverless!"), "cold-starts-in-serverless");
        assert_eq!(slugify("  --- Weird___Input ---  "), "weird-input");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("Already-fine"), "already-fine");
    }

    #[test]
    fn test_anchor_id_falls_back_to_ordinal() {
        assert_eq!(anchor_id("Intro", 0), "intro");
        assert_eq!(anchor_id("???", 2), "section-3");
    }

    #[test]
    fn test_sections_render_in_order_with_anchors() {
        let post = post_with(vec![
            PostSection {
                heading: "First Part".to_string(),
                content: "A paragraph that is clearly long enough.".to_string(),
                code_examples: vec![],
            },
            PostSection {
                heading: "Second Part".to_string(),
                content: "Another paragraph that is also long enough.".to_string(),
                code_examples: vec![],
            },
        ]);
        let rendered = render_post(&post, "topic");
        let first = rendered.content_html.find("id=\"first-part\"").unwrap();
        let second = rendered.content_html.find("id=\"second-part\"").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_paragraph_splitting_and_minimum_length() {
        let post = post_with(vec![PostSection {
            heading: "Body".to_string(),
            content: "First real paragraph with plenty of text.\n\nok\n\nSecond real paragraph with plenty of text.".to_string(),
            code_examples: vec![],
        }]);
        let html = render_sections(&post);
        assert_eq!(html.matches("<p>").count(), 2);
        assert!(!html.contains("<p>ok</p>"));
    }

    #[test]
    fn test_placeholder_code_examples_are_filtered() {
        let post = post_with(vec![PostSection {
            heading: "Code".to_string(),
            content: "Some body text long enough to keep.".to_string(),
            code_examples: vec![
                "// Example: do something".to_string(),
                "   ".to_string(),
                "const x = 1;".to_string(),
            ],
        }]);
        let html = render_sections(&post);
        assert_eq!(html.matches("<pre><code>").count(), 1);
        assert!(html.contains("const x = 1;"));
        assert!(!html.contains("do something"));
    }

    #[test]
    fn test_zero_emitted_sections_renders_fallback_paragraph() {
        let post = post_with(vec![PostSection {
            heading: "Empty".to_string(),
            content: "short".to_string(),
            code_examples: vec!["// Example: stub".to_string()],
        }]);
        let html = render_sections(&post);
        assert!(html.contains("No content could be generated"));
        assert!(!html.contains("<h2"));
    }

    #[test]
    fn test_toc_lists_emitted_headings() {
        let html = "<h2 id=\"alpha\">Alpha</h2>\n<p>text</p>\n<h3 id=\"beta\">Beta</h3>";
        let toc = toc_html(html);
        assert!(toc.contains("href=\"#alpha\""));
        assert!(toc.contains("href=\"#beta\""));
    }

    #[test]
    fn test_toc_default_entry_without_headings() {
        let toc = toc_html("<p>just a paragraph</p>");
        assert!(toc.contains("href=\"#introduction\""));
    }

    #[test]
    fn test_duplicate_headings_keep_deterministic_anchors() {
        let section = |heading: &str| PostSection {
            heading: heading.to_string(),
            content: "Paragraph body that is long enough to keep.".to_string(),
            code_examples: vec![],
        };
        let post = post_with(vec![section("Setup"), section("Setup")]);
        let a = render_sections(&post);
        let b = render_sections(&post);
        assert_eq!(a, b);
        // duplicate ids are allowed; both sections must still be emitted
        assert_eq!(a.matches("id=\"setup\"").count(), 2);
    }

    #[test]
    fn test_render_is_idempotent() {
        let post = post_with(vec![PostSection {
            heading: "Stable".to_string(),
            content: "Deterministic output paragraph, long enough.".to_string(),
            code_examples: vec!["let y = 2;".to_string()],
        }]);
        let a = render_post(&post, "serverless cold starts");
        let b = render_post(&post, "serverless cold starts");
        assert_eq!(a.content_html, b.content_html);
        assert_eq!(a.toc_html, b.toc_html);
        assert_eq!(a.tags_html, b.tags_html);
        assert_eq!(a.read_time_minutes, b.read_time_minutes);
    }

    #[test]
    fn test_read_time_floors_at_one_minute() {
        assert_eq!(estimate_read_time("<p>short text</p>"), 1);
    }

    #[test]
    fn test_read_time_rounds_word_count() {
        let words = vec!["word"; 500].join(" ");
        let html = format!("<p>{}</p>", words);
        assert_eq!(estimate_read_time(&html), 3);
    }
}
