use bg_core::{BlogPost, PostSection};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_READ_TIME: u32 = 5;
const UNPARSED_MESSAGE: &str =
    "The generated content could not be parsed. Review the raw draft manually before publishing.";

/// Wire shape the backends are asked to produce. Every field is optional
/// on the wire; coercion to safe defaults happens here, at the parse
/// boundary, so nothing downstream ever sees an untyped map.
#[derive(Debug, Deserialize)]
struct RawPost {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    sections: Vec<RawSection>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    read_time: u32,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    code_examples: Vec<String>,
}

lazy_static! {
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",\s*([}\]])").unwrap();
    static ref TITLE_RE: Regex =
        Regex::new(r#""title"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap();
    static ref SECTION_RE: Regex = Regex::new(
        r#"\{\s*"heading"\s*:\s*"((?:[^"\\]|\\.)*)"\s*,\s*"content"\s*:\s*"((?:[^"\\]|\\.)*)""#
    )
    .unwrap();
    static ref CONTENT_RE: Regex =
        Regex::new(r#""content"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap();
}

/// Turn a raw backend response into a renderable post. Total: whatever the
/// backend sent back (fenced, truncated, prose-wrapped, or plain garbage),
/// this returns a post with at least one section and never errors. Recovery
/// stages run in strict order, each only when the previous one produced no
/// section with actual body text.
pub fn extract_post(raw: &str, topic: &str) -> BlogPost {
    let cleaned = strip_code_fences(raw);

    // direct parse of the (unfenced) response
    if let Some(post) = parse_post(cleaned, topic) {
        if post.has_content() {
            return post;
        }
    }

    // the model often wraps the JSON in prose; retry on the outermost
    // brace-to-brace span
    if let Some(span) = json_span(cleaned) {
        if let Some(post) = parse_post(span, topic) {
            if post.has_content() {
                return post;
            }
        }

        // responses cut off by the output token limit are the common case
        // here; repair and retry once
        let repaired = repair_truncated_json(span);
        if let Some(post) = parse_post(&repaired, topic) {
            if post.has_content() {
                debug!("🩹 Recovered post from truncated response");
                return post;
            }
        }
    }

    // structured parsing is a lost cause; pull individual fields out of the
    // raw text instead
    if let Some(post) = extract_fields(raw, topic) {
        debug!("🩹 Recovered {} section(s) via field extraction", post.sections.len());
        return post;
    }

    if let Some(post) = salvage_content(raw, topic) {
        debug!("🩹 Salvaged a single content field");
        return post;
    }

    warn!("⚠️ No structured content could be recovered, using placeholder post");
    fallback_post(topic)
}

/// Remove a leading ```json (or bare ```) fence and the matching closing
/// fence. Text without a leading fence is only trimmed.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let rest = trimmed.trim_start_matches('`');
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start();
    let rest = rest.trim_end_matches('`').trim_end();
    rest
}

/// The substring between the first `{` and the last `}` inclusive, if both
/// exist in that order.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_post(text: &str, topic: &str) -> Option<BlogPost> {
    serde_json::from_str::<RawPost>(text)
        .ok()
        .map(|raw| map_raw(raw, topic))
}

fn map_raw(raw: RawPost, topic: &str) -> BlogPost {
    let title = if raw.title.trim().is_empty() {
        topic.to_string()
    } else {
        raw.title
    };
    let sections = raw
        .sections
        .into_iter()
        .enumerate()
        .map(|(i, s)| PostSection {
            heading: if s.heading.trim().is_empty() {
                format!("Section {}", i + 1)
            } else {
                s.heading
            },
            content: s.content,
            code_examples: s.code_examples,
        })
        .collect();
    BlogPost {
        title,
        description: raw.description,
        sections,
        tags: raw.tags,
        read_time_minutes: if raw.read_time == 0 {
            DEFAULT_READ_TIME
        } else {
            raw.read_time
        },
    }
}

/// Best-effort repair of a response cut off mid-object: drop trailing
/// commas, close an unterminated string, then balance whatever braces and
/// brackets are still open (string contents are skipped while counting).
/// Not guaranteed to produce valid JSON; the caller re-parses exactly once.
fn repair_truncated_json(snippet: &str) -> String {
    let mut repaired = TRAILING_COMMA_RE.replace_all(snippet, "$1").to_string();
    repaired.truncate(repaired.trim_end().len());
    if repaired.ends_with(',') {
        repaired.pop();
    }

    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in repaired.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.last() == Some(&c) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    if in_string {
        repaired.push('"');
    }
    while let Some(closer) = stack.pop() {
        repaired.push(closer);
    }
    repaired
}

/// Rebuild a partial post from `"title"` and `{"heading", "content"}`
/// shaped fragments found anywhere in the text. Sections recovered this
/// way never carry code examples; snippet boundaries inside partially
/// matched text cannot be trusted.
fn extract_fields(raw: &str, topic: &str) -> Option<BlogPost> {
    let sections: Vec<PostSection> = SECTION_RE
        .captures_iter(raw)
        .map(|cap| PostSection {
            heading: unescape(&cap[1]),
            content: unescape(&cap[2]),
            code_examples: Vec::new(),
        })
        .filter(|s| !s.content.trim().is_empty())
        .collect();
    if sections.is_empty() {
        return None;
    }

    let title = TITLE_RE
        .captures(raw)
        .map(|cap| unescape(&cap[1]))
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| topic.to_string());

    Some(BlogPost {
        title,
        description: String::new(),
        sections,
        tags: Vec::new(),
        read_time_minutes: DEFAULT_READ_TIME,
    })
}

/// Last recovery stage before giving up: any `"content": "..."` field at
/// all becomes the body of a single introduction section.
fn salvage_content(raw: &str, topic: &str) -> Option<BlogPost> {
    let content = CONTENT_RE
        .captures(raw)
        .map(|cap| unescape(&cap[1]))
        .filter(|c| !c.trim().is_empty())?;
    Some(BlogPost {
        title: topic.to_string(),
        description: String::new(),
        sections: vec![PostSection {
            heading: "Introduction".to_string(),
            content,
            code_examples: Vec::new(),
        }],
        tags: Vec::new(),
        read_time_minutes: DEFAULT_READ_TIME,
    })
}

fn fallback_post(topic: &str) -> BlogPost {
    BlogPost {
        title: topic.to_string(),
        description: String::new(),
        sections: vec![PostSection {
            heading: "Introduction".to_string(),
            content: UNPARSED_MESSAGE.to_string(),
            code_examples: Vec::new(),
        }],
        tags: Vec::new(),
        read_time_minutes: DEFAULT_READ_TIME,
    }
}

/// Undo JSON string escapes in regex-captured text.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "title": "Understanding Cold Starts",
        "description": "Why serverless functions stall on first invocation.",
        "sections": [
            {"heading": "Intro", "content": "Cold starts add latency to the first request.", "code_examples": []},
            {"heading": "Mitigation", "content": "Keep functions warm or trim dependencies.", "code_examples": ["const x = 1;"]}
        ],
        "tags": ["serverless"],
        "read_time": 7
    }"#;

    #[test]
    fn test_direct_parse_maps_fields() {
        let post = extract_post(VALID, "fallback topic");
        assert_eq!(post.title, "Understanding Cold Starts");
        assert_eq!(post.sections.len(), 2);
        assert_eq!(post.sections[1].code_examples, vec!["const x = 1;"]);
        assert_eq!(post.read_time_minutes, 7);
    }

    #[test]
    fn test_missing_optional_fields_are_defaulted() {
        let raw = r#"{"title": "T", "sections": [{"content": "Body text without a heading."}]}"#;
        let post = extract_post(raw, "fallback");
        assert_eq!(post.sections[0].heading, "Section 1");
        assert!(post.sections[0].code_examples.is_empty());
        assert!(post.tags.is_empty());
        assert_eq!(post.read_time_minutes, DEFAULT_READ_TIME);
        assert_eq!(post.description, "");
    }

    #[test]
    fn test_fenced_response_equals_unfenced() {
        let fenced = format!("```json\n{}\n```", VALID);
        let a = extract_post(&fenced, "fallback");
        let b = extract_post(VALID, "fallback");
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_prose_wrapped_json_is_recovered() {
        let wrapped = format!("Sure, here is your article!\n\n{}\n\nLet me know!", VALID);
        let a = extract_post(&wrapped, "fallback");
        let b = extract_post(VALID, "fallback");
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_truncated_object_is_repaired() {
        let raw = r#"{"title":"X","description":"Y","sections":[{"heading":"Intro","content":"Hello world this is long enough"}"#;
        let post = extract_post(raw, "fallback");
        assert_eq!(post.title, "X");
        assert_eq!(post.sections.len(), 1);
        assert_eq!(post.sections[0].heading, "Intro");
        assert_eq!(post.sections[0].content, "Hello world this is long enough");
    }

    #[test]
    fn test_truncated_mid_string_is_repaired() {
        let raw = r#"{"title":"Queues","sections":[{"heading":"Intro","content":"The response stops mid sent"#;
        let post = extract_post(raw, "fallback");
        assert_eq!(post.title, "Queues");
        assert!(post.sections[0].content.starts_with("The response stops"));
    }

    #[test]
    fn test_trailing_comma_is_repaired() {
        let raw = r#"{"title":"T","sections":[{"heading":"A","content":"Body text here"},"#;
        let post = extract_post(raw, "fallback");
        assert_eq!(post.title, "T");
        assert_eq!(post.sections.len(), 1);
    }

    #[test]
    fn test_field_extraction_recovers_partial_sections() {
        // invalid between the braces, so every structured stage fails
        let raw = r#"Sure! {"title": "Broken Draft", oops not json
            {"heading": "One", "content": "First recovered body text"}
            {"heading": "Two", "content": "Second recovered body text"}"#;
        let post = extract_post(raw, "fallback");
        assert_eq!(post.title, "Broken Draft");
        assert_eq!(post.sections.len(), 2);
        assert_eq!(post.sections[0].heading, "One");
        assert_eq!(post.sections[1].content, "Second recovered body text");
        assert!(post.sections.iter().all(|s| s.code_examples.is_empty()));
    }

    #[test]
    fn test_field_extraction_unescapes_strings() {
        let raw = r#"nope {"heading": "A \"quoted\" heading", "content": "line one\nline two"} nope"#;
        let post = extract_post(raw, "fallback");
        assert_eq!(post.sections[0].heading, "A \"quoted\" heading");
        assert_eq!(post.sections[0].content, "line one\nline two");
    }

    #[test]
    fn test_single_content_field_is_salvaged() {
        let raw = r#"garbage before "content": "Only this text survived" garbage after"#;
        let post = extract_post(raw, "Event-driven architecture");
        assert_eq!(post.title, "Event-driven architecture");
        assert_eq!(post.sections.len(), 1);
        assert_eq!(post.sections[0].heading, "Introduction");
        assert_eq!(post.sections[0].content, "Only this text survived");
    }

    #[test]
    fn test_plain_prose_falls_back_to_placeholder() {
        let post = extract_post("Cold starts are bad. The end.", "Cold starts");
        assert_eq!(post.sections.len(), 1);
        assert_eq!(post.sections[0].heading, "Introduction");
        assert!(post.sections[0].content.contains("could not be parsed"));
    }

    #[test]
    fn test_extract_is_total() {
        for raw in ["", "   ", "{}", "[1,2,3]", "{\"foo\": 1}", "\u{0000}\u{fffd}%$#@!"] {
            let post = extract_post(raw, "some topic");
            assert!(!post.sections.is_empty(), "no sections for input {:?}", raw);
            assert!(post.has_content());
            assert_eq!(post.title, "some topic");
        }
    }

    #[test]
    fn test_wrong_shape_json_with_zero_sections_degrades() {
        // parses fine, but yields no contentful section, so later stages run
        let raw = r#"{"title": "Shape", "sections": []}"#;
        let post = extract_post(raw, "fallback");
        assert_eq!(post.sections[0].heading, "Introduction");
        assert!(post.sections[0].content.contains("could not be parsed"));
    }

    #[test]
    fn test_repair_balances_nested_delimiters() {
        let repaired = repair_truncated_json(r#"{"a": [{"b": "c"#);
        assert_eq!(repaired, r#"{"a": [{"b": "c"}]}"#);
    }

    #[test]
    fn test_repair_ignores_braces_inside_strings() {
        let repaired = repair_truncated_json(r#"{"code": "if x { y }""#);
        assert_eq!(repaired, r#"{"code": "if x { y }"}"#);
    }
}
