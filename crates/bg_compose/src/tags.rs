/// Keyword-to-label table used to derive display tags from the topic
/// line. Matching is case-insensitive substring containment; several
/// keywords may map to the same label.
const TAG_KEYWORDS: &[(&str, &str)] = &[
    ("serverless", "Serverless"),
    ("lambda", "AWS Lambda"),
    ("cold", "Cold Start"),
    ("start", "Cold Start"),
    ("aws", "AWS"),
    ("azure", "Azure"),
    ("cloud", "Cloud"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("container", "Containers"),
    ("event", "Event-Driven"),
    ("queue", "Messaging"),
    ("architecture", "Architecture"),
    ("microservice", "Microservices"),
    ("api", "API Design"),
    ("database", "Database"),
    ("cache", "Caching"),
    ("security", "Security"),
    ("performance", "Performance"),
    ("rust", "Rust"),
    ("python", "Python"),
    ("javascript", "JavaScript"),
];

const DEFAULT_TAGS: &[&str] = &["Cloud", "Engineering"];

/// Tags for a topic line. Identical labels collapse to one entry; no
/// other deduplication. Topics matching nothing get the generic pair.
pub fn tags_for_topic(topic: &str) -> Vec<String> {
    let lowered = topic.to_lowercase();
    let mut tags: Vec<String> = Vec::new();
    for (keyword, label) in TAG_KEYWORDS {
        if lowered.contains(keyword) && !tags.iter().any(|t| t == label) {
            tags.push((*label).to_string());
        }
    }
    if tags.is_empty() {
        tags = DEFAULT_TAGS.iter().map(|t| t.to_string()).collect();
    }
    tags
}

pub fn tags_html(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("<span class=\"tag\">{}</span>", t))
        .collect::<Vec<_>>()
        .join("\n")
}
