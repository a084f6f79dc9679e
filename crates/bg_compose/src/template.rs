/// Replacement values for the recognized page template tokens.
#[derive(Debug, Clone, Default)]
pub struct TemplateValues {
    pub title: String,
    pub description: String,
    pub content: String,
    pub tags: String,
    pub date: String,
    pub read_time: String,
    pub category: String,
    pub toc: String,
}

/// Single-pass substitution over the enumerated token set. Each token is
/// replaced verbatim; replacement text is never re-scanned, and tokens
/// outside the known set pass through untouched.
pub fn apply_template(template: &str, values: &TemplateValues) -> String {
    let mut out = String::with_capacity(template.len() + values.content.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let token = &after[..end];
                match lookup(token, values) {
                    Some(replacement) => out.push_str(replacement),
                    None => {
                        out.push_str("{{");
                        out.push_str(token);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                // unterminated marker, keep the rest as-is
                out.push_str("{{");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn lookup<'a>(token: &str, values: &'a TemplateValues) -> Option<&'a str> {
    match token {
        "TITLE" => Some(&values.title),
        "DESCRIPTION" => Some(&values.description),
        "CONTENT" => Some(&values.content),
        "TAGS" => Some(&values.tags),
        "DATE" => Some(&values.date),
        "READ_TIME" => Some(&values.read_time),
        "CATEGORY" => Some(&values.category),
        "TOC" => Some(&values.toc),
        _ => None,
    }
}
