/// Builds the single prompt sent to every backend. The response is asked
/// for as one strict JSON object so the extraction pipeline has a chance
/// of parsing it directly.
pub fn build_prompt(topic: &str) -> String {
    format!(
        r#"Write a detailed technical blog article on the following topic:

Topic: {topic}

Respond with a single JSON object only, no surrounding prose and no Markdown
fences, using exactly this shape:

{{
  "title": "Blog title",
  "description": "Short description/intro, one or two sentences",
  "sections": [
    {{
      "heading": "Section heading",
      "content": "Section body text. Separate paragraphs with a blank line.",
      "code_examples": ["optional code snippet"]
    }}
  ],
  "tags": ["short tag"],
  "read_time": 5
}}

Aim for four to six sections with concrete technical depth."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_topic() {
        let prompt = build_prompt("Cold starts in serverless functions");
        assert!(prompt.contains("Cold starts in serverless functions"));
        assert!(prompt.contains("JSON object"));
        assert!(prompt.contains("read_time"));
    }
}
