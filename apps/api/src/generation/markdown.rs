//! Markdown helpers for generated lesson bodies.
//!
//! Both functions work line by line and track whether they are inside a
//! fenced code block, so code is never re-formatted or split into sections.

use once_cell::sync::Lazy;
use regex::Regex;

/// `##Title` / `###Title` with no space after the hashes.
static TIGHT_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{2,3})([^\s#])").expect("valid heading regex"));

/// `- item` bullets, with any leading indentation.
static DASH_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)-\s").expect("valid bullet regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// Splits `text` on `## ` headings. Text before the first heading is dropped
/// and bodies are trimmed.
pub fn parse_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;
    let mut in_fence = false;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        if !in_fence && line.starts_with("## ") {
            if let Some((heading, body)) = current.take() {
                sections.push(Section {
                    heading,
                    body: body.join("\n").trim().to_string(),
                });
            }
            current = Some((line[3..].trim().to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }

    if let Some((heading, body)) = current {
        sections.push(Section {
            heading,
            body: body.join("\n").trim().to_string(),
        });
    }
    sections
}

/// Canonical key for a heading: lower case, with runs of spaces,
/// underscores and punctuation collapsed to a single `_`.
/// "Expected Output", "expected_output" and "Expected output:" all map to
/// `expected_output`.
pub fn section_key(heading: &str) -> String {
    heading
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Makes model-written markdown consistent.
///
/// Outside code fences: headings get a space after their hashes, `-` bullets
/// become `*`, and every `##`/`###` heading is followed by a blank line.
/// Bare opening fences are tagged `text` and a blank line follows each
/// closing fence.
pub fn normalize(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_fence = false;
    let mut needs_gap = false;

    for line in text.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") {
            if needs_gap && !in_fence {
                out.push(String::new());
            }
            needs_gap = false;
            if in_fence {
                out.push(line.to_string());
                in_fence = false;
                needs_gap = true;
            } else {
                in_fence = true;
                if trimmed.trim_end() == "```" {
                    let indent = &line[..line.len() - trimmed.len()];
                    out.push(format!("{indent}```text"));
                } else {
                    out.push(line.to_string());
                }
            }
            continue;
        }

        if in_fence {
            out.push(line.to_string());
            continue;
        }

        if needs_gap && !line.trim().is_empty() {
            out.push(String::new());
        }
        needs_gap = false;

        let fixed = TIGHT_HEADING.replace(line, "$1 $2");
        let fixed = DASH_BULLET.replace(&fixed, "$1* ");
        needs_gap = fixed.starts_with("## ") || fixed.starts_with("### ");
        out.push(fixed.into_owned());
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_in_order() {
        let text = "preamble\n## Intro\nHello\n\n## Expected Output\n  42  \n## Answer\n";
        let sections = parse_sections(text);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].heading, "Intro");
        assert_eq!(sections[0].body, "Hello");
        assert_eq!(sections[1].heading, "Expected Output");
        assert_eq!(sections[1].body, "42");
        assert_eq!(sections[2].body, "");
    }

    #[test]
    fn test_parse_sections_ignores_headings_in_code() {
        let text = "## Shell\n```bash\n## not a heading\n```\n## Next\nbody";
        let sections = parse_sections(text);
        assert_eq!(sections.len(), 2);
        assert!(sections[0].body.contains("## not a heading"));
    }

    #[test]
    fn test_parse_sections_without_headings() {
        assert!(parse_sections("just text").is_empty());
        // ### is a subsection, not a split point
        assert!(parse_sections("### Sub\ntext").is_empty());
    }

    #[test]
    fn test_section_key_normalizes() {
        assert_eq!(section_key("Expected Output"), "expected_output");
        assert_eq!(section_key("expected_output"), "expected_output");
        assert_eq!(section_key("  Answer: "), "answer");
        assert_eq!(section_key("INSTRUCTION"), "instruction");
    }

    #[test]
    fn test_normalize_headings_and_bullets() {
        let out = normalize("##Intro\nText\n###Detail\n- one\n  - two");
        assert_eq!(out, "## Intro\n\nText\n### Detail\n\n* one\n  * two");
    }

    #[test]
    fn test_normalize_tags_bare_fences_only() {
        let out = normalize("```\nx = 1\n```\nafter");
        assert_eq!(out, "```text\nx = 1\n```\n\nafter");

        let tagged = normalize("```python\nprint(1)\n```");
        assert_eq!(tagged, "```python\nprint(1)\n```");
    }

    #[test]
    fn test_normalize_leaves_code_untouched() {
        let code = "```yaml\n- item\n##raw\n```";
        assert_eq!(normalize(code), code);
    }

    #[test]
    fn test_normalize_keeps_existing_blank_lines() {
        let text = "## Intro\n\nBody";
        assert_eq!(normalize(text), text);
    }
}
