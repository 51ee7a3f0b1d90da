//! One-to-two sentence descriptions for courses and domains.

use tracing::{info, warn};

use crate::generation::prompts::{
    COURSE_DESCRIPTION_IMPROVE_PROMPT, COURSE_DESCRIPTION_PROMPT,
    DOMAIN_DESCRIPTION_IMPROVE_PROMPT, DOMAIN_DESCRIPTION_PROMPT,
};
use crate::generation::quality::{
    check_course_description, check_domain_description, DescriptionReport,
};
use crate::llm_client::prompts::PLAIN_TEXT_SYSTEM;
use crate::llm_client::{clean_plain_reply, LlmError, TextGenerator};

/// Cleans a description typed by a course creator: control characters are
/// removed and all lines are joined with single spaces.
pub fn normalize_user_description(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect::<String>()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uses the creator's description when there is one, otherwise asks the
/// model for one.
pub async fn generate_course_description(
    llm: &dyn TextGenerator,
    course_name: &str,
    provided: Option<&str>,
) -> Result<String, LlmError> {
    if let Some(text) = provided {
        let normalized = normalize_user_description(text);
        if !normalized.is_empty() {
            info!("Using user-provided description for course: {course_name}");
            return Ok(normalized);
        }
    }

    info!("Generating description for course: {course_name}");
    let prompt = COURSE_DESCRIPTION_PROMPT.replace("{course_name}", course_name);
    generate_checked(
        llm,
        &prompt,
        check_course_description,
        COURSE_DESCRIPTION_IMPROVE_PROMPT,
    )
    .await
}

pub async fn generate_domain_description(
    llm: &dyn TextGenerator,
    domain_name: &str,
) -> Result<String, LlmError> {
    info!("Generating description for domain: {domain_name}");
    let prompt = DOMAIN_DESCRIPTION_PROMPT.replace("{domain_name}", domain_name);
    generate_checked(
        llm,
        &prompt,
        check_domain_description,
        DOMAIN_DESCRIPTION_IMPROVE_PROMPT,
    )
    .await
}

/// Generate, score, and improve once if the score is under threshold.
/// A failed improvement keeps the first draft.
async fn generate_checked(
    llm: &dyn TextGenerator,
    prompt: &str,
    check: fn(&str) -> DescriptionReport,
    improve_template: &str,
) -> Result<String, LlmError> {
    let draft = clean_plain_reply(&llm.complete(prompt, PLAIN_TEXT_SYSTEM).await?);
    let report = check(&draft);
    info!("Description quality score: {}/100", report.quality_score);

    let feedback = report.actionable_feedback();
    if report.passes_threshold || feedback.is_empty() {
        return Ok(draft);
    }

    info!("Improving description quality");
    let improve_prompt = improve_template
        .replace("{description}", &draft)
        .replace("{feedback}", &feedback);
    match llm.complete(&improve_prompt, PLAIN_TEXT_SYSTEM).await {
        Ok(text) => {
            let improved = clean_plain_reply(&text);
            if improved.is_empty() {
                Ok(draft)
            } else {
                Ok(improved)
            }
        }
        Err(e) => {
            warn!("Improving description failed, keeping draft: {e}");
            Ok(draft)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;

    const GOOD: &str = "\"Master modern web development with JavaScript and React, building three \
                        production-ready apps while learning the patterns professional teams use.\"";

    #[test]
    fn test_normalize_user_description() {
        let text = "Learn Rust\r\n\r\n  from scratch\u{7}\n\tfast ";
        assert_eq!(normalize_user_description(text), "Learn Rust from scratch fast");
    }

    #[tokio::test]
    async fn test_user_description_skips_the_model() {
        let llm = ScriptedGenerator::new(Vec::<String>::new());
        let description = generate_course_description(&llm, "Rust", Some("My\ncourse"))
            .await
            .unwrap();
        assert_eq!(description, "My course");
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_blank_user_description_falls_back_to_model() {
        let llm = ScriptedGenerator::new([GOOD]);
        let description = generate_course_description(&llm, "Web", Some("  \n "))
            .await
            .unwrap();
        assert!(description.starts_with("Master modern web development"));
        assert!(!description.starts_with('"'));
        assert_eq!(llm.remaining(), 0);
    }

    #[tokio::test]
    async fn test_weak_description_is_improved_with_feedback() {
        let llm = ScriptedGenerator::new(["A course.", GOOD]);
        let description = generate_course_description(&llm, "Web", None).await.unwrap();
        assert!(description.starts_with("Master"));

        let prompts = llm.prompts();
        assert!(prompts[0].contains("course on \"Web\""));
        assert!(prompts[1].contains("\"A course.\""));
        assert!(prompts[1].contains("length: Description should be 1-2 concise sentences"));
        assert!(!prompts[1].contains("Good"));
    }

    #[tokio::test]
    async fn test_failed_improvement_keeps_draft() {
        let llm = ScriptedGenerator::from_results([
            Ok("Cooking.".to_string()),
            Err(LlmError::EmptyContent),
        ]);
        let description = generate_domain_description(&llm, "Cooking").await.unwrap();
        assert_eq!(description, "Cooking.");
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let llm = ScriptedGenerator::new(Vec::<String>::new());
        assert!(generate_domain_description(&llm, "Cooking").await.is_err());
    }
}
