//! Lesson quality checks and one-shot improvement.
//!
//! Lessons start at 100 points and lose points per problem found; anything
//! under `PASS_THRESHOLD` with at least one suggestion is sent back to the
//! model once, in a labelled `Title:` / `Content:` / ... layout.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::generation::curriculum::bullet_list;
use crate::generation::lessons::{LessonDraft, ModuleContext};
use crate::generation::markdown::parse_sections;
use crate::generation::prompts::LESSON_IMPROVE_PROMPT;
use crate::llm_client::prompts::PLAIN_TEXT_SYSTEM;
use crate::llm_client::TextGenerator;
use crate::models::lesson::LessonType;

pub const PASS_THRESHOLD: f64 = 70.0;

const FORMATTING_MARKERS: &[&str] = &["**", "*", "```", "- ", "1. "];
const COMMENT_MARKERS: &[&str] = &["//", "/*", "#", "<!--", "\"\"\"", "'''"];
const ERROR_HANDLING_TERMS: &[&str] = &[
    "try", "catch", "except", "finally", "rescue", "raise", "throw", "error", "handle",
    "on error", "if err",
];
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "else", "when", "at", "from", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "of", "in", "on", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "having", "do", "does", "did", "doing", "this", "that", "these",
    "those", "will", "would", "shall", "should", "can", "could", "may", "might",
];

static SECTION_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"##\s+\w+").expect("valid heading regex"));
static CODE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(.*?)```").expect("valid code block regex"));
static NUMBERED_STEP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+[.)]\s").expect("valid step regex"));
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid word regex"));

static IMPROVED_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Title:[ \t]*(.*?)(?:\n|$)").expect("valid title regex"));
static IMPROVED_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)Content:\s*(.*?)(?:\n\n(?:Instruction:|Expected Output:|Answer:)|$)")
        .expect("valid content regex")
});
static IMPROVED_INSTRUCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)Instruction:\s*(.*?)(?:\n\n(?:Expected Output:|Answer:)|$)")
        .expect("valid instruction regex")
});
static IMPROVED_OUTPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)Expected Output:\s*(.*?)(?:\n\nAnswer:|$)").expect("valid output regex")
});
static IMPROVED_ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Answer:\s*(.*)$").expect("valid answer regex"));

// ────────────────────────────────────────────────────────────────────────────
// Report types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct StructureCheck {
    pub has_sections: bool,
    pub content_length: usize,
    pub paragraph_count: usize,
    pub has_formatting: bool,
    pub is_good: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeCheck {
    pub has_comments: bool,
    pub has_proper_indentation: bool,
    pub has_error_handling: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseCheck {
    pub has_clear_steps: bool,
    pub has_clear_output: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelevanceCheck {
    pub is_relevant: bool,
    pub keyword_relevance: f64,
    pub irrelevant_sections: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonEvaluation {
    pub lesson_id: String,
    pub quality_score: f64,
    pub passes_threshold: bool,
    pub structure: StructureCheck,
    /// `None` when the content has no fenced code.
    pub code: Option<CodeCheck>,
    /// `None` for reading lessons.
    pub exercise: Option<ExerciseCheck>,
    pub relevance: RelevanceCheck,
    pub improvement_suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleLessonReport {
    pub module_id: String,
    pub average_quality_score: f64,
    pub passes_threshold: bool,
    pub lessons_below_threshold: usize,
    pub has_good_type_mix: bool,
    pub improvement_suggestions: Vec<String>,
    pub lesson_evaluations: Vec<LessonEvaluation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseLessonReport {
    pub overall_quality_score: f64,
    pub passes_threshold: bool,
    pub improvement_suggestions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Individual checks
// ────────────────────────────────────────────────────────────────────────────

pub fn check_structure(content: &str) -> StructureCheck {
    let has_sections = SECTION_HEADING.is_match(content);
    let content_length = content.chars().count();
    let paragraph_count = content.matches("\n\n").count();
    let has_formatting = FORMATTING_MARKERS.iter().any(|m| content.contains(m));

    StructureCheck {
        has_sections,
        content_length,
        paragraph_count,
        has_formatting,
        is_good: has_sections && content_length > 500 && paragraph_count >= 3 && has_formatting,
    }
}

pub fn check_code(code: &str) -> Option<CodeCheck> {
    if code.trim().is_empty() {
        return None;
    }

    // The first line is usually the fence language tag.
    let indent_levels: BTreeSet<usize> = code
        .lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .collect();
    let lower = code.to_lowercase();

    Some(CodeCheck {
        has_comments: COMMENT_MARKERS.iter().any(|m| code.contains(m)),
        has_proper_indentation: indent_levels.len() <= 3,
        has_error_handling: ERROR_HANDLING_TERMS.iter().any(|t| lower.contains(t)),
    })
}

pub fn check_exercise(lesson: &LessonDraft) -> Option<ExerciseCheck> {
    if lesson.lesson_type != LessonType::ReadAndExecute {
        return None;
    }
    let instruction = lesson.instruction.as_deref().unwrap_or("");
    let expected = lesson.expected_output.as_deref().unwrap_or("");

    Some(ExerciseCheck {
        has_clear_steps: NUMBERED_STEP.is_match(instruction) || instruction.contains("Step"),
        has_clear_output: expected.chars().count() > 20,
    })
}

/// Lower-case words longer than two characters, stop words removed.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    let cleaned = NON_WORD.replace_all(&text.to_lowercase(), " ").into_owned();
    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

pub fn check_relevance(lesson: &LessonDraft, module: &ModuleContext<'_>) -> RelevanceCheck {
    let mut keywords = extract_keywords(module.title);
    keywords.extend(extract_keywords(module.description));

    if keywords.is_empty() {
        return RelevanceCheck {
            is_relevant: true,
            keyword_relevance: 1.0,
            irrelevant_sections: Vec::new(),
        };
    }

    let share = |text: &str| {
        let lower = text.to_lowercase();
        let hits = keywords.iter().filter(|k| lower.contains(k.as_str())).count();
        hits as f64 / keywords.len() as f64
    };

    let keyword_relevance = share(&format!("{} {}", lesson.title, lesson.content));
    let irrelevant_sections: Vec<String> = parse_sections(&lesson.content)
        .into_iter()
        .filter(|s| share(&s.body) < 0.2)
        .map(|s| s.heading)
        .collect();

    RelevanceCheck {
        is_relevant: keyword_relevance >= 0.3 && irrelevant_sections.len() <= 1,
        keyword_relevance,
        irrelevant_sections,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

pub fn evaluate_lesson(lesson: &LessonDraft, module: &ModuleContext<'_>) -> LessonEvaluation {
    let structure = check_structure(&lesson.content);
    let code_blocks: Vec<&str> = CODE_BLOCK
        .captures_iter(&lesson.content)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    let code = check_code(&code_blocks.join("\n"));
    let exercise = check_exercise(lesson);
    let relevance = check_relevance(lesson, module);

    let mut score: i32 = 100;
    let mut suggestions = Vec::new();

    if !structure.is_good {
        score -= 20;
        if !structure.has_sections {
            suggestions.push("Add section headers to organize content".to_string());
        }
        if structure.content_length < 300 {
            suggestions.push("Expand the content with more detailed explanations".to_string());
        }
        if structure.paragraph_count < 3 {
            suggestions.push("Break content into more paragraphs for readability".to_string());
        }
        if !structure.has_formatting {
            suggestions
                .push("Add formatting elements like bold, italic, lists, or code blocks".to_string());
        }
    }
    if structure.content_length < 300 {
        score -= 15;
    }
    if !structure.has_sections {
        score -= 15;
    }
    if !structure.has_formatting {
        score -= 10;
    }

    if let Some(code) = &code {
        if !code.has_comments {
            score -= 10;
            suggestions.push("Add comments to code examples".to_string());
        }
        if !code.has_proper_indentation {
            score -= 10;
            suggestions.push("Fix code indentation".to_string());
        }
        if !code.has_error_handling {
            score -= 5;
            suggestions.push("Add error handling to code examples".to_string());
        }
    }

    if let Some(exercise) = &exercise {
        if !exercise.has_clear_steps {
            score -= 15;
            suggestions.push("Add numbered steps to exercise instructions".to_string());
        }
        if !exercise.has_clear_output {
            score -= 10;
            suggestions.push("Provide clearer description of expected output".to_string());
        }
    }

    if !relevance.is_relevant {
        score -= 25;
        suggestions.push("Rewrite content to focus specifically on the module topic".to_string());
        if !relevance.irrelevant_sections.is_empty() {
            suggestions.push(format!(
                "Revise these sections to be more module-specific: {}",
                relevance.irrelevant_sections.join(", ")
            ));
        }
    }

    let quality_score = f64::from(score.clamp(0, 100));
    LessonEvaluation {
        lesson_id: lesson.lesson_id.clone(),
        quality_score,
        passes_threshold: quality_score >= PASS_THRESHOLD,
        structure,
        code,
        exercise,
        relevance,
        improvement_suggestions: suggestions,
    }
}

pub fn check_module_lessons(
    lessons: &[LessonDraft],
    module: &ModuleContext<'_>,
) -> ModuleLessonReport {
    let lesson_evaluations: Vec<LessonEvaluation> =
        lessons.iter().map(|l| evaluate_lesson(l, module)).collect();

    let total: f64 = lesson_evaluations.iter().map(|e| e.quality_score).sum();
    let average_quality_score = total / lessons.len().max(1) as f64;
    let lessons_below_threshold = lesson_evaluations
        .iter()
        .filter(|e| !e.passes_threshold)
        .count();

    let read_count = lessons.iter().filter(|l| !l.is_exercise()).count();
    let practice_count = lessons.len() - read_count;
    let has_good_type_mix = read_count > 0 && practice_count > 0;

    let mut improvement_suggestions = Vec::new();
    if lessons_below_threshold > 0 {
        improvement_suggestions.push(format!(
            "Improve {lessons_below_threshold} lessons below quality threshold"
        ));
    }
    if practice_count == 0 {
        improvement_suggestions.push("Add practical exercises to the module".to_string());
    } else if read_count == 0 {
        improvement_suggestions.push("Add theoretical lessons to the module".to_string());
    }

    ModuleLessonReport {
        module_id: module.module_id.to_string(),
        average_quality_score,
        passes_threshold: average_quality_score >= PASS_THRESHOLD,
        lessons_below_threshold,
        has_good_type_mix,
        improvement_suggestions,
        lesson_evaluations,
    }
}

pub fn check_course_lessons(modules: &[ModuleLessonReport]) -> CourseLessonReport {
    let overall_quality_score = if modules.is_empty() {
        0.0
    } else {
        modules.iter().map(|m| m.average_quality_score).sum::<f64>() / modules.len() as f64
    };

    let mut improvement_suggestions = Vec::new();
    if overall_quality_score < PASS_THRESHOLD {
        improvement_suggestions.push("The overall course quality needs improvement".to_string());
    }
    let weak: Vec<&str> = modules
        .iter()
        .filter(|m| !m.passes_threshold)
        .map(|m| m.module_id.as_str())
        .collect();
    if !weak.is_empty() {
        improvement_suggestions.push(format!("Modules that need improvement: {}", weak.join(", ")));
    }
    let unmixed: Vec<&str> = modules
        .iter()
        .filter(|m| !m.has_good_type_mix)
        .map(|m| m.module_id.as_str())
        .collect();
    if !unmixed.is_empty() {
        improvement_suggestions.push(format!(
            "Add more practical exercises to modules: {}",
            unmixed.join(", ")
        ));
    }

    CourseLessonReport {
        overall_quality_score,
        passes_threshold: overall_quality_score >= PASS_THRESHOLD,
        improvement_suggestions,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Improvement
// ────────────────────────────────────────────────────────────────────────────

/// Improves every failing lesson of a module once. Returns the lessons in
/// their original order.
pub async fn improve_module_lessons(
    llm: &dyn TextGenerator,
    lessons: Vec<LessonDraft>,
    report: &ModuleLessonReport,
    module: &ModuleContext<'_>,
) -> Vec<LessonDraft> {
    let mut out = Vec::with_capacity(lessons.len());
    for (lesson, evaluation) in lessons.into_iter().zip(&report.lesson_evaluations) {
        if evaluation.passes_threshold {
            out.push(lesson);
            continue;
        }
        info!(
            "Improving lesson: {} (score: {}/100)",
            lesson.title, evaluation.quality_score
        );
        out.push(improve_lesson(llm, lesson, evaluation, module).await);
    }
    out
}

pub async fn improve_lesson(
    llm: &dyn TextGenerator,
    lesson: LessonDraft,
    evaluation: &LessonEvaluation,
    module: &ModuleContext<'_>,
) -> LessonDraft {
    if evaluation.passes_threshold || evaluation.improvement_suggestions.is_empty() {
        return lesson;
    }

    let exercise_fields = [
        ("Instruction", &lesson.instruction),
        ("Expected Output", &lesson.expected_output),
        ("Answer", &lesson.answer),
    ]
    .iter()
    .filter_map(|(label, value)| value.as_deref().map(|v| format!("{label}: {v}")))
    .collect::<Vec<_>>()
    .join("\n");

    let prompt = LESSON_IMPROVE_PROMPT
        .replace("{suggestions}", &bullet_list(&evaluation.improvement_suggestions))
        .replace("{module_title}", module.title)
        .replace("{module_description}", module.description)
        .replace("{lesson_title}", &lesson.title)
        .replace("{lesson_type}", lesson.lesson_type.as_str())
        .replace("{content}", &lesson.content)
        .replace("{exercise_fields}", &exercise_fields);

    match llm.complete(&prompt, PLAIN_TEXT_SYSTEM).await {
        Ok(reply) => {
            let improved = apply_improvement(lesson, &reply);
            info!("Improved lesson: {}", improved.title);
            improved
        }
        Err(e) => {
            warn!("Improving lesson '{}' failed, keeping it: {e}", lesson.title);
            lesson
        }
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Pulls labelled fields out of an improvement reply. Missing labels keep
/// the current value; exercise fields only apply to hands-on lessons.
fn apply_improvement(mut lesson: LessonDraft, reply: &str) -> LessonDraft {
    if let Some(title) = capture(&IMPROVED_TITLE, reply) {
        lesson.title = title;
    }
    if let Some(content) = capture(&IMPROVED_CONTENT, reply) {
        lesson.content = content;
    }
    if lesson.is_exercise() {
        if let Some(instruction) = capture(&IMPROVED_INSTRUCTION, reply) {
            lesson.instruction = Some(instruction);
        }
        if let Some(output) = capture(&IMPROVED_OUTPUT, reply) {
            lesson.expected_output = Some(output);
        }
        if let Some(answer) = capture(&IMPROVED_ANSWER, reply) {
            lesson.answer = Some(answer);
        }
    }
    lesson
}
