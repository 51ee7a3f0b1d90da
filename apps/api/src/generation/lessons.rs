//! Lesson stage: module → lesson outlines → expanded lesson content.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::generation::curriculum::EnhancedModule;
use crate::generation::markdown::{normalize, parse_sections, section_key};
use crate::generation::prompts::{
    LESSON_EXPAND_BASIC_INTRO, LESSON_EXPAND_BODY, LESSON_EXPAND_INTRO,
    LESSON_OUTLINE_BASIC_PROMPT, LESSON_OUTLINE_PROMPT, LESSON_OUTLINE_SCHEMA,
};
use crate::ids::unique_id;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, PLAIN_TEXT_SYSTEM};
use crate::llm_client::{complete_json, LlmError, TextGenerator};
use crate::models::lenient_string;
use crate::models::lesson::LessonType;

/// Course level whose lessons are written for learners aged 11–16.
pub const KIDS_LEVEL: &str = "basic";

const EXERCISE_SECTIONS: [&str; 3] = ["instruction", "expected_output", "answer"];

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// The module fields lesson prompts and relevance checks need.
#[derive(Debug, Clone, Copy)]
pub struct ModuleContext<'a> {
    pub module_id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    /// Course level, e.g. "basic" or "advanced".
    pub level: &'a str,
}

impl<'a> ModuleContext<'a> {
    pub fn new(module: &'a EnhancedModule, level: &'a str) -> Self {
        Self {
            module_id: &module.module_id,
            title: &module.title,
            description: &module.description,
            level,
        }
    }

    pub fn is_kids_level(&self) -> bool {
        self.level.trim().eq_ignore_ascii_case(KIDS_LEVEL)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LessonDraft {
    pub lesson_id: String,
    pub title: String,
    pub lesson_type: LessonType,
    pub content: String,
    pub instruction: Option<String>,
    pub expected_output: Option<String>,
    pub answer: Option<String>,
    /// The outline text the content was expanded from.
    pub outline: Option<String>,
}

impl LessonDraft {
    pub fn is_exercise(&self) -> bool {
        self.lesson_type == LessonType::ReadAndExecute
    }
}

#[derive(Debug, Deserialize)]
struct OutlineReply {
    #[serde(default)]
    lessons: Vec<OutlineLesson>,
}

#[derive(Debug, Deserialize)]
struct OutlineLesson {
    #[serde(default, deserialize_with = "lenient_string")]
    title: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    lesson_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    content: String,
    #[serde(default)]
    instruction: Option<String>,
    #[serde(default)]
    expected_output: Option<String>,
    #[serde(default)]
    answer: Option<String>,
}

/// Anything that is not clearly a hands-on lesson is treated as reading.
fn lesson_type_from_label(label: &str) -> LessonType {
    if section_key(label) == "read_and_execute" {
        LessonType::ReadAndExecute
    } else {
        LessonType::Read
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Stage entry point
// ────────────────────────────────────────────────────────────────────────────

/// Outlines and expands every lesson of one module, sequentially.
pub async fn generate_module_lessons(
    llm: &dyn TextGenerator,
    module: &ModuleContext<'_>,
) -> Result<Vec<LessonDraft>, LlmError> {
    let outlines = outline_lessons(llm, module).await?;

    let mut lessons = Vec::with_capacity(outlines.len());
    for outline in outlines {
        lessons.push(expand_lesson(llm, outline, module).await);
    }
    Ok(lessons)
}

pub async fn outline_lessons(
    llm: &dyn TextGenerator,
    module: &ModuleContext<'_>,
) -> Result<Vec<LessonDraft>, LlmError> {
    let template = if module.is_kids_level() {
        LESSON_OUTLINE_BASIC_PROMPT
    } else {
        LESSON_OUTLINE_PROMPT
    };
    let prompt = template
        .replace("{title}", module.title)
        .replace("{description}", module.description)
        .replace("{module_id}", module.module_id)
        .replace("{lesson_outline_schema}", LESSON_OUTLINE_SCHEMA);

    info!("Generating lesson outlines for module: {}", module.title);
    let reply: OutlineReply = complete_json(llm, &prompt, JSON_ONLY_SYSTEM).await?;
    if reply.lessons.is_empty() {
        return Err(LlmError::EmptyContent);
    }

    Ok(reply
        .lessons
        .into_iter()
        .map(|l| {
            let lesson_type = lesson_type_from_label(&l.lesson_type);
            let exercise = lesson_type == LessonType::ReadAndExecute;
            LessonDraft {
                lesson_id: unique_id("LESSON"),
                title: l.title,
                lesson_type,
                outline: Some(l.content.clone()),
                content: l.content,
                instruction: non_empty(l.instruction).filter(|_| exercise),
                expected_output: non_empty(l.expected_output).filter(|_| exercise),
                answer: non_empty(l.answer).filter(|_| exercise),
            }
        })
        .collect())
}

/// Expands one outline into full markdown. A failed call keeps the outline.
pub async fn expand_lesson(
    llm: &dyn TextGenerator,
    lesson: LessonDraft,
    module: &ModuleContext<'_>,
) -> LessonDraft {
    let prompt = expansion_prompt(&lesson, module);
    info!("Expanding content for lesson: {}", lesson.title);

    match llm.complete(&prompt, PLAIN_TEXT_SYSTEM).await {
        Ok(reply) => apply_expansion(lesson, &reply),
        Err(e) => {
            warn!("Expanding lesson '{}' failed, keeping outline: {e}", lesson.title);
            lesson
        }
    }
}

fn expansion_prompt(lesson: &LessonDraft, module: &ModuleContext<'_>) -> String {
    let intro = if module.is_kids_level() {
        LESSON_EXPAND_BASIC_INTRO
    } else {
        LESSON_EXPAND_INTRO
    };

    let exercise_outline = if lesson.is_exercise() {
        format!(
            "- Instruction: {}\n- Expected Output: {}\n- Answer: {}",
            lesson.instruction.as_deref().unwrap_or(""),
            lesson.expected_output.as_deref().unwrap_or(""),
            lesson.answer.as_deref().unwrap_or(""),
        )
    } else {
        String::new()
    };

    format!("{intro}\n\n{LESSON_EXPAND_BODY}")
        .replace("{module_title}", module.title)
        .replace("{module_description}", module.description)
        .replace("{lesson_title}", &lesson.title)
        .replace("{lesson_type}", lesson.lesson_type.as_str())
        .replace("{outline}", lesson.outline.as_deref().unwrap_or(&lesson.content))
        .replace("{exercise_outline}", &exercise_outline)
}

/// Splits the reply into sections; exercise sections feed the exercise
/// fields and everything else becomes the lesson body.
fn apply_expansion(mut lesson: LessonDraft, reply: &str) -> LessonDraft {
    let sections = parse_sections(reply);
    if sections.is_empty() {
        lesson.content = normalize(reply.trim());
        return lesson;
    }

    let mut body = Vec::new();
    for section in &sections {
        let key = section_key(&section.heading);
        if !EXERCISE_SECTIONS.contains(&key.as_str()) {
            body.push(format!("## {}\n{}", section.heading, section.body));
            continue;
        }
        if !lesson.is_exercise() || section.body.is_empty() {
            continue;
        }
        let value = Some(normalize(&section.body));
        match key.as_str() {
            "instruction" => lesson.instruction = value,
            "expected_output" => lesson.expected_output = value,
            _ => lesson.answer = value,
        }
    }

    if !body.is_empty() {
        lesson.content = normalize(&body.join("\n\n"));
    }
    lesson
}
