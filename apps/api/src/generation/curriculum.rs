//! Curriculum stage: course name → module outline.
//!
//! 1. One JSON call sketches 6–10 modules plus course-level metadata.
//! 2. Each module is enhanced by its own JSON call (objectives,
//!    prerequisites, topics, applications, time estimate).
//! 3. Modules that score under the quality threshold get one improvement
//!    round-trip. Any failure after step 1 degrades instead of aborting.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::generation::prompts::{
    CURRICULUM_STRUCTURE_PROMPT, MODULE_ENHANCE_PROMPT, MODULE_IMPROVE_PROMPT,
};
use crate::generation::quality::{check_module, ModuleQualityReport};
use crate::ids::unique_id;
use crate::llm_client::prompts::{FLAT_MODULE_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{complete_json, LlmError, TextGenerator};
use crate::models::module::Prerequisites;
use crate::models::{lenient_string, string_or_list};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// First-pass outline returned by the structure call.
#[derive(Debug, Clone, Deserialize)]
pub struct CurriculumStructure {
    #[serde(default, deserialize_with = "lenient_string")]
    pub course: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub tools: Vec<String>,
    #[serde(default)]
    pub modules: Vec<ModuleSketch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSketch {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

/// A fully detailed module, ready to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedModule {
    #[serde(default)]
    pub module_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub prerequisites: Prerequisites,
    #[serde(default, deserialize_with = "string_or_list")]
    pub key_topics: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub practical_applications: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub estimated_completion_time: String,
}

impl EnhancedModule {
    /// Stand-in used when the enhancement call fails.
    fn placeholder(sketch: &ModuleSketch) -> Self {
        Self {
            module_id: String::new(),
            title: sketch.title.clone(),
            description: sketch.description.clone(),
            learning_objectives: vec!["Unable to generate learning objectives".to_string()],
            prerequisites: Prerequisites::default(),
            key_topics: vec!["Unable to generate key topics".to_string()],
            practical_applications: vec!["Unable to generate practical applications".to_string()],
            estimated_completion_time: "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Curriculum {
    pub course: String,
    pub duration: String,
    pub tools: Vec<String>,
    pub modules: Vec<EnhancedModule>,
}

impl Curriculum {
    /// Always the number of modules actually produced, whatever the model claimed.
    pub fn num_modules(&self) -> usize {
        self.modules.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage entry point
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_curriculum(
    llm: &dyn TextGenerator,
    course_name: &str,
) -> Result<Curriculum, LlmError> {
    info!("Generating curriculum structure for: {course_name}");
    let prompt = CURRICULUM_STRUCTURE_PROMPT.replace("{course_name}", course_name);
    let structure: CurriculumStructure = complete_json(llm, &prompt, JSON_ONLY_SYSTEM).await?;

    if structure.modules.is_empty() {
        return Err(LlmError::EmptyContent);
    }

    let course = if structure.course.trim().is_empty() {
        course_name.to_string()
    } else {
        structure.course.clone()
    };

    let mut modules = Vec::with_capacity(structure.modules.len());
    for (index, sketch) in structure.modules.iter().enumerate() {
        let mut module =
            enhance_module(llm, sketch, &course, &structure.tools, index, structure.modules.len())
                .await;

        let report = check_module(&module);
        info!(
            "Module '{}' quality score: {}/100",
            module.title, report.quality_score
        );
        if !report.passes_threshold {
            module = improve_module(llm, module, &report).await;
        }

        module.module_id = unique_id("MODULE");
        modules.push(module);
    }

    if let Some(first) = modules.first() {
        info!(
            "Sample module: '{}', objectives: {:?}",
            first.title,
            first.learning_objectives.iter().take(2).collect::<Vec<_>>()
        );
    }

    Ok(Curriculum {
        course,
        duration: structure.duration,
        tools: structure.tools,
        modules,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Enhancement and improvement
// ────────────────────────────────────────────────────────────────────────────

async fn enhance_module(
    llm: &dyn TextGenerator,
    sketch: &ModuleSketch,
    course: &str,
    tools: &[String],
    index: usize,
    total: usize,
) -> EnhancedModule {
    let prompt = MODULE_ENHANCE_PROMPT
        .replace("{course}", course)
        .replace("{tools}", &tools.join(", "))
        .replace("{position}", &(index + 1).to_string())
        .replace("{num_modules}", &total.to_string())
        .replace("{title}", &sketch.title)
        .replace("{description}", &sketch.description)
        .replace("{flat_module_instruction}", FLAT_MODULE_INSTRUCTION);

    info!("Enhancing module: {}", sketch.title);
    let base = EnhancedModule {
        learning_objectives: Vec::new(),
        key_topics: Vec::new(),
        practical_applications: Vec::new(),
        estimated_completion_time: String::new(),
        ..EnhancedModule::placeholder(sketch)
    };

    match complete_json::<Value>(llm, &prompt, JSON_ONLY_SYSTEM)
        .await
        .and_then(|reply| overlay(&base, reply))
    {
        Ok(mut module) => {
            // Title and description come from the outline, not the enhancer.
            module.title = sketch.title.clone();
            module.description = sketch.description.clone();
            module
        }
        Err(e) => {
            warn!("Enhancing module '{}' failed, using placeholder: {e}", sketch.title);
            EnhancedModule::placeholder(sketch)
        }
    }
}

async fn improve_module(
    llm: &dyn TextGenerator,
    module: EnhancedModule,
    report: &ModuleQualityReport,
) -> EnhancedModule {
    if report.improvement_suggestions.is_empty() {
        return module;
    }

    let module_json = match serde_json::to_string_pretty(&module) {
        Ok(json) => json,
        Err(e) => {
            warn!("Could not serialize module for improvement: {e}");
            return module;
        }
    };
    let prompt = MODULE_IMPROVE_PROMPT
        .replace("{suggestions}", &bullet_list(&report.improvement_suggestions))
        .replace("{module_json}", &module_json)
        .replace("{flat_module_instruction}", FLAT_MODULE_INSTRUCTION);

    info!("Improving module: {}", module.title);
    match complete_json::<Value>(llm, &prompt, JSON_ONLY_SYSTEM)
        .await
        .and_then(|reply| overlay(&module, reply))
    {
        Ok(improved) => improved,
        Err(e) => {
            warn!("Improving module '{}' failed, keeping it: {e}", module.title);
            module
        }
    }
}

/// Lays the fields of a model reply over `base`.
/// A nested `"module"` object is lifted to the top level first.
fn overlay(base: &EnhancedModule, reply: Value) -> Result<EnhancedModule, LlmError> {
    let mut merged = match serde_json::to_value(base)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in flatten_nested_module(reply) {
        merged.insert(key, value);
    }
    Ok(serde_json::from_value(Value::Object(merged))?)
}

fn flatten_nested_module(reply: Value) -> Map<String, Value> {
    let Value::Object(mut map) = reply else {
        return Map::new();
    };
    if let Some(Value::Object(nested)) = map.remove("module") {
        for (key, value) in nested {
            map.insert(key, value);
        }
    }
    map
}

pub(crate) fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;

    const STRUCTURE: &str = r#"{
        "course": "Rust for Backend Developers",
        "duration": "6 weeks",
        "num_modules": 9,
        "tools": ["Rust", "Cargo"],
        "modules": [
            {"title": "Learn Ownership and Borrowing Rules",
             "description": "Learn how ownership works in Rust code, why the borrow checker rejects some programs, and how to practice writing functions that move, borrow and return values safely across module boundaries in real projects."},
            {"title": "Build Async Services",
             "description": "Learn to build async services with Tokio and axum, write code that handles many concurrent connections, and practice structuring handlers, shared state and graceful shutdown for services that run reliably in production."}
        ]
    }"#;

    const STRONG_ENHANCEMENT: &str = r#"{
        "learning_objectives": ["Explain moves", "Apply borrowing", "Design APIs", "Evaluate lifetimes"],
        "prerequisites": {"knowledge": "Basic programming", "technical": ["rustup"]},
        "key_topics": ["Move semantics in depth", "Shared and mutable borrows", "Lifetime elision rules",
                       "Interior mutability patterns", "Smart pointer basics", "Drop order guarantees"],
        "practical_applications": ["Production services", "Industry tooling", "Business backends"],
        "estimated_completion_time": "6-8 hours"
    }"#;

    #[tokio::test]
    async fn test_failed_enhancement_falls_back_to_placeholder() {
        let llm = ScriptedGenerator::from_results([
            Ok(STRUCTURE.to_string()),
            Err(LlmError::EmptyContent),
            // placeholder fails the quality check, improvement also fails
            Err(LlmError::EmptyContent),
            Ok("not json".to_string()),
            Err(LlmError::EmptyContent),
        ]);
        let curriculum = generate_curriculum(&llm, "Rust").await.unwrap();

        assert_eq!(curriculum.course, "Rust for Backend Developers");
        assert_eq!(curriculum.num_modules(), 2);
        let first = &curriculum.modules[0];
        assert_eq!(first.title, "Learn Ownership and Borrowing Rules");
        assert_eq!(first.estimated_completion_time, "Unknown");
        assert_eq!(first.key_topics, vec!["Unable to generate key topics"]);
        assert!(first.module_id.starts_with("MODULE_"));
        assert_ne!(first.module_id, curriculum.modules[1].module_id);
        assert_eq!(llm.remaining(), 0);
    }

    #[tokio::test]
    async fn test_enhancement_is_merged_and_nested_module_flattened() {
        let nested = format!(r#"{{"module": {STRONG_ENHANCEMENT}}}"#);
        let llm = ScriptedGenerator::new([STRUCTURE, STRONG_ENHANCEMENT, nested.as_str()]);
        let curriculum = generate_curriculum(&llm, "Rust").await;
        let curriculum = curriculum.unwrap();

        for module in &curriculum.modules {
            assert_eq!(module.learning_objectives.len(), 4);
            assert_eq!(module.prerequisites.knowledge, vec!["Basic programming"]);
            assert_eq!(module.estimated_completion_time, "6-8 hours");
        }
        assert_eq!(curriculum.modules[1].title, "Build Async Services");

        let prompts = llm.prompts();
        assert!(prompts[1].contains("Module Position: 1 of 2"));
        assert!(prompts[2].contains("Tools Used: Rust, Cargo"));
    }

    #[tokio::test]
    async fn test_loose_prerequisites_keep_the_enhancement() {
        for prerequisites in [r#""Basic programming""#, "null", r#"["Basic programming"]"#] {
            let enhancement = STRONG_ENHANCEMENT.replace(
                r#"{"knowledge": "Basic programming", "technical": ["rustup"]}"#,
                prerequisites,
            );
            let llm = ScriptedGenerator::new([STRUCTURE, enhancement.as_str(), enhancement.as_str()]);
            let curriculum = generate_curriculum(&llm, "Rust").await.unwrap();

            let module = &curriculum.modules[0];
            assert_eq!(module.learning_objectives.len(), 4, "{prerequisites}");
            assert_eq!(module.estimated_completion_time, "6-8 hours");
            assert!(module.prerequisites.technical.is_empty());
            if prerequisites != "null" {
                assert_eq!(module.prerequisites.knowledge, vec!["Basic programming"]);
            } else {
                assert!(module.prerequisites.knowledge.is_empty());
            }
        }
    }

    #[tokio::test]
    async fn test_weak_module_is_improved_once() {
        let weak = r#"{"learning_objectives": ["Know things"], "key_topics": ["Stuff"],
                       "practical_applications": ["Hobby"], "estimated_completion_time": "1 hour"}"#;
        let improved = r#"{"title": "Build Async Services with Tokio", "key_topics": ["Runtime internals explained"]}"#;
        let structure = r#"{"course": "C", "duration": "1 week", "tools": "Tokio",
                            "modules": [{"title": "Async", "description": "Tokio."}]}"#;
        let llm = ScriptedGenerator::new([structure, weak, improved]);
        let curriculum = generate_curriculum(&llm, "C").await.unwrap();

        assert_eq!(curriculum.tools, vec!["Tokio"]);
        let module = &curriculum.modules[0];
        assert_eq!(module.title, "Build Async Services with Tokio");
        assert_eq!(module.key_topics, vec!["Runtime internals explained"]);
        // fields missing from the improvement reply are kept
        assert_eq!(module.estimated_completion_time, "1 hour");
        let prompts = llm.prompts();
        assert!(prompts[2].contains("- Make the title more action-oriented"));
    }

    #[tokio::test]
    async fn test_structure_without_modules_is_an_error() {
        let llm = ScriptedGenerator::new([r#"{"course": "x", "modules": []}"#]);
        assert!(generate_curriculum(&llm, "x").await.is_err());
    }

    #[test]
    fn test_flatten_nested_module_lifts_fields() {
        let reply = serde_json::json!({"title": "T", "module": {"key_topics": ["a"]}});
        let map = flatten_nested_module(reply);
        assert!(map.contains_key("key_topics"));
        assert!(!map.contains_key("module"));
    }
}
