//! Heuristic quality checks for generated descriptions and modules.
//!
//! Everything here is pure keyword/word-count scoring: fast, deterministic,
//! no LLM call. The generators use the reports to decide whether one
//! improvement round-trip is worth it.

use serde::Serialize;

use crate::generation::curriculum::EnhancedModule;

/// Descriptions and modules pass at or above this score (0 – 100).
pub const PASS_THRESHOLD: f64 = 80.0;
/// Feedback value for a criterion that needs no work.
pub const GOOD: &str = "Good";

const COURSE_MARKETING_TERMS: &[&str] = &[
    "master", "learn", "discover", "develop", "build", "create", "transform", "unlock",
];
const COURSE_TECH_TERMS: &[&str] = &[
    "javascript", "python", "react", "node", "web", "app", "data", "code", "programming",
    "development",
];
const DOMAIN_CLARITY_TERMS: &[&str] = &[
    "focuses on", "covers", "encompasses", "includes", "explores", "specializes in",
];
const DOMAIN_FIELD_TERMS: &[&str] = &[
    "technology", "development", "programming", "science", "engineering", "design", "analytics",
    "business",
];

const TITLE_ACTION_VERBS: &[&str] = &[
    "build", "create", "develop", "implement", "master", "learn", "understand", "explore",
];
const DESCRIPTION_TECH_WORDS: &[&str] = &["javascript", "python", "code", "function", "api"];
const DESCRIPTION_VALUE_WORDS: &[&str] = &["learn", "skill", "practice", "understand", "master"];
const BLOOM_VERBS: &[&str] = &[
    "analyze", "apply", "assess", "build", "calculate", "categorize", "compare", "compile",
    "compose", "construct", "create", "critique", "define", "demonstrate", "design", "develop",
    "differentiate", "evaluate", "explain", "identify", "implement", "integrate",
];
const INDUSTRY_TERMS: &[&str] = &[
    "industry", "professional", "workplace", "company", "business", "production", "real-world",
];

// ────────────────────────────────────────────────────────────────────────────
// Description heuristics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackItem {
    pub criterion: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DescriptionReport {
    pub quality_score: f64,
    pub passes_threshold: bool,
    /// One entry per criterion, in a fixed order; `GOOD` when nothing to fix.
    pub feedback: Vec<FeedbackItem>,
}

impl DescriptionReport {
    /// `criterion: message` pairs for every criterion that is not `GOOD`.
    pub fn actionable_feedback(&self) -> String {
        self.feedback
            .iter()
            .filter(|f| f.message != GOOD)
            .map(|f| format!("{}: {}", f.criterion, f.message))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn check_course_description(text: &str) -> DescriptionReport {
    let lower = text.to_lowercase();
    let length = length_score(text);
    let marketing = presence_score(&lower, COURSE_MARKETING_TERMS);
    let specificity = presence_score(&lower, COURSE_TECH_TERMS);

    build_report(&[
        (
            "length",
            length,
            "Description should be 1-2 concise sentences (15-50 words)",
        ),
        (
            "marketing_appeal",
            marketing,
            "Add action-oriented terms that motivate learners",
        ),
        (
            "specificity",
            specificity,
            "Include specific technologies or skills covered",
        ),
    ])
}

pub fn check_domain_description(text: &str) -> DescriptionReport {
    let lower = text.to_lowercase();
    let length = length_score(text);
    let clarity = presence_score(&lower, DOMAIN_CLARITY_TERMS);
    let specificity = presence_score(&lower, DOMAIN_FIELD_TERMS);

    build_report(&[
        (
            "length",
            length,
            "Description should be 1-2 concise sentences (15-50 words)",
        ),
        (
            "clarity",
            clarity,
            "Add terms that clearly define the domain's focus",
        ),
        (
            "specificity",
            specificity,
            "Include specific field or technology areas covered",
        ),
    ])
}

/// 1.0 for 15–50 words in one or two sentences, 0.5 otherwise.
fn length_score(text: &str) -> f64 {
    let words = text.split_whitespace().count();
    let sentences = text.split('.').filter(|s| !s.trim().is_empty()).count();
    if (15..=50).contains(&words) && (1..=2).contains(&sentences) {
        1.0
    } else {
        0.5
    }
}

fn presence_score(lower: &str, terms: &[&str]) -> f64 {
    if contains_any(lower, terms) {
        1.0
    } else {
        0.5
    }
}

fn build_report(criteria: &[(&'static str, f64, &str)]) -> DescriptionReport {
    let scores: Vec<f64> = criteria.iter().map(|(_, s, _)| *s).collect();
    let quality_score = mean_percent(&scores);
    let feedback = criteria
        .iter()
        .map(|(name, score, hint)| FeedbackItem {
            criterion: name,
            message: if *score >= 0.8 { GOOD.to_string() } else { hint.to_string() },
        })
        .collect();

    DescriptionReport {
        quality_score,
        passes_threshold: quality_score >= PASS_THRESHOLD,
        feedback,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Module heuristics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModuleCriteria {
    pub title_quality: f64,
    pub description_quality: f64,
    pub learning_objectives_quality: f64,
    pub key_topics_quality: f64,
    pub practical_relevance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleQualityReport {
    pub quality_score: f64,
    pub passes_threshold: bool,
    pub criteria: ModuleCriteria,
    pub improvement_suggestions: Vec<String>,
}

pub fn check_module(module: &EnhancedModule) -> ModuleQualityReport {
    let criteria = ModuleCriteria {
        title_quality: title_quality(&module.title),
        description_quality: description_quality(&module.description),
        learning_objectives_quality: objectives_quality(&module.learning_objectives),
        key_topics_quality: key_topics_quality(&module.key_topics),
        practical_relevance: practical_relevance(&module.practical_applications),
    };
    let quality_score = mean_percent(&[
        criteria.title_quality,
        criteria.description_quality,
        criteria.learning_objectives_quality,
        criteria.key_topics_quality,
        criteria.practical_relevance,
    ]);

    ModuleQualityReport {
        quality_score,
        passes_threshold: quality_score >= PASS_THRESHOLD,
        criteria,
        improvement_suggestions: module_suggestions(&criteria),
    }
}

fn title_quality(title: &str) -> f64 {
    if title.trim().is_empty() {
        return 0.0;
    }
    let words = title.split_whitespace().count();
    let length = if (4..=8).contains(&words) { 0.5 } else { 0.3 };
    let action = if contains_any(&title.to_lowercase(), TITLE_ACTION_VERBS) {
        0.5
    } else {
        0.2
    };
    length + action
}

fn description_quality(description: &str) -> f64 {
    if description.trim().is_empty() {
        return 0.0;
    }
    let lower = description.to_lowercase();
    let length = if description.split_whitespace().count() >= 30 { 0.4 } else { 0.2 };
    let specificity = if contains_any(&lower, DESCRIPTION_TECH_WORDS) { 0.3 } else { 0.1 };
    let value = if contains_any(&lower, DESCRIPTION_VALUE_WORDS) { 0.3 } else { 0.1 };
    length + specificity + value
}

fn objectives_quality(objectives: &[String]) -> f64 {
    if objectives.is_empty() {
        return 0.0;
    }
    let count = if (4..=8).contains(&objectives.len()) { 0.3 } else { 0.1 };
    let with_verbs = objectives
        .iter()
        .filter(|o| contains_any(&o.to_lowercase(), BLOOM_VERBS))
        .count();
    count + (with_verbs as f64 * 0.1).min(0.7)
}

fn key_topics_quality(topics: &[String]) -> f64 {
    if topics.is_empty() {
        return 0.0;
    }
    let count = if (6..=15).contains(&topics.len()) { 0.4 } else { 0.2 };
    // Longer topic names stand in for specificity.
    let specific = topics
        .iter()
        .filter(|t| t.split_whitespace().count() >= 3)
        .count();
    count + (specific as f64 * 0.05).min(0.6)
}

fn practical_relevance(applications: &[String]) -> f64 {
    if applications.is_empty() {
        return 0.0;
    }
    let count = if applications.len() >= 3 { 0.4 } else { 0.2 };
    let industry = applications
        .iter()
        .filter(|a| contains_any(&a.to_lowercase(), INDUSTRY_TERMS))
        .count();
    count + (industry as f64 * 0.15).min(0.6)
}

fn module_suggestions(criteria: &ModuleCriteria) -> Vec<String> {
    let checks = [
        (
            criteria.title_quality,
            "Make the title more action-oriented and specific about what learners will achieve.",
        ),
        (
            criteria.description_quality,
            "Enhance the description with more specific details about technologies and skills covered.",
        ),
        (
            criteria.learning_objectives_quality,
            "Improve learning objectives using specific, measurable action verbs from Bloom's taxonomy.",
        ),
        (
            criteria.key_topics_quality,
            "Expand key topics to be more comprehensive and specific.",
        ),
        (
            criteria.practical_relevance,
            "Add more industry-relevant practical applications with specific examples.",
        ),
    ];

    checks
        .iter()
        .filter(|(score, _)| *score < 0.7)
        .map(|(_, s)| s.to_string())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn contains_any(lower: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| lower.contains(t))
}

/// Mean of `scores` scaled to 0 – 100 and rounded to two decimals.
fn mean_percent(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    (mean * 100.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::module::Prerequisites;

    fn module() -> EnhancedModule {
        EnhancedModule {
            module_id: String::new(),
            title: "Build Interactive Web Pages with JavaScript".to_string(),
            description: "In this module you will learn how the DOM works, write JavaScript code \
                that responds to user events, and practice structuring small functions so that \
                pages stay fast and maintainable as they grow in size and complexity over time."
                .to_string(),
            learning_objectives: vec![
                "Explain how the browser builds the DOM".to_string(),
                "Implement event listeners for clicks".to_string(),
                "Design reusable UI functions".to_string(),
                "Evaluate page performance".to_string(),
                "Compare event delegation strategies".to_string(),
            ],
            prerequisites: Prerequisites::default(),
            key_topics: vec![
                "DOM selection".to_string(),
                "Click events".to_string(),
                "Event bubbling and capture".to_string(),
                "Dynamic elements".to_string(),
                "Form validation".to_string(),
                "Debouncing user input".to_string(),
            ],
            practical_applications: vec![
                "Production dashboards for a business".to_string(),
                "Professional landing pages".to_string(),
                "Real-world form flows at a company".to_string(),
            ],
            estimated_completion_time: "5-7 hours".to_string(),
        }
    }

    #[test]
    fn test_good_course_description_passes() {
        let text = "Master modern web development with JavaScript and React, building three \
                    production-ready apps while learning the patterns professional teams rely on.";
        let report = check_course_description(text);
        assert_eq!(report.quality_score, 100.0);
        assert!(report.passes_threshold);
        assert!(report.feedback.iter().all(|f| f.message == GOOD));
        assert_eq!(report.actionable_feedback(), "");
    }

    #[test]
    fn test_short_vague_course_description_fails() {
        let report = check_course_description("A course about cooking.");
        // length 0.5, marketing 0.5, specificity 0.5
        assert_eq!(report.quality_score, 50.0);
        assert!(!report.passes_threshold);
        let feedback = report.actionable_feedback();
        assert!(feedback.starts_with("length: "));
        assert!(feedback.contains("marketing_appeal: "));
    }

    #[test]
    fn test_three_sentences_fail_length() {
        let text = "Learn python. Build data apps with code. Then develop your skills further \
                    by working through many practical exercises across several weeks.";
        let report = check_course_description(text);
        assert_eq!(report.feedback[0].message, "Description should be 1-2 concise sentences (15-50 words)");
        assert_eq!(report.quality_score, 83.33);
        assert!(report.passes_threshold);
    }

    #[test]
    fn test_domain_description_scoring() {
        let text = "This domain focuses on cloud engineering, covering infrastructure as code, \
                    container orchestration and the operational practices behind reliable systems.";
        let report = check_domain_description(text);
        assert_eq!(report.quality_score, 100.0);

        let weak = check_domain_description("Cooking.");
        assert_eq!(weak.quality_score, 50.0);
        assert_eq!(weak.feedback[1].criterion, "clarity");
        assert_ne!(weak.feedback[1].message, GOOD);
    }

    #[test]
    fn test_strong_module_passes() {
        let report = check_module(&module());
        assert!((report.criteria.title_quality - 1.0).abs() < 1e-9);
        assert!((report.criteria.description_quality - 1.0).abs() < 1e-9);
        // 0.3 for count + 5 × 0.1 for verbs
        assert!((report.criteria.learning_objectives_quality - 0.8).abs() < 1e-9);
        // 0.4 for count + 2 topics of ≥ 3 words × 0.05
        assert!((report.criteria.key_topics_quality - 0.5).abs() < 1e-9);
        // 0.4 for count + 3 × 0.15
        assert!((report.criteria.practical_relevance - 0.85).abs() < 1e-9);
        assert_eq!(report.quality_score, 83.0);
        assert!(report.passes_threshold);
        assert_eq!(report.improvement_suggestions.len(), 1);
        assert!(report.improvement_suggestions[0].starts_with("Expand key topics"));
    }

    #[test]
    fn test_empty_module_scores_zero_with_all_suggestions() {
        let empty = EnhancedModule {
            title: String::new(),
            description: String::new(),
            learning_objectives: vec![],
            key_topics: vec![],
            practical_applications: vec![],
            ..module()
        };
        let report = check_module(&empty);
        assert_eq!(report.quality_score, 0.0);
        assert!(!report.passes_threshold);
        assert_eq!(report.improvement_suggestions.len(), 5);
    }

    #[test]
    fn test_title_scoring_bands() {
        assert!((title_quality("Intro") - 0.5).abs() < 1e-9);
        assert!((title_quality("Learn to Build Small Tools") - 1.0).abs() < 1e-9);
        assert_eq!(title_quality("   "), 0.0);
    }

    #[test]
    fn test_objective_verb_score_is_capped() {
        let objectives: Vec<String> = (0..10).map(|i| format!("Apply rule {i}")).collect();
        // 10 objectives is outside 4–8, so count score is 0.1
        assert!((objectives_quality(&objectives) - 0.8).abs() < 1e-9);
    }
}
