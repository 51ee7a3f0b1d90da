//! Module outlines: read with lesson counts, edit course-level fields, edit
//! one module's content.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::catalog::courses::course_not_found;
use crate::errors::{require_non_empty, AppError};
use crate::models::course::CourseDetails;
use crate::models::module::{CourseOutlineRow, ModuleWithLessonCount, Prerequisites};

#[derive(Debug, Deserialize)]
pub struct UpdateOutlineRequest {
    pub course_id: String,
    pub course_name: String,
    pub level: String,
    pub duration: String,
    pub tools: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateModuleContentRequest {
    pub module_id: String,
    pub module_title: String,
    pub description: String,
    pub estimated_completion_time: String,
    /// One prerequisite per line.
    pub prerequisites_knowledge: String,
    pub prerequisites_technical: String,
    pub learning_objectives: Vec<String>,
    pub key_topics: Vec<String>,
    pub practical_applications: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CourseModules {
    pub course_id: String,
    pub course_details: Option<CourseDetails>,
    pub level: String,
    pub course: String,
    pub duration: String,
    pub tools: Vec<String>,
    pub modules: Vec<ModuleWithLessonCount>,
}

pub async fn get_course_modules(pool: &PgPool, course_id: &str) -> Result<CourseModules, AppError> {
    require_non_empty("course_id", course_id)?;

    let outline = sqlx::query_as::<_, CourseOutlineRow>(
        r#"
        SELECT course_id, course, level, duration, num_modules, tools
        FROM course_outlines WHERE course_id = $1
        "#,
    )
    .bind(course_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("No module outline for course {course_id}")))?;

    let modules = sqlx::query_as::<_, ModuleWithLessonCount>(
        r#"
        SELECT m.module_id, m.course_id, m.position, m.title, m.description,
               m.estimated_completion_time, m.prerequisites, m.learning_objectives,
               m.key_topics, m.practical_applications,
               (SELECT COUNT(*) FROM lessons l WHERE l.module_id = m.module_id) AS lesson_count
        FROM course_modules m
        WHERE m.course_id = $1
        ORDER BY m.position
        "#,
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    let course_details = sqlx::query_as::<_, CourseDetails>(
        r#"
        SELECT level, description, image_uri, segment_ids, is_popular, is_trending
        FROM courses WHERE course_id = $1
        "#,
    )
    .bind(course_id)
    .fetch_optional(pool)
    .await?;

    Ok(CourseModules {
        course_id: outline.course_id,
        course_details,
        level: outline.level,
        course: outline.course,
        duration: outline.duration,
        tools: outline.tools,
        modules,
    })
}

/// Edits the course-level part of an outline.
pub async fn update_outline(
    pool: &PgPool,
    req: &UpdateOutlineRequest,
) -> Result<CourseOutlineRow, AppError> {
    require_non_empty("course_name", &req.course_name)?;

    sqlx::query_as::<_, CourseOutlineRow>(
        r#"
        UPDATE course_outlines SET course = $2, level = $3, duration = $4, tools = $5
        WHERE course_id = $1
        RETURNING course_id, course, level, duration, num_modules, tools
        "#,
    )
    .bind(&req.course_id)
    .bind(req.course_name.trim())
    .bind(&req.level)
    .bind(&req.duration)
    .bind(&req.tools)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| course_not_found(&req.course_id))
}

pub async fn update_module_content(
    pool: &PgPool,
    req: &UpdateModuleContentRequest,
) -> Result<(), AppError> {
    require_non_empty("module_title", &req.module_title)?;

    let prerequisites = Prerequisites {
        knowledge: split_lines(&req.prerequisites_knowledge),
        technical: split_lines(&req.prerequisites_technical),
    };

    let result = sqlx::query(
        r#"
        UPDATE course_modules
        SET title = $2, description = $3, estimated_completion_time = $4,
            prerequisites = $5, learning_objectives = $6, key_topics = $7,
            practical_applications = $8
        WHERE module_id = $1
        "#,
    )
    .bind(&req.module_id)
    .bind(req.module_title.trim())
    .bind(&req.description)
    .bind(&req.estimated_completion_time)
    .bind(Json(&prerequisites))
    .bind(&req.learning_objectives)
    .bind(&req.key_topics)
    .bind(&req.practical_applications)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Module {} not found", req.module_id)));
    }
    Ok(())
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim().trim_start_matches(['-', '*']).trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_drops_blanks_and_bullets() {
        let items = split_lines("- Basic HTML\n\n* CSS selectors\n  JavaScript  \n");
        assert_eq!(items, vec!["Basic HTML", "CSS selectors", "JavaScript"]);
    }

    #[test]
    fn test_split_lines_empty() {
        assert!(split_lines("").is_empty());
        assert!(split_lines("\n \n").is_empty());
    }

    #[test]
    fn test_update_requests_require_every_field() {
        let partial = serde_json::from_str::<UpdateModuleContentRequest>(
            r#"{"module_id": "MODULE_1", "module_title": "Intro", "key_topics": ["Variables"]}"#,
        );
        assert!(partial.is_err());

        let outline = serde_json::from_str::<UpdateOutlineRequest>(
            r#"{"course_id": "C", "course_name": "Rust", "level": "basic"}"#,
        );
        assert!(outline.is_err());

        let full: UpdateOutlineRequest = serde_json::from_str(
            r#"{"course_id": "C", "course_name": "Rust", "level": "basic",
                "duration": "4 weeks", "tools": []}"#,
        )
        .unwrap();
        assert!(full.tools.is_empty());
    }
}
