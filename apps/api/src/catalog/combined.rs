//! Combined courses: a titled bundle of existing courses that references
//! their modules without copying them.

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::errors::{require_non_empty, AppError};
use crate::ids::unique_id;
use crate::models::combined_course::{CombinedCourseRow, CourseReference, ModuleReference};

const COMBINED_COLUMNS: &str = "combined_course_id, title, description, image_uri, level, topics, \
                                is_trending, is_popular, courses, created_at, updated_at";

const DEFAULT_DESCRIPTION: &str = "This is a combined course.";

#[derive(Debug, Deserialize)]
pub struct CombineCoursesRequest {
    pub course_ids: Vec<String>,
    pub course_name: String,
    pub level: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default = "default_description")]
    pub description: String,
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

/// Partial edit; absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct EditCombinedCourseRequest {
    pub combined_course_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_uri: Option<String>,
    pub level: Option<String>,
    pub topics: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CombinedTrendingRequest {
    pub combined_course_id: String,
    pub is_trending: bool,
    pub is_popular: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct ModuleTitle {
    course_id: String,
    module_id: String,
    title: String,
}

pub async fn create_combined_course(
    pool: &PgPool,
    req: &CombineCoursesRequest,
) -> Result<CombinedCourseRow, AppError> {
    require_non_empty("course_name", &req.course_name)?;
    let course_ids = dedupe(&req.course_ids);
    if course_ids.len() < 2 {
        return Err(AppError::Validation(
            "At least two distinct course ids are required".to_string(),
        ));
    }

    let names: HashMap<String, String> = sqlx::query_as::<_, (String, String)>(
        "SELECT course_id, course_name FROM courses WHERE course_id = ANY($1)",
    )
    .bind(&course_ids)
    .fetch_all(pool)
    .await?
    .into_iter()
    .collect();

    let missing = missing_ids(&course_ids, &names);
    if !missing.is_empty() {
        return Err(AppError::NotFound(format!(
            "Courses not found: {}",
            missing.join(", ")
        )));
    }

    let modules = sqlx::query_as::<_, ModuleTitle>(
        r#"
        SELECT course_id, module_id, title FROM course_modules
        WHERE course_id = ANY($1)
        ORDER BY course_id, position
        "#,
    )
    .bind(&course_ids)
    .fetch_all(pool)
    .await?;

    let references = build_references(&course_ids, &names, modules);
    let combined_course_id = unique_id("COMBO");

    let combined = sqlx::query_as::<_, CombinedCourseRow>(&format!(
        r#"
        INSERT INTO combined_courses
            (combined_course_id, title, description, image_uri, level, topics, courses)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COMBINED_COLUMNS}
        "#
    ))
    .bind(&combined_course_id)
    .bind(req.course_name.trim())
    .bind(&req.description)
    .bind(&req.image_url)
    .bind(&req.level)
    .bind(&req.topics)
    .bind(Json(&references))
    .fetch_one(pool)
    .await?;

    info!(
        "Created combined course {combined_course_id} from {} courses",
        references.len()
    );
    Ok(combined)
}

pub async fn list_combined_courses(pool: &PgPool) -> Result<Vec<CombinedCourseRow>, AppError> {
    Ok(sqlx::query_as::<_, CombinedCourseRow>(&format!(
        "SELECT {COMBINED_COLUMNS} FROM combined_courses ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?)
}

pub async fn get_combined_course(pool: &PgPool, id: &str) -> Result<CombinedCourseRow, AppError> {
    sqlx::query_as::<_, CombinedCourseRow>(&format!(
        "SELECT {COMBINED_COLUMNS} FROM combined_courses WHERE combined_course_id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| combined_not_found(id))
}

pub async fn update_combined_course(
    pool: &PgPool,
    req: &EditCombinedCourseRequest,
) -> Result<CombinedCourseRow, AppError> {
    if let Some(title) = &req.title {
        require_non_empty("title", title)?;
    }

    sqlx::query_as::<_, CombinedCourseRow>(&format!(
        r#"
        UPDATE combined_courses
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            image_uri = COALESCE($4, image_uri),
            level = COALESCE($5, level),
            topics = COALESCE($6, topics),
            updated_at = NOW()
        WHERE combined_course_id = $1
        RETURNING {COMBINED_COLUMNS}
        "#
    ))
    .bind(&req.combined_course_id)
    .bind(req.title.as_deref().map(str::trim))
    .bind(&req.description)
    .bind(&req.image_uri)
    .bind(&req.level)
    .bind(&req.topics)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| combined_not_found(&req.combined_course_id))
}

pub async fn set_combined_trending(
    pool: &PgPool,
    req: &CombinedTrendingRequest,
) -> Result<CombinedCourseRow, AppError> {
    sqlx::query_as::<_, CombinedCourseRow>(&format!(
        r#"
        UPDATE combined_courses
        SET is_trending = $2, is_popular = $3, updated_at = NOW()
        WHERE combined_course_id = $1
        RETURNING {COMBINED_COLUMNS}
        "#
    ))
    .bind(&req.combined_course_id)
    .bind(req.is_trending)
    .bind(req.is_popular)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| combined_not_found(&req.combined_course_id))
}

pub async fn delete_combined_course(pool: &PgPool, id: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM combined_courses WHERE combined_course_id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(combined_not_found(id));
    }
    info!("Deleted combined course {id}");
    Ok(())
}

/// First occurrence wins; order is otherwise kept.
fn dedupe(ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim();
        if !id.is_empty() && !out.iter().any(|seen| seen == id) {
            out.push(id.to_string());
        }
    }
    out
}

fn missing_ids(requested: &[String], found: &HashMap<String, String>) -> Vec<String> {
    requested
        .iter()
        .filter(|id| !found.contains_key(*id))
        .cloned()
        .collect()
}

/// One reference per requested course, numbered from 1 in request order.
/// `modules` must already be in module position order per course.
fn build_references(
    course_ids: &[String],
    names: &HashMap<String, String>,
    modules: Vec<ModuleTitle>,
) -> Vec<CourseReference> {
    let mut by_course: HashMap<String, Vec<ModuleReference>> = HashMap::new();
    for m in modules {
        by_course.entry(m.course_id).or_default().push(ModuleReference {
            module_id: m.module_id,
            module_name: m.title,
        });
    }

    course_ids
        .iter()
        .zip(1..)
        .map(|(course_id, order)| CourseReference {
            course_id: course_id.clone(),
            course_name: names.get(course_id).cloned().unwrap_or_default(),
            order,
            modules: by_course.remove(course_id).unwrap_or_default(),
        })
        .collect()
}

fn combined_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Combined course {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn module(course_id: &str, module_id: &str, title: &str) -> ModuleTitle {
        ModuleTitle {
            course_id: course_id.to_string(),
            module_id: module_id.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        assert_eq!(
            dedupe(&ids(&["B", "A", "B", " ", "C", "A"])),
            ids(&["B", "A", "C"])
        );
    }

    #[test]
    fn test_missing_ids_in_request_order() {
        let found: HashMap<String, String> =
            [("A".to_string(), "Course A".to_string())].into_iter().collect();
        assert_eq!(missing_ids(&ids(&["C", "A", "B"]), &found), ids(&["C", "B"]));
    }

    #[test]
    fn test_build_references_follows_request_order() {
        let names: HashMap<String, String> = [
            ("A".to_string(), "Python".to_string()),
            ("B".to_string(), "SQL".to_string()),
        ]
        .into_iter()
        .collect();
        let modules = vec![
            module("A", "MODULE_1", "Basics"),
            module("A", "MODULE_2", "Functions"),
            module("B", "MODULE_3", "Queries"),
        ];

        let refs = build_references(&ids(&["B", "A"]), &names, modules);

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].course_id, "B");
        assert_eq!(refs[0].order, 1);
        assert_eq!(refs[0].modules[0].module_name, "Queries");
        assert_eq!(refs[1].course_name, "Python");
        assert_eq!(refs[1].order, 2);
        let module_ids: Vec<_> = refs[1].modules.iter().map(|m| m.module_id.as_str()).collect();
        assert_eq!(module_ids, vec!["MODULE_1", "MODULE_2"]);
    }

    #[test]
    fn test_course_without_outline_has_no_modules() {
        let names: HashMap<String, String> = [
            ("A".to_string(), "Python".to_string()),
            ("B".to_string(), "SQL".to_string()),
        ]
        .into_iter()
        .collect();
        let refs = build_references(&ids(&["A", "B"]), &names, Vec::new());
        assert!(refs.iter().all(|r| r.modules.is_empty()));
    }

    #[test]
    fn test_request_description_default() {
        let req: CombineCoursesRequest = serde_json::from_str(
            r#"{"course_ids": ["A", "B"], "course_name": "Full Stack", "level": "advanced"}"#,
        )
        .unwrap();
        assert_eq!(req.description, "This is a combined course.");
        assert!(req.topics.is_empty());
    }
}
