//! Course listing, editing, deletion and segment tagging.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::catalog::{merge_unique, remove_all};
use crate::errors::{conflict_on_unique, require_non_empty, AppError};
use crate::models::course::{CourseRow, CourseSummaryRow};

const COURSE_COLUMNS: &str = "course_id, course_name, level, description, image_uri, \
                              segment_ids, is_popular, is_trending, created_at";

#[derive(Debug, Deserialize)]
pub struct EditTrendingRequest {
    pub course_id: String,
    pub is_trending: bool,
    pub is_popular: bool,
}

#[derive(Debug, Deserialize)]
pub struct EditCourseRequest {
    pub course_id: String,
    pub course_name: String,
    pub level: String,
    pub image_uri: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CourseIdRequest {
    pub course_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CourseSegmentsRequest {
    pub course_id: String,
    pub segment_ids: Vec<String>,
}

/// All courses with the module count of their outline (0 when none).
pub async fn list_courses(pool: &PgPool) -> Result<Vec<CourseSummaryRow>, AppError> {
    Ok(sqlx::query_as::<_, CourseSummaryRow>(
        r#"
        SELECT c.course_id, c.course_name, c.level, c.description, c.image_uri,
               c.segment_ids, c.is_popular, c.is_trending, c.created_at,
               COALESCE(o.num_modules, 0) AS num_modules
        FROM courses c
        LEFT JOIN course_outlines o ON o.course_id = c.course_id
        ORDER BY c.created_at
        "#,
    )
    .fetch_all(pool)
    .await?)
}

pub async fn courses_by_segment(
    pool: &PgPool,
    segment_id: &str,
) -> Result<Vec<CourseRow>, AppError> {
    require_non_empty("segment_id", segment_id)?;
    Ok(sqlx::query_as::<_, CourseRow>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE $1 = ANY(segment_ids) ORDER BY created_at"
    ))
    .bind(segment_id)
    .fetch_all(pool)
    .await?)
}

/// Courses whose id is in `course_ids`, in creation order.
pub async fn courses_by_ids(
    pool: &PgPool,
    course_ids: &[String],
) -> Result<Vec<CourseRow>, AppError> {
    Ok(sqlx::query_as::<_, CourseRow>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE course_id = ANY($1) ORDER BY created_at"
    ))
    .bind(course_ids)
    .fetch_all(pool)
    .await?)
}

pub async fn set_trending(pool: &PgPool, req: &EditTrendingRequest) -> Result<(), AppError> {
    let result =
        sqlx::query("UPDATE courses SET is_trending = $2, is_popular = $3 WHERE course_id = $1")
            .bind(&req.course_id)
            .bind(req.is_trending)
            .bind(req.is_popular)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(course_not_found(&req.course_id));
    }
    Ok(())
}

pub async fn update_course(pool: &PgPool, req: &EditCourseRequest) -> Result<CourseRow, AppError> {
    require_non_empty("course_name", &req.course_name)?;

    sqlx::query_as::<_, CourseRow>(&format!(
        r#"
        UPDATE courses
        SET course_name = $2, level = $3, image_uri = $4, description = $5
        WHERE course_id = $1
        RETURNING {COURSE_COLUMNS}
        "#
    ))
    .bind(&req.course_id)
    .bind(req.course_name.trim())
    .bind(&req.level)
    .bind(&req.image_uri)
    .bind(&req.description)
    .fetch_optional(pool)
    .await
    .map_err(|e| conflict_on_unique(e, format!("Course '{}' already exists", req.course_name.trim())))?
    .ok_or_else(|| course_not_found(&req.course_id))
}

/// Deletes a course with its outline, modules and lessons, and removes its
/// id from every domain.
pub async fn delete_course(pool: &PgPool, course_id: &str) -> Result<(), AppError> {
    require_non_empty("course_id", course_id)?;
    let mut tx = pool.begin().await?;

    // outline, modules and lessons go with the course row (ON DELETE CASCADE)
    let result = sqlx::query("DELETE FROM courses WHERE course_id = $1")
        .bind(course_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(course_not_found(course_id));
    }

    let domains = sqlx::query(
        "UPDATE domains SET courses_ids = array_remove(courses_ids, $1) WHERE $1 = ANY(courses_ids)",
    )
    .bind(course_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(
        "Deleted course {course_id}, unlinked from {} domains",
        domains.rows_affected()
    );
    Ok(())
}

pub async fn add_segments(pool: &PgPool, req: &CourseSegmentsRequest) -> Result<CourseRow, AppError> {
    rewrite_segments(pool, &req.course_id, |current| {
        merge_unique(current, &req.segment_ids)
    })
    .await
}

pub async fn remove_segments(
    pool: &PgPool,
    req: &CourseSegmentsRequest,
) -> Result<CourseRow, AppError> {
    rewrite_segments(pool, &req.course_id, |current| {
        remove_all(current, &req.segment_ids)
    })
    .await
}

/// Reads a course's segment list under a row lock, rewrites it, stores it.
async fn rewrite_segments(
    pool: &PgPool,
    course_id: &str,
    rewrite: impl FnOnce(&[String]) -> Vec<String>,
) -> Result<CourseRow, AppError> {
    let mut tx = pool.begin().await?;

    let current: Option<Vec<String>> =
        sqlx::query_scalar("SELECT segment_ids FROM courses WHERE course_id = $1 FOR UPDATE")
            .bind(course_id)
            .fetch_optional(&mut *tx)
            .await?;
    let current = current.ok_or_else(|| course_not_found(course_id))?;

    let course = sqlx::query_as::<_, CourseRow>(&format!(
        "UPDATE courses SET segment_ids = $2 WHERE course_id = $1 RETURNING {COURSE_COLUMNS}"
    ))
    .bind(course_id)
    .bind(rewrite(&current))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(course)
}

pub(crate) fn course_not_found(course_id: &str) -> AppError {
    AppError::NotFound(format!("Course {course_id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_course_rejects_missing_fields() {
        let partial = serde_json::from_str::<EditCourseRequest>(
            r#"{"course_id": "C", "course_name": "x", "level": "Basic"}"#,
        );
        assert!(partial.is_err());

        let full: EditCourseRequest = serde_json::from_str(
            r#"{"course_id": "C", "course_name": "x", "level": "Basic",
                "image_uri": "", "description": "Kept on purpose"}"#,
        )
        .unwrap();
        assert_eq!(full.description, "Kept on purpose");
    }
}
