//! Domains group courses under a subject area and can be flagged on demand.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::catalog::{merge_unique, remove_all};
use crate::errors::{require_non_empty, AppError};
use crate::generation::description::generate_domain_description;
use crate::ids::unique_id;
use crate::llm_client::TextGenerator;
use crate::models::domain::DomainRow;

const DOMAIN_COLUMNS: &str =
    "domain_id, domain_name, description, image_uri, on_demand, courses_ids, segment_ids, created_at";

#[derive(Debug, Deserialize)]
pub struct AddDomainRequest {
    pub domain_name: String,
    #[serde(default)]
    pub image_uri: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDemandRequest {
    pub domain_id: String,
    pub on_demand: bool,
}

#[derive(Debug, Deserialize)]
pub struct DomainCoursesRequest {
    pub domain_id: String,
    pub courses_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDomainRequest {
    pub domain_id: String,
    pub domain_name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct DomainSegmentsRequest {
    pub domain_id: String,
    pub segment_ids: Vec<String>,
}

/// Id-list columns of a domain that can be rewritten in place.
#[derive(Debug, Clone, Copy)]
enum IdList {
    Courses,
    Segments,
}

impl IdList {
    fn column(self) -> &'static str {
        match self {
            IdList::Courses => "courses_ids",
            IdList::Segments => "segment_ids",
        }
    }
}

/// Creates a domain with a generated description. New domains are never on
/// demand.
pub async fn add_domain(
    pool: &PgPool,
    llm: &dyn TextGenerator,
    req: &AddDomainRequest,
) -> Result<DomainRow, AppError> {
    require_non_empty("domain_name", &req.domain_name)?;
    let domain_name = req.domain_name.trim();

    let description = generate_domain_description(llm, domain_name).await?;
    let domain_id = unique_id("DOMAIN");

    let domain = sqlx::query_as::<_, DomainRow>(&format!(
        r#"
        INSERT INTO domains (domain_id, domain_name, description, image_uri, on_demand)
        VALUES ($1, $2, $3, $4, FALSE)
        RETURNING {DOMAIN_COLUMNS}
        "#
    ))
    .bind(&domain_id)
    .bind(domain_name)
    .bind(&description)
    .bind(&req.image_uri)
    .fetch_one(pool)
    .await?;

    info!("Created domain {domain_id}: {domain_name}");
    Ok(domain)
}

pub async fn list_domains(pool: &PgPool) -> Result<Vec<DomainRow>, AppError> {
    Ok(sqlx::query_as::<_, DomainRow>(&format!(
        "SELECT {DOMAIN_COLUMNS} FROM domains ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?)
}

pub async fn list_on_demand(pool: &PgPool) -> Result<Vec<DomainRow>, AppError> {
    Ok(sqlx::query_as::<_, DomainRow>(&format!(
        "SELECT {DOMAIN_COLUMNS} FROM domains WHERE on_demand ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?)
}

pub async fn set_on_demand(pool: &PgPool, req: &UpdateDemandRequest) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE domains SET on_demand = $2 WHERE domain_id = $1")
        .bind(&req.domain_id)
        .bind(req.on_demand)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(domain_not_found(&req.domain_id));
    }
    Ok(())
}

pub async fn update_domain(pool: &PgPool, req: &UpdateDomainRequest) -> Result<DomainRow, AppError> {
    require_non_empty("domain_name", &req.domain_name)?;

    sqlx::query_as::<_, DomainRow>(&format!(
        r#"
        UPDATE domains SET domain_name = $2, description = $3
        WHERE domain_id = $1
        RETURNING {DOMAIN_COLUMNS}
        "#
    ))
    .bind(&req.domain_id)
    .bind(req.domain_name.trim())
    .bind(&req.description)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| domain_not_found(&req.domain_id))
}

pub async fn delete_domain(pool: &PgPool, domain_id: &str) -> Result<(), AppError> {
    require_non_empty("domain_id", domain_id)?;
    let result = sqlx::query("DELETE FROM domains WHERE domain_id = $1")
        .bind(domain_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(domain_not_found(domain_id));
    }
    info!("Deleted domain {domain_id}");
    Ok(())
}

/// Adds course ids to a domain, skipping ones it already lists.
pub async fn add_courses(pool: &PgPool, req: &DomainCoursesRequest) -> Result<DomainRow, AppError> {
    rewrite_ids(pool, &req.domain_id, IdList::Courses, |current| {
        merge_unique(current, &req.courses_ids)
    })
    .await
}

/// Unlinks one course from a domain. The course itself is untouched.
pub async fn remove_course(
    pool: &PgPool,
    domain_id: &str,
    course_id: &str,
) -> Result<DomainRow, AppError> {
    require_non_empty("domain_id", domain_id)?;
    require_non_empty("course_id", course_id)?;
    let removal = [course_id.to_string()];
    rewrite_ids(pool, domain_id, IdList::Courses, |current| {
        remove_all(current, &removal)
    })
    .await
}

pub async fn add_segments(pool: &PgPool, req: &DomainSegmentsRequest) -> Result<DomainRow, AppError> {
    rewrite_ids(pool, &req.domain_id, IdList::Segments, |current| {
        merge_unique(current, &req.segment_ids)
    })
    .await
}

pub async fn remove_segments(
    pool: &PgPool,
    req: &DomainSegmentsRequest,
) -> Result<DomainRow, AppError> {
    rewrite_ids(pool, &req.domain_id, IdList::Segments, |current| {
        remove_all(current, &req.segment_ids)
    })
    .await
}

async fn rewrite_ids(
    pool: &PgPool,
    domain_id: &str,
    list: IdList,
    rewrite: impl FnOnce(&[String]) -> Vec<String>,
) -> Result<DomainRow, AppError> {
    let column = list.column();
    let mut tx = pool.begin().await?;

    let current: Option<Vec<String>> = sqlx::query_scalar(&format!(
        "SELECT {column} FROM domains WHERE domain_id = $1 FOR UPDATE"
    ))
    .bind(domain_id)
    .fetch_optional(&mut *tx)
    .await?;
    let current = current.ok_or_else(|| domain_not_found(domain_id))?;

    let domain = sqlx::query_as::<_, DomainRow>(&format!(
        "UPDATE domains SET {column} = $2 WHERE domain_id = $1 RETURNING {DOMAIN_COLUMNS}"
    ))
    .bind(domain_id)
    .bind(rewrite(&current))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(domain)
}

fn domain_not_found(domain_id: &str) -> AppError {
    AppError::NotFound(format!("Domain {domain_id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_list_columns() {
        assert_eq!(IdList::Courses.column(), "courses_ids");
        assert_eq!(IdList::Segments.column(), "segment_ids");
    }

    #[test]
    fn test_add_domain_request_defaults_image() {
        let req: AddDomainRequest =
            serde_json::from_str(r#"{"domain_name": "Data Science"}"#).unwrap();
        assert_eq!(req.domain_name, "Data Science");
        assert!(req.image_uri.is_empty());
    }

    #[test]
    fn test_update_domain_requires_description() {
        let partial = serde_json::from_str::<UpdateDomainRequest>(
            r#"{"domain_id": "DOMAIN_1", "domain_name": "Data"}"#,
        );
        assert!(partial.is_err());
    }
}
