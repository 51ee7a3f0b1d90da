//! Segments are audience tags shared by courses and domains.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::errors::{conflict_on_unique, require_non_empty, AppError};
use crate::ids::unique_id;
use crate::models::segment::SegmentRow;

#[derive(Debug, Deserialize)]
pub struct AddSegmentRequest {
    pub segment_name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSegmentRequest {
    pub segment_id: String,
    pub segment_name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSegmentRequest {
    pub segment_id: String,
}

#[derive(Debug, Serialize)]
pub struct SegmentCreated {
    pub segment_id: String,
}

pub async fn add_segment(pool: &PgPool, req: &AddSegmentRequest) -> Result<SegmentCreated, AppError> {
    require_non_empty("segment_name", &req.segment_name)?;
    let segment_name = req.segment_name.trim();
    let segment_id = unique_id("segment");

    sqlx::query(
        "INSERT INTO segments (segment_id, segment_name, segment_description) VALUES ($1, $2, $3)",
    )
    .bind(&segment_id)
    .bind(segment_name)
    .bind(&req.description)
    .execute(pool)
    .await
    .map_err(|e| duplicate_name(e, segment_name))?;

    info!("Created segment {segment_id}: {segment_name}");
    Ok(SegmentCreated { segment_id })
}

pub async fn update_segment(
    pool: &PgPool,
    req: &UpdateSegmentRequest,
) -> Result<SegmentRow, AppError> {
    require_non_empty("segment_name", &req.segment_name)?;
    let segment_name = req.segment_name.trim();

    sqlx::query_as::<_, SegmentRow>(
        r#"
        UPDATE segments SET segment_name = $2, segment_description = $3
        WHERE segment_id = $1
        RETURNING segment_id, segment_name, segment_description
        "#,
    )
    .bind(&req.segment_id)
    .bind(segment_name)
    .bind(&req.description)
    .fetch_optional(pool)
    .await
    .map_err(|e| duplicate_name(e, segment_name))?
    .ok_or_else(|| segment_not_found(&req.segment_id))
}

/// Deletes a segment and strips its id from every course and domain.
pub async fn delete_segment(pool: &PgPool, segment_id: &str) -> Result<(), AppError> {
    require_non_empty("segment_id", segment_id)?;
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM segments WHERE segment_id = $1")
        .bind(segment_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(segment_not_found(segment_id));
    }

    for table in ["domains", "courses"] {
        sqlx::query(&format!(
            "UPDATE {table} SET segment_ids = array_remove(segment_ids, $1) WHERE $1 = ANY(segment_ids)"
        ))
        .bind(segment_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!("Deleted segment {segment_id} and its references");
    Ok(())
}

pub async fn get_segment(pool: &PgPool, segment_id: &str) -> Result<SegmentRow, AppError> {
    require_non_empty("segment_id", segment_id)?;
    sqlx::query_as::<_, SegmentRow>(
        "SELECT segment_id, segment_name, segment_description FROM segments WHERE segment_id = $1",
    )
    .bind(segment_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| segment_not_found(segment_id))
}

pub async fn list_segments(pool: &PgPool) -> Result<Vec<SegmentRow>, AppError> {
    Ok(sqlx::query_as::<_, SegmentRow>(
        "SELECT segment_id, segment_name, segment_description FROM segments ORDER BY segment_name",
    )
    .fetch_all(pool)
    .await?)
}

fn duplicate_name(e: sqlx::Error, segment_name: &str) -> AppError {
    conflict_on_unique(e, format!("Segment '{segment_name}' already exists"))
}

fn segment_not_found(segment_id: &str) -> AppError {
    AppError::NotFound(format!("Segment {segment_id} not found"))
}
