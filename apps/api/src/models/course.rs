use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseRow {
    pub course_id: String,
    pub course_name: String,
    pub level: String,
    pub description: String,
    pub image_uri: String,
    pub segment_ids: Vec<String>,
    pub is_popular: bool,
    pub is_trending: bool,
    pub created_at: DateTime<Utc>,
}

/// Course listing row, joined with the module count of its outline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseSummaryRow {
    pub course_id: String,
    pub course_name: String,
    pub level: String,
    pub description: String,
    pub image_uri: String,
    pub segment_ids: Vec<String>,
    pub is_popular: bool,
    pub is_trending: bool,
    pub created_at: DateTime<Utc>,
    /// Clients read this as `num_courses`.
    #[serde(rename = "num_courses")]
    pub num_modules: i32,
}

/// Course fields shown next to a module outline (identity fields omitted).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseDetails {
    pub level: String,
    pub description: String,
    pub image_uri: String,
    pub segment_ids: Vec<String>,
    pub is_popular: bool,
    pub is_trending: bool,
}
