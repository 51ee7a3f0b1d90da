use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleReference {
    pub module_id: String,
    pub module_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseReference {
    pub course_id: String,
    pub course_name: String,
    /// 1-based position in the combined course.
    pub order: i32,
    pub modules: Vec<ModuleReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CombinedCourseRow {
    pub combined_course_id: String,
    pub title: String,
    pub description: String,
    pub image_uri: String,
    pub level: String,
    pub topics: Vec<String>,
    pub is_trending: bool,
    pub is_popular: bool,
    pub courses: Json<Vec<CourseReference>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
