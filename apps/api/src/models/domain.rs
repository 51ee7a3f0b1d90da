use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DomainRow {
    pub domain_id: String,
    pub domain_name: String,
    pub description: String,
    pub image_uri: String,
    pub on_demand: bool,
    pub courses_ids: Vec<String>,
    pub segment_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}
