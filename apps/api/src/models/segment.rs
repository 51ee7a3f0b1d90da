use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SegmentRow {
    pub segment_id: String,
    pub segment_name: String,
    pub segment_description: String,
}
