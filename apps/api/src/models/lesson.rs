use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    #[default]
    Read,
    ReadAndExecute,
}

impl LessonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonType::Read => "read",
            LessonType::ReadAndExecute => "read_and_execute",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonRow {
    pub lesson_id: String,
    pub course_id: String,
    pub module_id: String,
    pub position: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: String,
    pub content: String,
    pub instruction: Option<String>,
    pub expected_output: Option<String>,
    pub answer: Option<String>,
    pub outline: Option<String>,
}
