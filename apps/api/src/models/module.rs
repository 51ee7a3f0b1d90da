use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Prerequisites {
    pub knowledge: Vec<String>,
    pub technical: Vec<String>,
}

/// Accepts the `{knowledge, technical}` object with string or list members,
/// a bare string or list (read as knowledge), or null.
impl<'de> Deserialize<'de> for Prerequisites {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Object(mut map) => Prerequisites {
                knowledge: items(map.remove("knowledge")),
                technical: items(map.remove("technical")),
            },
            other => Prerequisites {
                knowledge: items(Some(other)),
                technical: Vec::new(),
            },
        })
    }
}

fn items(value: Option<Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) if s.trim().is_empty() => Vec::new(),
        Some(Value::String(s)) => vec![s],
        Some(Value::Array(values)) => values.into_iter().flat_map(|v| items(Some(v))).collect(),
        Some(other) => vec![other.to_string()],
    }
}

/// Course-level part of a generated outline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseOutlineRow {
    pub course_id: String,
    pub course: String,
    pub level: String,
    pub duration: String,
    pub num_modules: i32,
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ModuleRow {
    pub module_id: String,
    pub course_id: String,
    pub position: i32,
    pub title: String,
    pub description: String,
    pub estimated_completion_time: String,
    pub prerequisites: Json<Prerequisites>,
    pub learning_objectives: Vec<String>,
    pub key_topics: Vec<String>,
    pub practical_applications: Vec<String>,
}

/// A module row plus the number of lessons stored under it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ModuleWithLessonCount {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub module: ModuleRow,
    pub lesson_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Prerequisites {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_prerequisites_object_with_mixed_members() {
        let p = parse(r#"{"knowledge": "Basic HTML", "technical": ["Node 18", null, ""]}"#);
        assert_eq!(p.knowledge, vec!["Basic HTML"]);
        assert_eq!(p.technical, vec!["Node 18"]);
    }

    #[test]
    fn test_prerequisites_bare_string_and_list_are_knowledge() {
        assert_eq!(parse(r#""Basic programming""#).knowledge, vec!["Basic programming"]);
        let p = parse(r#"["Variables", "Loops"]"#);
        assert_eq!(p.knowledge, vec!["Variables", "Loops"]);
        assert!(p.technical.is_empty());
    }

    #[test]
    fn test_prerequisites_null_is_empty() {
        assert_eq!(parse("null"), Prerequisites::default());
        assert_eq!(parse("{}"), Prerequisites::default());
    }
}
