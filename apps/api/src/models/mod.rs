pub mod combined_course;
pub mod course;
pub mod domain;
pub mod lesson;
pub mod module;
pub mod segment;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Accepts either a JSON string or a list of strings, always yielding a list.
/// Models are inconsistent about whether prerequisites and similar fields are
/// prose or bullet lists.
pub fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
        Missing(Option<()>),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::One(s) if s.trim().is_empty() => Vec::new(),
        StringOrList::One(s) => vec![s],
        StringOrList::Many(v) => v,
        StringOrList::Missing(_) => Vec::new(),
    })
}

/// Accepts a string, a number, or null, yielding a string.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "string_or_list")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        label: String,
    }

    #[test]
    fn test_string_or_list_accepts_both_shapes() {
        let one: Probe = serde_json::from_str(r#"{"items": "Basic HTML"}"#).unwrap();
        assert_eq!(one.items, vec!["Basic HTML"]);

        let many: Probe = serde_json::from_str(r#"{"items": ["a", "b"]}"#).unwrap();
        assert_eq!(many.items, vec!["a", "b"]);

        let null: Probe = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(null.items.is_empty());

        let missing: Probe = serde_json::from_str("{}").unwrap();
        assert!(missing.items.is_empty());
    }

    #[test]
    fn test_lenient_string_accepts_numbers() {
        let p: Probe = serde_json::from_str(r#"{"label": 6}"#).unwrap();
        assert_eq!(p.label, "6");
        let p: Probe = serde_json::from_str(r#"{"label": null}"#).unwrap();
        assert_eq!(p.label, "");
    }
}
