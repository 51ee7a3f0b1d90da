use uuid::Uuid;

/// Builds a public identifier such as `COURSE_1A2B3C4D`.
///
/// The suffix is the first 8 hex digits of a v4 UUID, upper-cased. Collisions
/// are caught by the primary keys on insert.
pub fn unique_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", hex[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_id_shape() {
        let id = unique_id("COURSE");
        let (prefix, suffix) = id.split_once('_').unwrap();
        assert_eq!(prefix, "COURSE");
        assert_eq!(suffix.len(), 8);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_unique_id_keeps_lowercase_prefix() {
        assert!(unique_id("segment").starts_with("segment_"));
    }

    #[test]
    fn test_unique_ids_differ() {
        assert_ne!(unique_id("LESSON"), unique_id("LESSON"));
    }
}
