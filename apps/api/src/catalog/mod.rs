// Catalog: plain CRUD over courses, domains, segments, module outlines,
// lessons and combined courses. No model calls except the domain
// description on creation.

pub mod combined;
pub mod courses;
pub mod domains;
pub mod handlers;
pub mod lessons;
pub mod modules;
pub mod segments;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Appends the ids from `additions` that are not already present, keeping
/// the order of both lists and dropping repeats within `additions`.
pub fn merge_unique(existing: &[String], additions: &[String]) -> Vec<String> {
    let mut merged = existing.to_vec();
    for id in additions {
        if !merged.contains(id) {
            merged.push(id.clone());
        }
    }
    merged
}

/// Removes every id listed in `removals`, keeping the remaining order.
pub fn remove_all(existing: &[String], removals: &[String]) -> Vec<String> {
    existing
        .iter()
        .filter(|id| !removals.contains(id))
        .cloned()
        .collect()
}
