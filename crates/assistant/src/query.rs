//! Normalized query record.

use serde::Serialize;

/// Minimum question length accepted at the boundary, in characters.
pub const MIN_QUERY_CHARS: usize = 3;

/// Maximum question length accepted at the boundary, in characters.
pub const MAX_QUERY_CHARS: usize = 500;

/// An incoming question, kept both as typed and normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    raw_text: String,
    normalized_text: String,
}

impl Query {
    pub fn new(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let normalized_text = normalize(&raw_text);
        Self {
            raw_text,
            normalized_text,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Trimmed, lower-cased text.
    pub fn normalized_text(&self) -> &str {
        &self.normalized_text
    }
}

/// Trim and lower-case.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
