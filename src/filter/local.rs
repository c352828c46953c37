use crate::models::LogDocument;

/// Deterministic substring matcher.
///
/// Guarantees recall for literal keyword occurrences: pure, case-insensitive,
/// no I/O, never fails. This path is what keeps the service correct when the
/// remote strategy is unavailable, slow, or wrong.
pub struct LocalMatcher;

impl LocalMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Trimmed original lines whose lowercase form contains the keyword's
    /// lowercase form as a substring.
    pub fn find_matches(&self, document: &LogDocument, keyword: &str) -> Vec<String> {
        let needle = keyword.to_lowercase();

        document
            .lines()
            .iter()
            .map(|line| line.trim())
            .filter(|line| line.to_lowercase().contains(&needle))
            .map(str::to_string)
            .collect()
    }
}

impl Default for LocalMatcher {
    fn default() -> Self {
        Self::new()
    }
}
