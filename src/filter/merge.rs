use crate::models::LogDocument;
use std::collections::HashSet;

/// Merge & order resolver.
///
/// Candidates use trimmed-string equality as their sole identity; membership
/// is decided by scanning the original document, so a candidate that
/// trim-matches no original line (a remote hallucination) contributes
/// nothing. Output order is the document's order, and a line that repeats in
/// the document is kept at every matching position.
pub fn resolve(document: &LogDocument, candidates: &HashSet<String>) -> Vec<String> {
    document
        .lines()
        .iter()
        .map(|line| line.trim())
        .filter(|trimmed| candidates.contains(*trimmed))
        .map(str::to_string)
        .collect()
}

/// Collect candidate lines into the deduplication set (trimmed, empties
/// dropped).
pub fn collect_candidates<I, S>(lines: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| line.as_ref().trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
