//! Core data model for the filtering pipeline.

use serde::{Deserialize, Serialize};

/// An uploaded log, split into its original lines.
///
/// Order is significant and preserved through every transform. Lines are not
/// deduplicated here; a repeated line keeps every original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDocument {
    lines: Vec<String>,
}

impl LogDocument {
    /// Split raw text into lines on `\n`.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Original lines, untrimmed, in original order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Full original text (for remote relevance prompts).
    pub fn as_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Ordered set of non-empty keywords parsed from a raw input string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Split on comma or plus, trim each token, discard empty tokens.
    pub fn parse(raw: &str) -> Self {
        Self {
            keywords: raw
                .split(|c| c == ',' || c == '+')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Outcome of the remote relevance strategy for one keyword.
///
/// Remote failures degrade to local-only matching instead of aborting the
/// run; the enum keeps that degradation visible to callers and tests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoteOutcome {
    /// The remote strategy answered; `lines` candidate lines were returned.
    Matched { lines: usize },
    /// The remote strategy failed or was unavailable; local matches only.
    FailedFallback { reason: String },
}

impl RemoteOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RemoteOutcome::FailedFallback { .. })
    }
}

/// Per-keyword accounting for one filtering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSummary {
    pub keyword: String,
    pub local_matches: usize,
    pub remote: RemoteOutcome,
}

/// Result of one filtering run: the ordered, deduplicated relevant lines
/// plus per-keyword strategy accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterReport {
    /// Trimmed original lines, in original document order.
    pub lines: Vec<String>,
    pub keywords: Vec<KeywordSummary>,
}
