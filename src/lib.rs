//! LLM-assisted log filtering service.
//!
//! A user uploads a text log and a keyword set; the service unions a
//! deterministic local substring match with an LLM-based semantic relevance
//! match per keyword, deduplicates by trimmed-line identity, restores the
//! original document order, and optionally annotates known diagnostic line
//! formats with decoded summaries.
//!
//! The local matcher guarantees recall on literal keyword occurrences; the
//! remote strategy is best-effort enrichment and every remote failure
//! degrades to local-only matching for the affected keyword.

pub mod annotate;
pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod render;
pub mod upload;

pub use error::{AppError, Result};
