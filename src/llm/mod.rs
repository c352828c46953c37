//! Chat-completions client for the text-generation capability.
//!
//! The service is consumed as untrusted text in, untrusted text out; callers
//! own prompt construction and response interpretation.

mod client;

pub use client::{ChatClient, ChatMessage};

use thiserror::Error;

/// Errors from the text-generation capability.
///
/// These never surface to an HTTP caller; the filter engine degrades the
/// affected keyword to local-only matching.
#[derive(Error, Debug)]
pub enum LlmError {
    /// API key environment variable is unset
    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),

    /// Transport-level failure (connect, timeout, decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the service
    #[error("Service returned status {code}: {body}")]
    Status { code: u16, body: String },
}

/// Result type alias for LLM operations
pub type LlmResult<T> = std::result::Result<T, LlmError>;
