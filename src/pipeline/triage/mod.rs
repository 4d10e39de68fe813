//! Symptom triage: vagueness check, backend chain, and section normalization.
//!
//! Flow: classify → orchestrator → backend (Gemini, then Ollama) →
//! normalize → deterministic fallback when every backend failed.

pub mod types;
pub mod classify;
pub mod form;
pub mod prompt;
pub mod normalize;
pub mod render;
pub mod gemini;
pub mod ollama;
pub mod fallback;
pub mod orchestrator;

#[cfg(test)]
mod test_support;

pub use types::*;
pub use classify::*;
pub use form::*;
pub use prompt::*;
pub use normalize::*;
pub use render::*;
pub use gemini::*;
pub use ollama::*;
pub use fallback::*;
pub use orchestrator::*;

use thiserror::Error;

/// Why a generation backend did not produce usable text.
///
/// Every variant is caught at the adapter boundary and carried inside a
/// `GenerationResult`; none of them ever reaches the caller of `resolve`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriageError {
    #[error("No API credential configured for the cloud backend")]
    CredentialMissing,

    #[error("Backend is not reachable at {0}")]
    Unreachable(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Backend returned error (status {status}): {body}")]
    BadStatus { status: u16, body: String },

    #[error("Malformed backend payload: {0}")]
    MalformedPayload(String),

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("HTTP client error: {0}")]
    Http(String),
}

impl TriageError {
    /// Map a transport error from the blocking client onto the taxonomy.
    pub(crate) fn from_transport(err: &reqwest::Error, url: &str, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            TriageError::Timeout(timeout_secs)
        } else if err.is_connect() {
            TriageError::Unreachable(url.to_string())
        } else {
            TriageError::Http(err.to_string())
        }
    }
}
