//! Errors shared by the HTTP-backed services.

use thiserror::Error;

/// Failure talking to a remote service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("{0}")]
    Transport(String),

    /// The service answered with a non-success status. `body` is the compact JSON
    /// error body when one could be parsed, empty otherwise.
    #[error("status={status} {body}")]
    Status { status: u16, body: String },

    /// The response arrived but did not have the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ServiceError::Decode(e.to_string())
        } else {
            ServiceError::Transport(e.to_string())
        }
    }
}

/// Best-effort rendering of an error body: compact JSON if it parses, nothing otherwise.
pub(crate) fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .map(|v| v.to_string())
        .unwrap_or_default()
}
