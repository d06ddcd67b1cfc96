//! Error types for backend calls and listing submission.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal. Every variant renders to a message that the UI or
//! CLI shows as-is; there is no retry or backoff anywhere in the crate.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

use crate::form::ValidationIssue;

/// Failure of a single backend request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (network, CORS, DNS, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the JSON shape we expected.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The response parsed but lacked a field we need.
    #[error("response missing expected field `{0}`")]
    MissingData(String),
}

impl ApiError {
    /// Build a [`ApiError::Status`] from a non-success response body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        Self::Status { status, message: error_message(body) }
    }
}

/// Failure of a listing submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The form failed validation; no request was sent.
    #[error("listing is incomplete: {}", summarize(.0))]
    Validation(Vec<ValidationIssue>),

    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    InProgress,

    /// The listing was already created; start a new one to list again.
    #[error("this listing has already been submitted")]
    AlreadySubmitted,

    /// The create request itself failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Pull a human-readable message out of an error body.
///
/// Prefers `detail`, then `message`, then `error`; falls back to the raw
/// trimmed body, or a generic message when the body is empty.
#[must_use]
pub fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(text) = value.get(key).and_then(Value::as_str) {
                return text.to_owned();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() { "request failed".to_owned() } else { trimmed.to_owned() }
}
