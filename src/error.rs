//! Process-level errors for the command-line front end.

use listing::{ApiError, SubmitError};

/// Everything `main` can fail with. Each variant prints as a one-line
/// message and the process exits non-zero.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("unknown category `{0}`; run `scanlist categories` for the list")]
    UnknownCategory(String),
    #[error("invalid UPC `{0}`; expected 8, 12, 13 or 14 digits")]
    InvalidUpc(String),
    #[error("no description template for category `{0}`")]
    NoTemplate(String),
    #[error("market data covers 30, 90 or 365 days, not {0}")]
    InvalidWindow(u32),
    #[error("no valid UPCs in input")]
    EmptyBatch,
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
