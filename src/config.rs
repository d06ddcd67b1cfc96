//! Backend connection settings.
//!
//! Values arrive from command-line flags or their `SCANLIST_*` environment
//! fallbacks (see `main.rs`); this module only validates them.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::time::Duration;

use crate::error::CliError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Whole-request limit; `None` waits as long as the backend takes.
    pub request_secs: Option<u64>,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: None, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Option<Duration> {
        self.request_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Scheme and host of the backend, without a trailing slash.
    pub api_url: String,
    pub timeouts: Timeouts,
}

impl Config {
    /// Validate the backend URL and bundle it with the timeouts.
    ///
    /// # Errors
    ///
    /// [`CliError::InvalidBaseUrl`] unless the URL is a non-empty `http://`
    /// or `https://` address.
    pub fn new(api_url: &str, timeouts: Timeouts) -> Result<Self, CliError> {
        let api_url = api_url.trim().trim_end_matches('/');
        let host = api_url.strip_prefix("https://").or_else(|| api_url.strip_prefix("http://"));
        match host {
            Some(host) if !host.is_empty() && !host.starts_with('/') => {
                Ok(Self { api_url: api_url.to_owned(), timeouts })
            }
            _ => Err(CliError::InvalidBaseUrl(api_url.to_owned())),
        }
    }

    /// Absolute URL for an `/api/...` path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }
}
