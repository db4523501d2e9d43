//! Error types shared across the service.

use thiserror::Error;

/// Problems with the process configuration. These are fatal at
/// startup.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing env var {0}")]
    Missing(&'static str),

    #[error("Invalid API key format: expected a key starting with \"{0}\"")]
    InvalidApiKey(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Failures talking to the remote completion API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("rate_limit_error: {0}")]
    RateLimited(String),

    #[error("Completion API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl UpstreamError {
    /// True when the failure looks like the remote side throttling us,
    /// either by variant or by the error text mentioning a rate limit.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, UpstreamError::RateLimited(_)) || self.to_string().contains("rate_limit")
    }
}

/// Errors surfaced to the caller by the chat orchestration. Upstream
/// failures never show up here, they become apologies instead.
#[derive(Error, Debug, PartialEq)]
pub enum ChatError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
