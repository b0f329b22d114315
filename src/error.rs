//! Error types for the tracker
//!
//! Only per-query, per-candidate and delivery failures are absorbed inside a
//! cycle. Configuration errors always propagate to the caller.

use thiserror::Error;

/// Failure of a single search query
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Failure reading or writing the sent-store snapshot
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure computing a trend score for one candidate
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("candidate has no created_at timestamp")]
    MissingTimestamp,

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Failure delivering a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook URL is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned {0}")]
    Status(u16),
}

/// Caller/configuration errors. These fail fast.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unsupported timeframe '{0}' (expected lifetime, 30days or 7days)")]
    UnsupportedTimeframe(String),

    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: String, value: String },
}

/// Top-level error for the command surface
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}
