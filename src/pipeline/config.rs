//! Tracker configuration from environment variables

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Upper bound for `RETENTION_DAYS` (about a thousand years)
pub const MAX_RETENTION_DAYS: i64 = 365_000;

/// When selected candidates are recorded as sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitPolicy {
    /// Record every selected candidate, whether or not delivery succeeded
    #[default]
    OnSelection,
    /// Record only after the sink confirmed delivery
    OnDelivery,
}

impl FromStr for CommitPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "selection" => Ok(CommitPolicy::OnSelection),
            "delivery" => Ok(CommitPolicy::OnDelivery),
            _ => Err(ConfigError::InvalidValue {
                var: "COMMIT_POLICY".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration for the tracker
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Optional search API token
    pub github_token: Option<String>,

    /// Search API base URL
    pub github_api_url: String,

    /// Notification webhook; `None` makes every delivery fail
    pub webhook_url: Option<String>,

    /// Path to the sent-records snapshot
    pub store_path: String,

    /// Results requested per query
    pub page_size: u32,

    /// Delay between successive search queries
    pub query_pacing: Duration,

    /// HTTP client timeout
    pub http_timeout: Duration,

    /// Sent records older than this are pruned
    pub retention_days: i64,

    /// Candidates selected per list
    pub top_k: usize,

    pub commit_policy: CommitPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: "https://api.github.com".to_string(),
            webhook_url: None,
            store_path: "sent_projects.json".to_string(),
            page_size: 25,
            query_pacing: Duration::from_millis(1_000),
            http_timeout: Duration::from_secs(30),
            retention_days: 30,
            top_k: 2,
            commit_policy: CommitPolicy::OnSelection,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `GH_TOKEN` (default: unset)
    /// - `GITHUB_API_URL` (default: https://api.github.com)
    /// - `DISCORD_WEBHOOK_URL` (default: unset)
    /// - `SENT_STORE_PATH` (default: sent_projects.json)
    /// - `SEARCH_PAGE_SIZE` (default: 25)
    /// - `QUERY_PACING_MS` (default: 1000)
    /// - `HTTP_TIMEOUT_SECS` (default: 30)
    /// - `RETENTION_DAYS` (default: 30; 1 to `MAX_RETENTION_DAYS`)
    /// - `TOP_K` (default: 2)
    /// - `COMMIT_POLICY` (default: selection; or delivery)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let retention_days = parse_or(&lookup, "RETENTION_DAYS", defaults.retention_days);
        if !(1..=MAX_RETENTION_DAYS).contains(&retention_days) {
            return Err(ConfigError::InvalidValue {
                var: "RETENTION_DAYS".to_string(),
                value: retention_days.to_string(),
            });
        }

        let commit_policy = match non_empty("COMMIT_POLICY") {
            Some(raw) => raw.parse()?,
            None => defaults.commit_policy,
        };

        Ok(Self {
            github_token: non_empty("GH_TOKEN"),
            github_api_url: non_empty("GITHUB_API_URL").unwrap_or(defaults.github_api_url),
            webhook_url: non_empty("DISCORD_WEBHOOK_URL"),
            store_path: non_empty("SENT_STORE_PATH").unwrap_or(defaults.store_path),
            page_size: parse_or(&lookup, "SEARCH_PAGE_SIZE", defaults.page_size),
            query_pacing: Duration::from_millis(parse_or(&lookup, "QUERY_PACING_MS", 1_000)),
            http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30)),
            retention_days,
            top_k: parse_or(&lookup, "TOP_K", defaults.top_k),
            commit_policy,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Invalid {} '{}', defaulting to {}", key, raw, default);
            default
        }),
    }
}
