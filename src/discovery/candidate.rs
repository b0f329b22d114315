//! Candidate repository records
//!
//! The search API returns loosely-typed records where almost every field may
//! be null. `RawRepository` mirrors that payload; converting into `Candidate`
//! resolves the defaults once so nothing downstream has to.

use serde::Deserialize;

use crate::ranking::TrendScore;

/// Repository record as returned by the search API
#[derive(Debug, Clone, Deserialize)]
pub struct RawRepository {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub forks_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// A discovered repository under evaluation
///
/// Defaults: missing strings become empty, missing topics an empty list,
/// missing counts zero. `description` and `language` stay optional because
/// message formatting distinguishes "absent" from "empty".
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub topics: Vec<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub created_at: String,
    pub updated_at: String,
    pub url: String,
    /// Attached only for the duration of a ranking pass
    pub trend_score: Option<TrendScore>,
}

impl Candidate {
    /// Lowercased `name description topics` blob used by keyword matching
    pub fn text_blob(&self) -> String {
        format!(
            "{} {} {}",
            self.name,
            self.description.as_deref().unwrap_or(""),
            self.topics.join(" ")
        )
        .to_lowercase()
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn language_or_unknown(&self) -> &str {
        match self.language.as_deref() {
            Some(lang) if !lang.is_empty() => lang,
            _ => "Unknown",
        }
    }
}

impl From<RawRepository> for Candidate {
    fn from(raw: RawRepository) -> Self {
        Self {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            full_name: raw.full_name.unwrap_or_default(),
            description: raw.description,
            topics: raw.topics.unwrap_or_default(),
            language: raw.language,
            stars: raw.stargazers_count.unwrap_or(0),
            forks: raw.forks_count.unwrap_or(0),
            created_at: raw.created_at.unwrap_or_default(),
            updated_at: raw.updated_at.unwrap_or_default(),
            url: raw.html_url.unwrap_or_default(),
            trend_score: None,
        }
    }
}
