//! Search source trait for candidate discovery

use async_trait::async_trait;

use super::candidate::Candidate;
use crate::error::FetchError;

/// Sort key accepted by the repository search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Stars,
    Updated,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Stars => "stars",
            SortKey::Updated => "updated",
        }
    }
}

/// One search query: free text (with qualifiers), sort key and page size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub query: String,
    pub sort: SortKey,
    pub per_page: u32,
}

impl QuerySpec {
    pub fn new(query: impl Into<String>, sort: SortKey, per_page: u32) -> Self {
        Self {
            query: query.into(),
            sort,
            per_page,
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub total_count: u64,
    pub items: Vec<Candidate>,
}

/// Source of repository search results
///
/// Results are always requested in descending order of the sort key.
///
/// # Returns
/// * `Ok(SearchPage)` - Query succeeded (possibly with zero items)
/// * `Err(FetchError)` - Network or API error for this query only
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn search(&self, query: &QuerySpec) -> Result<SearchPage, FetchError>;
}
