//! GitHub repository search client
//!
//! ## API Reference
//!
//! Endpoint: `{base_url}/search/repositories?q=..&sort=..&order=desc&per_page=..`
//! Returns: `{ "total_count": N, "items": [ repository, ... ] }`
//!
//! Authentication is optional; when a token is configured it is sent as a
//! bearer token, which raises the search rate limit.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::candidate::{Candidate, RawRepository};
use super::source::{QuerySpec, SearchPage, SearchSource};
use crate::error::FetchError;

const USER_AGENT: &str = concat!("ai-repo-tracker/", env!("CARGO_PKG_VERSION"));

/// Search response body
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<RawRepository>,
}

impl From<SearchResponse> for SearchPage {
    fn from(response: SearchResponse) -> Self {
        Self {
            total_count: response.total_count,
            items: response.items.into_iter().map(Candidate::from).collect(),
        }
    }
}

/// reqwest-backed search client
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search/repositories", self.base_url)
    }
}

#[async_trait]
impl SearchSource for GitHubClient {
    async fn search(&self, query: &QuerySpec) -> Result<SearchPage, FetchError> {
        let per_page = query.per_page.to_string();
        let mut request = self
            .client
            .get(self.search_url())
            .header("Accept", "application/vnd.github+json")
            .query(&[
                ("q", query.query.as_str()),
                ("sort", query.sort.as_str()),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ]);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: SearchResponse = response.json().await?;
        log::info!(
            "🔎 Search '{}' succeeded: {} total, {} returned",
            query.query,
            body.total_count,
            body.items.len()
        );

        Ok(body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::source::SortKey;

    #[test]
    fn test_search_response_conversion() {
        let json = r#"{
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {"id": 1, "name": "a", "stargazers_count": 5},
                {"id": 2, "name": "b", "topics": ["llm"]}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let page = SearchPage::from(response);

        assert_eq!(page.total_count, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].stars, 5);
        assert_eq!(page.items[1].topics, vec!["llm".to_string()]);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client =
            GitHubClient::new("https://api.github.com/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(client.search_url(), "https://api.github.com/search/repositories");
    }

    #[tokio::test]
    #[ignore] // Run only when testing with live API
    async fn test_live_search() {
        let client = GitHubClient::new(
            "https://api.github.com",
            std::env::var("GH_TOKEN").ok(),
            Duration::from_secs(10),
        )
        .unwrap();

        let page = client
            .search(&QuerySpec::new("pytorch", SortKey::Stars, 5))
            .await
            .unwrap();

        assert!(page.total_count > 0);
        assert!(!page.items.is_empty());
    }
}
