//! Candidate aggregation across topic-partitioned queries
//!
//! The search API caps query length, so each list is built from several
//! narrower queries issued one after another. Results are merged and
//! deduplicated by repository id (first-seen wins).

use chrono::{Duration as ChronoDuration, NaiveDate};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;

use super::candidate::Candidate;
use super::source::{QuerySpec, SearchSource, SortKey};

/// Topic partitions for the "popular" list (sorted by stars)
pub const POPULAR_QUERIES: [&str; 4] = [
    r#"machine learning OR "artificial intelligence" OR "deep learning""#,
    "tensorflow OR pytorch OR keras",
    r#"nlp OR "natural language processing" OR transformer OR gpt"#,
    r#""computer vision" OR opencv OR yolo"#,
];

/// Topic partitions for the "trending" list (sorted by last update)
pub const TRENDING_QUERIES: [&str; 4] = [
    "machine learning",
    "tensorflow OR pytorch",
    "nlp OR gpt",
    r#""computer vision""#,
];

/// Only items pushed within this many days are considered trending
pub const TRENDING_LOOKBACK_DAYS: i64 = 30;

/// Build the popular query set
pub fn popular_queries(per_page: u32) -> Vec<QuerySpec> {
    POPULAR_QUERIES
        .iter()
        .map(|q| QuerySpec::new(*q, SortKey::Stars, per_page))
        .collect()
}

/// Build the trending query set, restricted to items pushed after `today - 30d`
pub fn trending_queries(today: NaiveDate, per_page: u32) -> Vec<QuerySpec> {
    let since = today - ChronoDuration::days(TRENDING_LOOKBACK_DAYS);
    let qualifier = format!("pushed:>{}", since.format("%Y-%m-%d"));

    TRENDING_QUERIES
        .iter()
        .map(|q| QuerySpec::new(format!("{} {}", q, qualifier), SortKey::Updated, per_page))
        .collect()
}

/// Merges query results into a single id-unique candidate list
pub struct CandidateAggregator {
    source: Box<dyn SearchSource>,
    pacing: Duration,
    per_page: u32,
}

impl CandidateAggregator {
    pub fn new(source: Box<dyn SearchSource>, pacing: Duration, per_page: u32) -> Self {
        Self {
            source,
            pacing,
            per_page,
        }
    }

    /// Run `queries` in order and merge the results
    ///
    /// A failed query is logged and contributes nothing; the remaining
    /// queries still run. Output order is first-seen order across queries.
    pub async fn aggregate(&self, queries: &[QuerySpec]) -> Vec<Candidate> {
        let mut seen: HashSet<u64> = HashSet::new();
        let mut merged = Vec::new();

        for (i, query) in queries.iter().enumerate() {
            if i > 0 && !self.pacing.is_zero() {
                sleep(self.pacing).await;
            }

            match self.source.search(query).await {
                Ok(page) => {
                    for candidate in page.items {
                        if seen.insert(candidate.id) {
                            merged.push(candidate);
                        }
                    }
                }
                Err(e) => {
                    log::error!("❌ Search query '{}' failed: {}", query.query, e);
                }
            }
        }

        log::debug!(
            "Aggregated {} unique candidates from {} queries",
            merged.len(),
            queries.len()
        );
        merged
    }

    /// Most-starred candidates across the popular partitions
    pub async fn popular(&self) -> Vec<Candidate> {
        self.aggregate(&popular_queries(self.per_page)).await
    }

    /// Recently-pushed candidates across the trending partitions
    pub async fn trending(&self, today: NaiveDate) -> Vec<Candidate> {
        self.aggregate(&trending_queries(today, self.per_page)).await
    }
}
