//! Candidate discovery
//!
//! ```text
//! QuerySpec[] → SearchSource (GitHubClient) → CandidateAggregator → Vec<Candidate>
//! ```

pub mod aggregator;
pub mod candidate;
pub mod github;
pub mod source;

pub use aggregator::{popular_queries, trending_queries, CandidateAggregator};
pub use candidate::{Candidate, RawRepository};
pub use github::GitHubClient;
pub use source::{QuerySpec, SearchPage, SearchSource, SortKey};
