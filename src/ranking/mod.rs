//! Relevance classification and trend ranking
//!
//! ```text
//! Vec<Candidate>
//!     ↓
//! RelevanceClassifier (topical / commercial)
//!     ↓
//! TrendScorer::rank(timeframe)
//!     ↓
//! Vec<Candidate> (trend_score attached, descending)
//! ```

pub mod classifier;
pub mod timeframe;
pub mod trend;

pub use classifier::{
    ClassificationMode, ClassificationResult, KeywordTables, RelevanceClassifier,
    COMMERCIAL_THRESHOLD,
};
pub use timeframe::{Timeframe, WindowPolicy};
pub use trend::{weighted_rate, TrendScore, TrendScorer};
