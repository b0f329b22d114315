//! Tracks open-source AI repositories and posts a short digest of new ones
//!
//! ```text
//! discovery (search API)
//!     → ranking (classify, score)
//!     → pipeline (dedup, select)
//!     → notify (webhook)
//! ```

pub mod discovery;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod pipeline;
pub mod ranking;
pub mod timestamps;

pub use error::{ConfigError, FetchError, NotifyError, ScoreError, StoreError, TrackerError};
pub use pipeline::{TrackerConfig, TrackerEngine};
pub use ranking::Timeframe;
