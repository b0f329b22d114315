//! # Tracker Pipeline
//!
//! Stateful side of the tracker: configuration, the persisted sent-store and
//! the engine that runs notification cycles against them.
//!
//! ## Module Organization
//!
//! - `config` - Environment-driven configuration and commit policy
//! - `sent_store` - Persisted ledger of already-surfaced candidates
//! - `engine` - Cycle orchestration (`run`, `run_commercial`, `run_multi`)

pub mod config;
pub mod engine;
pub mod sent_store;

pub use config::{CommitPolicy, TrackerConfig};
pub use engine::{CycleOutcome, CycleReport, EngineSettings, TrackerEngine, MULTI_TIMEFRAMES};
pub use sent_store::{SentRecord, SentStore, StoreStats, DEFAULT_RETENTION_DAYS};
