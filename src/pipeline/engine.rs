//! Tracker Engine - orchestration of one notification cycle
//!
//! ## Cycle
//!
//! ```text
//! prune(retention)
//!     ↓
//! fetch popular + trending        (both empty → NothingFetched)
//!     ↓
//! classify (topical | commercial)
//!     ↓
//! filter_new (SentStore)
//!     ↓
//! rank trending (timeframe)
//!     ↓
//! top-k popular, top-k trending   (both empty → NothingNew)
//!     ↓
//! build digest → deliver
//!     ↓
//! mark_sent (per CommitPolicy)
//! ```
//!
//! Every stage is awaited in turn; nothing is spawned. Consecutive cycles in
//! one process share the same `SentStore`, so marks from one cycle are seen
//! by the next.

use chrono::{DateTime, Utc};
use std::fmt;

use super::config::{CommitPolicy, TrackerConfig};
use super::sent_store::{SentStore, StoreStats};
use crate::discovery::{Candidate, CandidateAggregator, GitHubClient};
use crate::error::TrackerError;
use crate::notify::{build_digest, NotificationSink, WebhookNotifier};
use crate::persistence::JsonFileBackend;
use crate::ranking::{ClassificationMode, RelevanceClassifier, Timeframe, TrendScorer};

/// Timeframes covered by `run_multi`, in order
pub const MULTI_TIMEFRAMES: [Timeframe; 2] = [Timeframe::Days30, Timeframe::Days7];

/// Engine knobs taken from `TrackerConfig`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub top_k: usize,
    pub retention_days: i64,
    pub commit_policy: CommitPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            top_k: 2,
            retention_days: 30,
            commit_policy: CommitPolicy::OnSelection,
        }
    }
}

impl From<&TrackerConfig> for EngineSettings {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            top_k: config.top_k,
            retention_days: config.retention_days,
            commit_policy: config.commit_policy,
        }
    }
}

/// How a cycle ended
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Every fetch came back empty; nothing was classified
    NothingFetched,
    /// Candidates were fetched but none survived classification and dedup
    NothingNew,
    /// A digest was built and handed to the sink
    Notified {
        popular: usize,
        trending: usize,
        delivered: bool,
        committed: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub mode: ClassificationMode,
    pub timeframe: Timeframe,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    pub fn delivered(&self) -> bool {
        matches!(self.outcome, CycleOutcome::Notified { delivered: true, .. })
    }

    pub fn committed(&self) -> usize {
        match self.outcome {
            CycleOutcome::Notified { committed, .. } => committed,
            _ => 0,
        }
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            ClassificationMode::Topical => "topical",
            ClassificationMode::Commercial => "commercial",
        };
        match &self.outcome {
            CycleOutcome::NothingFetched => {
                write!(f, "{} {}: nothing fetched", mode, self.timeframe)
            }
            CycleOutcome::NothingNew => {
                write!(f, "{} {}: no new candidates", mode, self.timeframe)
            }
            CycleOutcome::Notified {
                popular,
                trending,
                delivered,
                committed,
            } => write!(
                f,
                "{} {}: {} popular + {} trending, delivered={}, committed={}",
                mode, self.timeframe, popular, trending, delivered, committed
            ),
        }
    }
}

/// Per-cycle parameters
#[derive(Debug, Clone, Copy)]
struct CyclePlan {
    mode: ClassificationMode,
    timeframe: Timeframe,
    include_popular: bool,
    commit_policy: CommitPolicy,
}

/// Orchestrates fetch → classify → dedup → rank → notify → commit
pub struct TrackerEngine {
    aggregator: CandidateAggregator,
    classifier: RelevanceClassifier,
    scorer: TrendScorer,
    store: SentStore,
    sink: Box<dyn NotificationSink>,
    settings: EngineSettings,

    /// Timestamp function (for testing with mock time)
    now_fn: Box<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl TrackerEngine {
    pub fn new(
        aggregator: CandidateAggregator,
        store: SentStore,
        sink: Box<dyn NotificationSink>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            aggregator,
            classifier: RelevanceClassifier::with_defaults(),
            scorer: TrendScorer::new(),
            store,
            sink,
            settings,
            now_fn: Box::new(Utc::now),
        }
    }

    /// Production wiring: GitHub search, JSON snapshot, webhook sink
    pub fn from_config(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let source = GitHubClient::new(
            config.github_api_url.clone(),
            config.github_token.clone(),
            config.http_timeout,
        )?;
        let aggregator =
            CandidateAggregator::new(Box::new(source), config.query_pacing, config.page_size);
        let store = SentStore::open(Box::new(JsonFileBackend::new(&config.store_path)));
        let sink = WebhookNotifier::new(config.webhook_url.clone(), config.http_timeout)?;

        if !sink.is_configured() {
            log::warn!("⚠️  DISCORD_WEBHOOK_URL not set; deliveries will fail");
        }

        Ok(Self::new(aggregator, store, Box::new(sink), config.into()))
    }

    /// Replace the keyword tables
    pub fn with_classifier(mut self, classifier: RelevanceClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Use `now_fn` for the cycle date, the digest timestamp and trend ages
    pub fn with_clock<F>(mut self, now_fn: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Clone + Send + Sync + 'static,
    {
        self.scorer = TrendScorer::with_clock(Box::new(now_fn.clone()));
        self.now_fn = Box::new(now_fn);
        self
    }

    pub fn store(&self) -> &SentStore {
        &self.store
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Topical cycle for `timeframe`
    pub async fn run(&mut self, timeframe: Timeframe) -> CycleReport {
        log::info!("🚀 Starting AI project tracking ({})", timeframe);
        self.prune();
        self.cycle(CyclePlan {
            mode: ClassificationMode::Topical,
            timeframe,
            include_popular: true,
            commit_policy: self.settings.commit_policy,
        })
        .await
    }

    /// Commercial cycle for `timeframe`
    pub async fn run_commercial(&mut self, timeframe: Timeframe) -> CycleReport {
        log::info!("💼 Starting commercial AI project tracking ({})", timeframe);
        self.prune();
        self.cycle(CyclePlan {
            mode: ClassificationMode::Commercial,
            timeframe,
            include_popular: true,
            commit_policy: self.settings.commit_policy,
        })
        .await
    }

    /// Trending-only cycles for 30 days then 7 days
    ///
    /// Prunes once up front. Candidates are committed only when the sink
    /// confirms delivery, and a timeframe whose fetch is empty is skipped.
    pub async fn run_multi(&mut self) -> Vec<CycleReport> {
        log::info!("🚀 Starting multi-timeframe tracking");
        self.prune();

        let mut reports = Vec::with_capacity(MULTI_TIMEFRAMES.len());
        for timeframe in MULTI_TIMEFRAMES {
            log::info!("📊 Processing {} timeframe", timeframe);
            let report = self
                .cycle(CyclePlan {
                    mode: ClassificationMode::Topical,
                    timeframe,
                    include_popular: false,
                    commit_policy: CommitPolicy::OnDelivery,
                })
                .await;
            reports.push(report);
        }
        reports
    }

    /// Clear the store, copying the snapshot aside first when `backup` is set
    pub fn reset(&mut self, backup: bool) -> Result<Option<String>, TrackerError> {
        let backup_path = if backup { self.store.backup()? } else { None };
        self.store.reset()?;
        Ok(backup_path)
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    fn prune(&mut self) {
        self.store.prune(self.settings.retention_days);
    }

    async fn cycle(&mut self, plan: CyclePlan) -> CycleReport {
        let report = |outcome| CycleReport {
            mode: plan.mode,
            timeframe: plan.timeframe,
            outcome,
        };

        let now = (self.now_fn)();
        let popular = if plan.include_popular {
            self.aggregator.popular().await
        } else {
            Vec::new()
        };
        let trending = self.aggregator.trending(now.date_naive()).await;

        if popular.is_empty() && trending.is_empty() {
            log::warn!("⚠️  No candidates fetched; skipping cycle");
            return report(CycleOutcome::NothingFetched);
        }

        let popular = self.classifier.filter(plan.mode, popular);
        let trending = self.classifier.filter(plan.mode, trending);

        let popular = self.store.filter_new(popular);
        let trending = self.store.filter_new(trending);

        let selected_popular = select_top(popular, self.settings.top_k);
        let selected_trending =
            select_top(self.scorer.rank(trending, plan.timeframe), self.settings.top_k);

        if selected_popular.is_empty() && selected_trending.is_empty() {
            log::info!("No new candidates to notify");
            return report(CycleOutcome::NothingNew);
        }

        let payload = build_digest(
            plan.mode,
            plan.timeframe,
            &selected_popular,
            &selected_trending,
            now,
        );

        let delivered = match self.sink.deliver(&payload).await {
            Ok(()) => {
                log::info!(
                    "✅ Notified {} popular + {} trending candidates",
                    selected_popular.len(),
                    selected_trending.len()
                );
                true
            }
            Err(e) => {
                log::warn!("⚠️  Notification delivery failed: {}", e);
                false
            }
        };

        let commit = match plan.commit_policy {
            CommitPolicy::OnSelection => true,
            CommitPolicy::OnDelivery => delivered,
        };

        let mut committed = 0;
        if commit {
            for candidate in selected_popular.iter().chain(selected_trending.iter()) {
                self.store.mark_sent(candidate);
                committed += 1;
            }
        } else {
            log::info!("Delivery unconfirmed; selected candidates stay unsent");
        }

        report(CycleOutcome::Notified {
            popular: selected_popular.len(),
            trending: selected_trending.len(),
            delivered,
            committed,
        })
    }
}

fn select_top(candidates: Vec<Candidate>, k: usize) -> Vec<Candidate> {
    candidates.into_iter().take(k).collect()
}
