//! Integration tests for the tracker cycle
//!
//! Drives `TrackerEngine` end to end with in-memory fakes for the search
//! API, the notification sink and the snapshot backend.
//!
//! Key integration points tested:
//! - No-op cycles (nothing fetched / nothing new) leave the store untouched
//! - Commit semantics under both commit policies
//! - Dedup across consecutive cycles in one process
//! - Multi-timeframe run visibility between its two cycles
//! - Commercial variant selection
//! - File-backed store round trip, reset and backup

#[cfg(test)]
mod tracker_integration_tests {
    use ai_repo_tracker::discovery::{
        Candidate, CandidateAggregator, QuerySpec, RawRepository, SearchPage, SearchSource,
        SortKey,
    };
    use ai_repo_tracker::error::{FetchError, NotifyError};
    use ai_repo_tracker::notify::{NotificationSink, WebhookPayload};
    use ai_repo_tracker::persistence::{JsonFileBackend, MemoryBackend, SnapshotBackend};
    use ai_repo_tracker::pipeline::{
        CommitPolicy, CycleOutcome, EngineSettings, SentStore, TrackerEngine,
    };
    use ai_repo_tracker::ranking::{ClassificationMode, Timeframe};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::tempdir;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn repo(id: u64, name: &str, description: &str, stars: u64, forks: u64) -> Candidate {
        Candidate::from(RawRepository {
            id,
            name: Some(name.to_string()),
            full_name: Some(format!("owner/{}", name)),
            description: Some(description.to_string()),
            topics: Some(vec!["python".to_string()]),
            language: Some("Python".to_string()),
            stargazers_count: Some(stars),
            forks_count: Some(forks),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            updated_at: Some("2024-05-31T00:00:00Z".to_string()),
            html_url: Some(format!("https://github.com/owner/{}", name)),
        })
    }

    fn topical(id: u64, stars: u64) -> Candidate {
        repo(id, &format!("dl-{}", id), "deep learning research code", stars, 0)
    }

    fn off_topic(id: u64) -> Candidate {
        repo(id, "webserver", "HTTP server written in Rust", 10_000, 0)
    }

    /// Returns the popular list for star-sorted queries and the trending
    /// list for update-sorted ones; records every query it sees
    #[derive(Clone, Default)]
    struct FakeSearch {
        popular: Vec<Candidate>,
        trending: Vec<Candidate>,
        fail_matching: Option<String>,
        seen: Arc<Mutex<Vec<QuerySpec>>>,
    }

    impl FakeSearch {
        fn new(popular: Vec<Candidate>, trending: Vec<Candidate>) -> Self {
            Self {
                popular,
                trending,
                ..Self::default()
            }
        }

        fn sorts_seen(&self) -> Vec<SortKey> {
            self.seen.lock().unwrap().iter().map(|q| q.sort).collect()
        }
    }

    #[async_trait]
    impl SearchSource for FakeSearch {
        async fn search(&self, query: &QuerySpec) -> Result<SearchPage, FetchError> {
            self.seen.lock().unwrap().push(query.clone());

            if let Some(pattern) = &self.fail_matching {
                if query.query.contains(pattern.as_str()) {
                    return Err(FetchError::Status {
                        status: 403,
                        body: "rate limited".to_string(),
                    });
                }
            }

            let items = match query.sort {
                SortKey::Stars => self.popular.clone(),
                SortKey::Updated => self.trending.clone(),
            };
            Ok(SearchPage {
                total_count: items.len() as u64,
                items,
            })
        }
    }

    #[derive(Clone, Default)]
    struct FakeSink {
        payloads: Arc<Mutex<Vec<WebhookPayload>>>,
        fail: bool,
    }

    impl FakeSink {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn delivered(&self) -> Vec<WebhookPayload> {
            self.payloads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSink for FakeSink {
        async fn deliver(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
            self.payloads.lock().unwrap().push(payload.clone());
            if self.fail {
                Err(NotifyError::Status(502))
            } else {
                Ok(())
            }
        }
    }

    fn build_engine(
        search: FakeSearch,
        sink: FakeSink,
        backend: Box<dyn SnapshotBackend>,
        commit_policy: CommitPolicy,
    ) -> TrackerEngine {
        let aggregator = CandidateAggregator::new(Box::new(search), Duration::ZERO, 25);
        let store = SentStore::open_with_clock(backend, Box::new(fixed_now));
        let settings = EngineSettings {
            commit_policy,
            ..EngineSettings::default()
        };
        TrackerEngine::new(aggregator, store, Box::new(sink), settings).with_clock(fixed_now)
    }

    #[tokio::test]
    async fn test_empty_fetch_is_clean_noop() {
        // Test: Both fetches empty → no notification, no store writes
        let sink = FakeSink::default();
        let backend = MemoryBackend::new();
        let mut engine = build_engine(
            FakeSearch::new(vec![], vec![]),
            sink.clone(),
            Box::new(backend.clone()),
            CommitPolicy::OnSelection,
        );

        let report = engine.run(Timeframe::Lifetime).await;

        assert_eq!(report.outcome, CycleOutcome::NothingFetched);
        assert!(sink.delivered().is_empty());
        assert_eq!(backend.save_count(), 0);
        assert!(engine.store().is_empty());
    }

    #[tokio::test]
    async fn test_nothing_relevant_skips_notification() {
        // Test: Fetched candidates that all fail classification
        let sink = FakeSink::default();
        let backend = MemoryBackend::new();
        let mut engine = build_engine(
            FakeSearch::new(vec![off_topic(1)], vec![off_topic(2)]),
            sink.clone(),
            Box::new(backend.clone()),
            CommitPolicy::OnSelection,
        );

        let report = engine.run(Timeframe::Days30).await;

        assert_eq!(report.outcome, CycleOutcome::NothingNew);
        assert!(sink.delivered().is_empty());
        assert_eq!(backend.save_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_delivery_still_commits_on_selection() {
        // Test: Default policy marks selected candidates even if the webhook fails
        let sink = FakeSink::failing();
        let mut engine = build_engine(
            FakeSearch::new(vec![topical(1, 500), topical(2, 400)], vec![topical(3, 300)]),
            sink.clone(),
            Box::new(MemoryBackend::new()),
            CommitPolicy::OnSelection,
        );

        let report = engine.run(Timeframe::Lifetime).await;

        assert_eq!(
            report.outcome,
            CycleOutcome::Notified {
                popular: 2,
                trending: 1,
                delivered: false,
                committed: 3,
            }
        );
        assert_eq!(sink.delivered().len(), 1);
        for id in [1, 2, 3] {
            assert!(engine.store().is_sent(id), "id {} should be marked", id);
        }
    }

    #[tokio::test]
    async fn test_failed_delivery_commits_nothing_on_delivery_policy() {
        // Test: OnDelivery keeps candidates eligible after a failed webhook
        let sink = FakeSink::failing();
        let mut engine = build_engine(
            FakeSearch::new(vec![topical(1, 500)], vec![]),
            sink.clone(),
            Box::new(MemoryBackend::new()),
            CommitPolicy::OnDelivery,
        );

        let first = engine.run(Timeframe::Lifetime).await;
        assert_eq!(first.committed(), 0);
        assert!(!engine.store().is_sent(1));

        // Same candidate is selected again next cycle
        let second = engine.run(Timeframe::Lifetime).await;
        assert!(matches!(second.outcome, CycleOutcome::Notified { popular: 1, .. }));
        assert_eq!(sink.delivered().len(), 2);
    }

    #[tokio::test]
    async fn test_consecutive_cycles_do_not_repeat() {
        // Test: Marks from one cycle filter the next
        let sink = FakeSink::default();
        let popular = vec![topical(1, 900), topical(2, 800), topical(3, 700)];
        let mut engine = build_engine(
            FakeSearch::new(popular, vec![]),
            sink.clone(),
            Box::new(MemoryBackend::new()),
            CommitPolicy::OnSelection,
        );

        engine.run(Timeframe::Lifetime).await;
        let second = engine.run(Timeframe::Lifetime).await;
        let third = engine.run(Timeframe::Lifetime).await;

        assert!(matches!(second.outcome, CycleOutcome::Notified { popular: 1, committed: 1, .. }));
        assert_eq!(third.outcome, CycleOutcome::NothingNew);
        assert_eq!(engine.stats().total, 3);

        let payloads = sink.delivered();
        assert!(payloads[1].embeds[0].fields[0].value.contains("**dl-3**"));
    }

    #[tokio::test]
    async fn test_multi_timeframe_sees_earlier_marks() {
        // Test: 30-day cycle marks are visible to the 7-day cycle; popular is never fetched
        let search = FakeSearch::new(
            vec![topical(100, 50_000)],
            vec![topical(1, 3_000), topical(2, 2_000), topical(3, 1_000)],
        );
        let sink = FakeSink::default();
        let mut engine = build_engine(
            search.clone(),
            sink.clone(),
            Box::new(MemoryBackend::new()),
            CommitPolicy::OnSelection,
        );

        let reports = engine.run_multi().await;

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].timeframe, Timeframe::Days30);
        assert!(matches!(
            reports[0].outcome,
            CycleOutcome::Notified { popular: 0, trending: 2, .. }
        ));
        assert_eq!(reports[1].timeframe, Timeframe::Days7);
        assert!(matches!(
            reports[1].outcome,
            CycleOutcome::Notified { popular: 0, trending: 1, .. }
        ));

        assert!(search.sorts_seen().iter().all(|s| *s == SortKey::Updated));
        assert!(!engine.store().is_sent(100));

        let payloads = sink.delivered();
        assert!(payloads[0].embeds[0].fields[0].value.starts_with("1. **dl-1**"));
        assert!(payloads[1].embeds[0].fields[0].value.starts_with("1. **dl-3**"));
    }

    #[tokio::test]
    async fn test_multi_timeframe_commits_only_on_delivery() {
        // Test: run_multi ignores the configured policy and requires delivery
        let sink = FakeSink::failing();
        let mut engine = build_engine(
            FakeSearch::new(vec![], vec![topical(1, 3_000), topical(2, 2_000)]),
            sink.clone(),
            Box::new(MemoryBackend::new()),
            CommitPolicy::OnSelection,
        );

        let reports = engine.run_multi().await;

        assert!(reports.iter().all(|r| r.committed() == 0));
        assert!(engine.store().is_empty());
        // Both cycles offered the same two candidates
        assert_eq!(sink.delivered().len(), 2);
    }

    #[tokio::test]
    async fn test_multi_timeframe_skips_empty_fetch() {
        let sink = FakeSink::default();
        let mut engine = build_engine(
            FakeSearch::new(vec![topical(1, 3_000)], vec![]),
            sink.clone(),
            Box::new(MemoryBackend::new()),
            CommitPolicy::OnSelection,
        );

        let reports = engine.run_multi().await;

        assert!(reports.iter().all(|r| r.outcome == CycleOutcome::NothingFetched));
        assert!(sink.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_commercial_cycle_selects_commercial_candidates() {
        // Test: Commercial variant keeps topical + commercial only
        let commercial = repo(1, "flowbot", "deep learning workflow automation platform", 200, 0);
        let research = topical(2, 90_000);
        let sink = FakeSink::default();
        let mut engine = build_engine(
            FakeSearch::new(vec![research, commercial, off_topic(3)], vec![]),
            sink.clone(),
            Box::new(MemoryBackend::new()),
            CommitPolicy::OnSelection,
        );

        let report = engine.run_commercial(Timeframe::Lifetime).await;

        assert_eq!(report.mode, ClassificationMode::Commercial);
        assert!(matches!(report.outcome, CycleOutcome::Notified { popular: 1, .. }));
        assert!(engine.store().is_sent(1));
        assert!(!engine.store().is_sent(2));

        let embed = &sink.delivered()[0].embeds[0];
        assert_eq!(embed.color, 3_447_003);
        assert!(embed.fields[0].value.contains("**flowbot**"));
    }

    #[tokio::test]
    async fn test_failed_query_does_not_abort_cycle() {
        // Test: One failing popular query; the rest still produce candidates
        let mut search = FakeSearch::new(vec![topical(1, 500)], vec![]);
        search.fail_matching = Some("tensorflow".to_string());
        let sink = FakeSink::default();
        let mut engine = build_engine(
            search.clone(),
            sink.clone(),
            Box::new(MemoryBackend::new()),
            CommitPolicy::OnSelection,
        );

        let report = engine.run(Timeframe::Lifetime).await;

        assert!(report.delivered());
        assert!(engine.store().is_sent(1));
        assert_eq!(search.seen.lock().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_store_write_failure_keeps_memory_state() {
        let backend = MemoryBackend::new();
        backend.set_fail_writes(true);
        let mut engine = build_engine(
            FakeSearch::new(vec![topical(1, 500)], vec![]),
            FakeSink::default(),
            Box::new(backend.clone()),
            CommitPolicy::OnSelection,
        );

        let report = engine.run(Timeframe::Lifetime).await;

        assert_eq!(report.committed(), 1);
        assert!(engine.store().is_sent(1));
        assert_eq!(backend.contents(), None);
    }

    #[tokio::test]
    async fn test_file_store_round_trip_and_reset_with_backup() {
        // Test: Marks survive a reopen; reset backs the snapshot up first
        let dir = tempdir().unwrap();
        let path = dir.path().join("sent_projects.json");

        let mut engine = build_engine(
            FakeSearch::new(vec![topical(1, 500), topical(2, 400)], vec![]),
            FakeSink::default(),
            Box::new(JsonFileBackend::new(&path)),
            CommitPolicy::OnSelection,
        );
        engine.run(Timeframe::Lifetime).await;

        let reopened =
            SentStore::open_with_clock(Box::new(JsonFileBackend::new(&path)), Box::new(fixed_now));
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(1).unwrap().full_name, "owner/dl-1");

        let backup = engine.reset(true).unwrap().expect("snapshot existed");
        assert!(backup.ends_with("sent_projects_backup_20240601_120000.json"));
        assert!(std::path::Path::new(&backup).exists());

        let cleared = SentStore::open(Box::new(JsonFileBackend::new(&path)));
        assert!(cleared.is_empty());
    }
}
