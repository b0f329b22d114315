//! Persisted ledger of already-surfaced candidates
//!
//! ## Lifecycle
//!
//! 1. `open()` loads the snapshot once. Missing snapshot → empty store.
//!    Unreadable or corrupt snapshot → empty store (logged, never fatal).
//! 2. `mark_sent()` / `prune()` / `reset()` mutate the map and immediately
//!    rewrite the whole snapshot.
//! 3. A failed write is logged; the in-memory state stays authoritative for
//!    the rest of the process.
//!
//! ## Snapshot format
//!
//! ```json
//! { "123": { "name": "..", "full_name": "..", "sent_date": "2024-06-01T12:00:00+00:00",
//!            "stars": 1000, "url": "https://github.com/.." } }
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::discovery::Candidate;
use crate::error::StoreError;
use crate::persistence::SnapshotBackend;
use crate::timestamps::{now_iso, parse_timestamp};

/// Default retention horizon for sent records
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// One surfaced candidate, keyed by repository id in the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentRecord {
    pub name: String,
    pub full_name: String,
    pub sent_date: String,
    pub stars: u64,
    pub url: String,
}

impl SentRecord {
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.sent_date)
    }
}

/// Summary of the store contents
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStats {
    pub total: usize,
    pub most_recent_sent_at: Option<DateTime<Utc>>,
    pub most_recent_name: Option<String>,
    pub storage: String,
}

pub struct SentStore {
    records: BTreeMap<String, SentRecord>,
    backend: Box<dyn SnapshotBackend>,
    now_fn: Box<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl SentStore {
    /// Load the store from `backend` using the system clock
    pub fn open(backend: Box<dyn SnapshotBackend>) -> Self {
        Self::open_with_clock(backend, Box::new(Utc::now))
    }

    /// Load the store with a custom clock (for deterministic tests)
    pub fn open_with_clock(
        backend: Box<dyn SnapshotBackend>,
        now_fn: Box<dyn Fn() -> DateTime<Utc> + Send + Sync>,
    ) -> Self {
        let records = load_records(backend.as_ref());
        log::info!(
            "📂 Loaded {} sent records from {}",
            records.len(),
            backend.location()
        );

        Self {
            records,
            backend,
            now_fn,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, repo_id: u64) -> Option<&SentRecord> {
        self.records.get(&repo_id.to_string())
    }

    pub fn is_sent(&self, repo_id: u64) -> bool {
        self.records.contains_key(&repo_id.to_string())
    }

    /// Upsert a record for `candidate` stamped with the current time, then persist
    pub fn mark_sent(&mut self, candidate: &Candidate) {
        let record = SentRecord {
            name: candidate.name.clone(),
            full_name: candidate.full_name.clone(),
            sent_date: now_iso((self.now_fn)()),
            stars: candidate.stars,
            url: candidate.url.clone(),
        };

        self.records.insert(candidate.id.to_string(), record);
        self.persist();
    }

    /// Candidates not yet sent, in input order
    pub fn filter_new(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let total = candidates.len();
        let fresh: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| !self.is_sent(c.id))
            .collect();

        log::info!("Filtered {} unsent candidates from {}", fresh.len(), total);
        fresh
    }

    /// Drop records older than `retention_days`, and any whose `sent_date`
    /// cannot be parsed. Persists only when something was removed.
    pub fn prune(&mut self, retention_days: i64) -> usize {
        if retention_days < 0 {
            log::warn!("⚠️  Negative retention of {} days; nothing pruned", retention_days);
            return 0;
        }

        let Some(cutoff) = Duration::try_days(retention_days)
            .and_then(|window| (self.now_fn)().checked_sub_signed(window))
        else {
            log::warn!(
                "⚠️  Retention of {} days is out of range; nothing pruned",
                retention_days
            );
            return 0;
        };
        let before = self.records.len();

        self.records.retain(|_, record| match record.sent_at() {
            Some(sent_at) => sent_at >= cutoff,
            None => false,
        });

        let removed = before - self.records.len();
        if removed > 0 {
            self.persist();
            log::info!("🧹 Pruned {} sent records older than {} days", removed, retention_days);
        }
        removed
    }

    /// Copy the current snapshot aside before a destructive operation
    pub fn backup(&self) -> Result<Option<String>, StoreError> {
        let stamp = (self.now_fn)().format("%Y%m%d_%H%M%S").to_string();
        let target = self.backend.backup(&stamp)?;
        if let Some(path) = &target {
            log::info!("📋 Backed up {} sent records to {}", self.records.len(), path);
        }
        Ok(target)
    }

    /// Clear every record and persist the empty snapshot
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        self.write_snapshot()?;
        log::info!("🔄 Reset sent records");
        Ok(())
    }

    pub fn stats(&self) -> StoreStats {
        let latest = self
            .records
            .values()
            .filter_map(|r| r.sent_at().map(|at| (at, r)))
            .max_by_key(|(at, _)| *at);

        StoreStats {
            total: self.records.len(),
            most_recent_sent_at: latest.map(|(at, _)| at),
            most_recent_name: latest.map(|(_, r)| r.name.clone()),
            storage: self.backend.location(),
        }
    }

    /// Up to `n` records, most recently sent first
    pub fn recent(&self, n: usize) -> Vec<(&str, &SentRecord)> {
        let mut entries: Vec<(&str, &SentRecord)> = self
            .records
            .iter()
            .map(|(id, record)| (id.as_str(), record))
            .collect();

        entries.sort_by(|a, b| b.1.sent_at().cmp(&a.1.sent_at()));
        entries.truncate(n);
        entries
    }

    fn write_snapshot(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.records)?;
        self.backend.save(&json)
    }

    fn persist(&mut self) {
        if let Err(e) = self.write_snapshot() {
            log::error!(
                "❌ Failed to save sent records to {}: {}",
                self.backend.location(),
                e
            );
        }
    }
}

fn load_records(backend: &dyn SnapshotBackend) -> BTreeMap<String, SentRecord> {
    let json = match backend.load() {
        Ok(Some(json)) => json,
        Ok(None) => return BTreeMap::new(),
        Err(e) => {
            log::error!("❌ Failed to read sent records from {}: {}", backend.location(), e);
            return BTreeMap::new();
        }
    };

    let entries: BTreeMap<String, Value> = match serde_json::from_str(&json) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("❌ Corrupt sent records in {}: {}", backend.location(), e);
            return BTreeMap::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|(id, entry)| match decode_record(entry) {
            Ok(record) => Some((id, record)),
            Err(e) => {
                log::warn!("⚠️  Skipping unreadable sent record {}: {}", id, e);
                None
            }
        })
        .collect()
}

/// Decode one snapshot entry
///
/// A `sent_date` that is not a string becomes empty, so the next prune
/// drops that record instead of the whole snapshot failing to load.
fn decode_record(mut entry: Value) -> Result<SentRecord, serde_json::Error> {
    if let Some(fields) = entry.as_object_mut() {
        if fields.get("sent_date").is_some_and(|date| !date.is_string()) {
            fields.insert("sent_date".to_string(), Value::String(String::new()));
        }
    }
    serde_json::from_value(entry)
}
