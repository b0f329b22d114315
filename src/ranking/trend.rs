//! Trend scoring for growth-rate ranking
//!
//! Score = 0.7 × stars/day + 0.3 × forks/day over an effective window.
//!
//! - **lifetime**: window = age in days, actual counts
//! - **30days / 7days**: candidates younger than the window use their age and
//!   actual counts; older ones use the window length and a fixed share of
//!   their counts (30% / 15%), floored, as a proxy for recent growth.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use super::timeframe::Timeframe;
use crate::discovery::Candidate;
use crate::error::ScoreError;
use crate::timestamps::parse_timestamp;

const STAR_WEIGHT: f64 = 0.7;
const FORK_WEIGHT: f64 = 0.3;

/// Derived score attached to a candidate during one ranking pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendScore {
    pub timeframe: Timeframe,
    pub value: f64,
}

/// Weighted per-day growth over `days`
pub fn weighted_rate(stars: u64, forks: u64, days: i64) -> f64 {
    let days = days.max(1) as f64;
    STAR_WEIGHT * (stars as f64 / days) + FORK_WEIGHT * (forks as f64 / days)
}

pub struct TrendScorer {
    now_fn: Box<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl Default for TrendScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendScorer {
    pub fn new() -> Self {
        Self::with_clock(Box::new(Utc::now))
    }

    /// Create a scorer with a custom clock (for deterministic tests)
    pub fn with_clock(now_fn: Box<dyn Fn() -> DateTime<Utc> + Send + Sync>) -> Self {
        Self { now_fn }
    }

    /// Whole days since `created_at`, at least 1
    pub fn age_days(&self, created_at: &str) -> Result<i64, ScoreError> {
        if created_at.trim().is_empty() {
            return Err(ScoreError::MissingTimestamp);
        }

        let created = parse_timestamp(created_at)
            .ok_or_else(|| ScoreError::InvalidTimestamp(created_at.to_string()))?;

        let days = ((self.now_fn)() - created).num_days();
        Ok(days.max(1))
    }

    pub fn score(&self, candidate: &Candidate, timeframe: Timeframe) -> Result<f64, ScoreError> {
        let age_days = self.age_days(&candidate.created_at)?;

        let (effective_days, stars, forks) = match timeframe.window_policy() {
            Some(policy) if age_days > policy.window_days => (
                policy.window_days,
                (candidate.stars as f64 * policy.recent_share).floor() as u64,
                (candidate.forks as f64 * policy.recent_share).floor() as u64,
            ),
            _ => (age_days, candidate.stars, candidate.forks),
        };

        Ok(weighted_rate(stars, forks, effective_days))
    }

    /// Score, falling back to 0.0 (logged) on a per-candidate failure
    pub fn score_or_zero(&self, candidate: &Candidate, timeframe: Timeframe) -> f64 {
        match self.score(candidate, timeframe) {
            Ok(value) => value,
            Err(e) => {
                log::error!(
                    "⚠️  Failed to compute {} trend score for {}: {}",
                    timeframe,
                    candidate.full_name,
                    e
                );
                0.0
            }
        }
    }

    /// Attach scores and sort descending
    ///
    /// The sort is stable, so equal scores keep their input order.
    pub fn rank(&self, mut candidates: Vec<Candidate>, timeframe: Timeframe) -> Vec<Candidate> {
        for candidate in candidates.iter_mut() {
            let value = self.score_or_zero(candidate, timeframe);
            candidate.trend_score = Some(TrendScore { timeframe, value });
        }

        candidates.sort_by(|a, b| {
            let a = a.trend_score.map_or(0.0, |s| s.value);
            let b = b.trend_score.map_or(0.0, |s| s.value);
            b.partial_cmp(&a).unwrap_or(Ordering::Equal)
        });

        log::info!(
            "Ranked {} candidates by {} trend score",
            candidates.len(),
            timeframe
        );
        candidates
    }
}
