//! Bounded record of recently analyzed news, feeding market sentiment

use chrono::Duration;
use herald_core::{AnalysisResult, CoinSymbol, Timestamp};
use std::collections::VecDeque;

/// Default look-back kept in the journal
pub const DEFAULT_RETENTION_HOURS: i64 = 24;

#[derive(Debug, Clone)]
struct JournalEntry {
    recorded_at: Timestamp,
    result: AnalysisResult,
}

/// Insertion-ordered ring of successful analyses
///
/// Oldest entries go first when capacity is reached; entries older than
/// the retention window are pruned on every insert.
#[derive(Debug, Clone)]
pub struct AnalysisJournal {
    entries: VecDeque<JournalEntry>,
    capacity: usize,
    retention: Duration,
}

impl AnalysisJournal {
    pub fn new(capacity: usize) -> Self {
        Self::with_retention(capacity, Duration::hours(DEFAULT_RETENTION_HOURS))
    }

    pub fn with_retention(capacity: usize, retention: Duration) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            retention,
        }
    }

    /// Record a result; error records are ignored
    ///
    /// Returns whether the result was stored.
    pub fn record(&mut self, recorded_at: Timestamp, result: &AnalysisResult) -> bool {
        if result.is_error() || self.capacity == 0 {
            return false;
        }

        let horizon = recorded_at - self.retention;
        while self
            .entries
            .front()
            .is_some_and(|e| e.recorded_at < horizon)
        {
            self.entries.pop_front();
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }

        self.entries.push_back(JournalEntry {
            recorded_at,
            result: result.clone(),
        });
        true
    }

    /// Results recorded at or after `since`, optionally restricted to
    /// those mentioning any of `coins`
    pub fn window(&self, since: Timestamp, coins: &[CoinSymbol]) -> Vec<AnalysisResult> {
        self.entries
            .iter()
            .filter(|e| e.recorded_at >= since)
            .filter(|e| coins.is_empty() || e.result.mentions_any(coins))
            .map(|e| e.result.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
