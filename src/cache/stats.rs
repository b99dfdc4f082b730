//! Cache Statistics Module
//!
//! Tracks lookup outcomes and reaper activity.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Stats ==
/// Point-in-time counters for a cache instance.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups that found an entry
    pub hits: u64,
    /// Lookups for absent keys
    pub misses: u64,
    /// Entries removed by the reaper since construction
    pub reaped: u64,
    /// Completed reaper sweeps
    pub sweeps: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Wall-clock time of the most recent sweep
    pub last_sweep_at: Option<DateTime<Utc>>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Sweep ==
    /// Records one completed sweep and the number of entries it removed.
    pub fn record_sweep(&mut self, removed: usize, at: DateTime<Utc>) {
        self.sweeps += 1;
        self.reaped += removed as u64;
        self.last_sweep_at = Some(at);
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
