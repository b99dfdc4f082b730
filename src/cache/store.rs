//! Cache Store Module
//!
//! Unsynchronized entry map with age-based sweeping. [`TimedCache`] wraps it in
//! a mutex and drives the sweeps from a background task.
//!
//! [`TimedCache`]: crate::cache::TimedCache

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Key-value storage where every entry shares one TTL.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Age past which an entry is removed by the next sweep
    ttl: Duration,
    /// Lookup and sweep statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            stats: CacheStats::new(),
        }
    }

    // == Put ==
    /// Stores a payload under `key`, stamped with the current time.
    ///
    /// An existing entry for the key is replaced and its age reset. Other keys
    /// are never touched.
    pub fn put(&mut self, key: String, value: Bytes) {
        self.put_at(key, value, Instant::now());
    }

    /// Stores a payload with an explicit insertion time.
    pub fn put_at(&mut self, key: String, value: Bytes, created_at: Instant) {
        self.entries.insert(key, CacheEntry::with_created_at(value, created_at));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the payload stored under `key`, if any.
    ///
    /// No age check happens here: an entry past its TTL is still returned
    /// until a sweep removes it.
    pub fn get(&mut self, key: &str) -> Option<Bytes> {
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove Expired ==
    /// Removes every entry older than the TTL as of `now`.
    ///
    /// `now` is sampled once by the caller so the whole sweep applies the same
    /// cutoff. Returns the number of entries removed.
    pub fn remove_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired_at(now, ttl));

        let removed = before - self.entries.len();
        self.stats.record_sweep(removed, Utc::now());
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == TTL ==
    /// Returns the age past which entries are swept.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
