//! Cache Entry Module
//!
//! Defines a single stored payload together with its insertion time.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

// == Cache Entry ==
/// A cached payload stamped with the moment it was inserted.
///
/// Entries carry no expiration of their own; whether an entry is stale is
/// decided by the reaper against the cache-wide TTL.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload. Cloning shares the underlying buffer.
    pub value: Bytes,
    /// Insertion timestamp (monotonic clock)
    pub created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(value: Bytes) -> Self {
        Self::with_created_at(value, Instant::now())
    }

    /// Creates a new entry with an explicit insertion time.
    pub fn with_created_at(value: Bytes, created_at: Instant) -> Self {
        Self { value, created_at }
    }

    // == Age ==
    /// Returns how long the entry has existed as of `now`.
    ///
    /// A `now` earlier than the insertion time yields a zero age.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Expired ==
    /// Checks whether the entry is older than `ttl` as of `now`.
    ///
    /// Boundary condition: an entry whose age is exactly `ttl` is still live.
    /// Only an age strictly greater than `ttl` counts as expired.
    pub fn is_expired_at(&self, now: Instant, ttl: Duration) -> bool {
        self.age_at(now) > ttl
    }
}
