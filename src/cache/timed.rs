//! Timed Cache Module
//!
//! The shared cache handle: a mutex-guarded [`CacheStore`] plus the reaper
//! task that sweeps it.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::runtime::Handle;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_reaper;

// == Timed Cache ==
/// Concurrent key/value cache whose entries are removed once older than a
/// fixed TTL.
///
/// Reads never check age. Staleness is bounded by the reaper, which sweeps
/// once per TTL, so an entry is never removed before the TTL has elapsed and
/// may outlive it by at most one period.
///
/// The cache does not bound its size. Distinct keys accumulate until the next
/// sweep removes them.
///
/// Construct one per program and share it by reference or `Arc`. Dropping the
/// cache stops its reaper; [`TimedCache::shutdown`] additionally waits for it.
#[derive(Debug)]
pub struct TimedCache {
    store: Arc<Mutex<CacheStore>>,
    ttl: Duration,
    shutdown_tx: watch::Sender<bool>,
    reaper: Mutex<Option<JoinHandle<()>>>,
}

impl TimedCache {
    // == Constructor ==
    /// Creates an empty cache and starts its reaper.
    ///
    /// # Arguments
    /// * `ttl` - Entry lifetime, also used as the sweep period
    ///
    /// # Errors
    /// - `CacheError::InvalidTtl` if `ttl` is zero, or so large that no sweep
    ///   deadline can be scheduled for it
    /// - `CacheError::NoRuntime` if called outside a tokio runtime
    pub fn new(ttl: Duration) -> Result<Self> {
        if ttl.is_zero() || Instant::now().checked_add(ttl).is_none() {
            return Err(CacheError::InvalidTtl(ttl));
        }
        if Handle::try_current().is_err() {
            return Err(CacheError::NoRuntime);
        }

        let store = Arc::new(Mutex::new(CacheStore::new(ttl)));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let reaper = spawn_reaper(store.clone(), ttl, shutdown_rx);

        info!(?ttl, "Timed cache created");

        Ok(Self {
            store,
            ttl,
            shutdown_tx,
            reaper: Mutex::new(Some(reaper)),
        })
    }

    // == Put ==
    /// Inserts or overwrites the payload for `key`, resetting its age.
    pub async fn put(&self, key: impl Into<String>, value: impl Into<Bytes>) {
        let key = key.into();
        let value = value.into();
        debug!(key = %key, size = value.len(), "Cache put");

        self.store.lock().await.put(key, value);
    }

    // == Get ==
    /// Returns the payload for `key` if it has not been reaped yet.
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.store.lock().await.get(key)
    }

    // == TTL ==
    /// Returns the entry lifetime configured at construction.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Length ==
    /// Returns the number of entries not yet reaped.
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    // == Shutdown ==
    /// Stops the reaper and waits for it to exit.
    ///
    /// Calling this more than once is harmless. Entries stay readable and
    /// writable afterwards but are no longer expired.
    pub async fn shutdown(&self) {
        // Fails only if the reaper already exited and dropped its receiver.
        let _ = self.shutdown_tx.send(true);

        let handle = self.reaper.lock().await.take();
        if let Some(handle) = handle {
            match handle.await {
                Ok(()) => info!("Timed cache shut down"),
                Err(e) => warn!(error = %e, "Reaper task ended abnormally"),
            }
        }
    }
}
