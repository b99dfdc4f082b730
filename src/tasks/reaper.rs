//! Reaper Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

/// Spawns a background task that sweeps expired entries out of `store`.
///
/// The first sweep happens one `period` after spawning, then every `period`
/// after that. Each sweep holds the store lock for its whole duration and
/// judges every entry against a single timestamp taken at sweep start.
///
/// The task exits when `true` is sent on `shutdown` or when the sender side is
/// dropped. A period too large to add to the current instant is logged and
/// the task exits immediately; [`TimedCache::new`] rejects such TTLs up front.
///
/// [`TimedCache::new`]: crate::cache::TimedCache::new
///
/// # Arguments
/// * `store` - Shared store to sweep
/// * `period` - Interval between sweeps
/// * `shutdown` - Stop signal observed between sweeps
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::new(ttl)));
/// let (stop_tx, stop_rx) = watch::channel(false);
/// let handle = spawn_reaper(store.clone(), ttl, stop_rx);
/// // Later:
/// stop_tx.send(true).ok();
/// handle.await.ok();
/// ```
pub fn spawn_reaper(
    store: Arc<Mutex<CacheStore>>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(?period, "Starting cache reaper");

        let Some(first_sweep) = Instant::now().checked_add(period) else {
            warn!(?period, "Reaper period exceeds the clock range, not starting");
            return;
        };
        let mut ticker = time::interval_at(first_sweep, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let (removed, remaining) = {
                        let mut guard = store.lock().await;
                        let removed = guard.remove_expired(Instant::now());
                        (removed, guard.len())
                    };

                    if removed > 0 {
                        info!(removed, remaining, "Reaper removed expired entries");
                    } else {
                        debug!(remaining, "Reaper found no expired entries");
                    }
                }
                changed = shutdown.changed() => {
                    // Err means the owning cache was dropped.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Cache reaper stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn shared_store(ttl: Duration) -> Arc<Mutex<CacheStore>> {
        Arc::new(Mutex::new(CacheStore::new(ttl)))
    }

    #[tokio::test]
    async fn test_reaper_removes_expired_entries() {
        let ttl = Duration::from_millis(100);
        let store = shared_store(ttl);
        store
            .lock()
            .await
            .put("expire_soon".to_string(), Bytes::from_static(b"value"));

        let (_stop_tx, stop_rx) = watch::channel(false);
        let handle = spawn_reaper(store.clone(), ttl, stop_rx);

        // Two full periods guarantee one sweep past the TTL.
        time::sleep(Duration::from_millis(250)).await;

        {
            let mut guard = store.lock().await;
            assert!(
                guard.get("expire_soon").is_none(),
                "Expired entry should have been reaped"
            );
            assert!(guard.stats().sweeps >= 1);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_reaper_preserves_fresh_entries() {
        let store = shared_store(Duration::from_secs(3600));
        store
            .lock()
            .await
            .put("long_lived".to_string(), Bytes::from_static(b"value"));

        let (_stop_tx, stop_rx) = watch::channel(false);
        let handle = spawn_reaper(store.clone(), Duration::from_millis(50), stop_rx);

        time::sleep(Duration::from_millis(180)).await;

        {
            let mut guard = store.lock().await;
            assert_eq!(
                guard.get("long_lived"),
                Some(Bytes::from_static(b"value")),
                "Fresh entry should not be removed"
            );
            assert!(guard.stats().sweeps >= 2);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_reaper_exits_cleanly_on_unrepresentable_period() {
        let store = shared_store(Duration::MAX);
        let (_stop_tx, stop_rx) = watch::channel(false);
        let handle = spawn_reaper(store, Duration::MAX, stop_rx);

        // Must return normally rather than panic on instant overflow.
        time::timeout(Duration::from_millis(500), handle)
            .await
            .expect("Reaper should exit immediately")
            .unwrap();
    }

    #[tokio::test]
    async fn test_reaper_stops_on_signal() {
        let store = shared_store(Duration::from_secs(1));
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = spawn_reaper(store, Duration::from_secs(1), stop_rx);

        stop_tx.send(true).unwrap();

        time::timeout(Duration::from_millis(500), handle)
            .await
            .expect("Reaper should exit promptly after the stop signal")
            .unwrap();
    }

    #[tokio::test]
    async fn test_reaper_stops_when_sender_dropped() {
        let store = shared_store(Duration::from_secs(1));
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = spawn_reaper(store, Duration::from_secs(1), stop_rx);

        drop(stop_tx);

        time::timeout(Duration::from_millis(500), handle)
            .await
            .expect("Reaper should exit once its owner is gone")
            .unwrap();
    }
}
