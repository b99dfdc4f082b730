//! Fetch-through cache
//!
//! Looks a URL up in the [`TimedCache`] first and only goes to the network on
//! a miss. Only successful fetches are written back.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Fetch, FetchError, HttpFetcher};
use crate::cache::TimedCache;

/// Where a payload returned by [`CachedFetcher::fetch_bytes`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Served from the cache without touching the network
    Hit,
    /// Fetched from the network and stored in the cache
    Miss,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Source::Hit => "hit",
            Source::Miss => "miss",
        })
    }
}

/// A payload together with its [`Source`]
#[derive(Debug, Clone)]
pub struct Fetched {
    pub body: Bytes,
    pub source: Source,
}

/// Resource client that deduplicates requests through a shared cache.
///
/// The URL is the cache key, so two requests for the same URL within one TTL
/// window reach the network at most once.
#[derive(Debug)]
pub struct CachedFetcher<F = HttpFetcher> {
    cache: Arc<TimedCache>,
    fetcher: F,
}

impl<F: Fetch> CachedFetcher<F> {
    pub fn new(cache: Arc<TimedCache>, fetcher: F) -> Self {
        Self { cache, fetcher }
    }

    pub fn cache(&self) -> &TimedCache {
        &self.cache
    }

    /// Returns the payload for `url`, reporting whether it was a cache hit.
    ///
    /// On a miss the payload is cached only if the fetch succeeded. Errors are
    /// passed through untouched and leave the cache unchanged.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Fetched, FetchError> {
        if let Some(body) = self.cache.get(url).await {
            debug!(url, "Cache hit");
            return Ok(Fetched {
                body,
                source: Source::Hit,
            });
        }

        debug!(url, "Cache miss");
        let body = self.fetcher.fetch(url).await?;
        self.cache.put(url, body.clone()).await;

        Ok(Fetched {
            body,
            source: Source::Miss,
        })
    }

    /// Returns the payload for `url`, from the cache when possible.
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
        Ok(self.fetch_bytes(url).await?.body)
    }

    /// Fetches `url` and decodes the payload as JSON.
    ///
    /// A payload that fails to decode stays cached: the fetch itself
    /// succeeded, and decoding is the caller's concern.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self.get_bytes(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Fetcher that counts calls and answers with a fixed outcome
    struct CountingFetcher {
        calls: AtomicUsize,
        status: Option<u16>,
        body: &'static str,
    }

    impl CountingFetcher {
        fn ok(body: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                status: None,
                body,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                status: Some(status),
                body: "",
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Fetch for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.status {
                Some(status) => Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                }),
                None => Ok(Bytes::from_static(self.body.as_bytes())),
            }
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct NamedResource {
        name: String,
    }

    fn cache() -> Arc<TimedCache> {
        Arc::new(TimedCache::new(Duration::from_secs(60)).unwrap())
    }

    const URL: &str = "https://pokeapi.co/api/v2/location-area/canalave-city-area/";

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let fetcher = CachedFetcher::new(cache(), CountingFetcher::ok(r#"{"name":"canalave"}"#));

        let first = fetcher.fetch_bytes(URL).await.unwrap();
        let second = fetcher.fetch_bytes(URL).await.unwrap();

        assert_eq!(first.source, Source::Miss);
        assert_eq!(second.source, Source::Hit);
        assert_eq!(first.body, second.body);
        assert_eq!(fetcher.fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let fetcher = CachedFetcher::new(cache(), CountingFetcher::failing(404));

        let err = fetcher.get_bytes(URL).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert!(fetcher.cache().get(URL).await.is_none());

        // Every retry goes back to the network.
        assert!(fetcher.get_bytes(URL).await.is_err());
        assert_eq!(fetcher.fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_get_json_decodes_payload() {
        let fetcher = CachedFetcher::new(cache(), CountingFetcher::ok(r#"{"name":"canalave"}"#));

        let resource: NamedResource = fetcher.get_json(URL).await.unwrap();

        assert_eq!(
            resource,
            NamedResource {
                name: "canalave".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_undecodable_payload_stays_cached() {
        let fetcher = CachedFetcher::new(cache(), CountingFetcher::ok("not json"));

        let err = fetcher.get_json::<NamedResource>(URL).await.unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
        assert_eq!(
            fetcher.cache().get(URL).await,
            Some(Bytes::from_static(b"not json"))
        );
    }

    #[tokio::test]
    async fn test_distinct_urls_are_cached_separately() {
        let fetcher = CachedFetcher::new(cache(), CountingFetcher::ok("{}"));

        fetcher.get_bytes(URL).await.unwrap();
        fetcher
            .get_bytes("https://pokeapi.co/api/v2/location-area")
            .await
            .unwrap();

        assert_eq!(fetcher.fetcher.calls(), 2);
        assert_eq!(fetcher.cache().len().await, 2);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(Source::Hit.to_string(), "hit");
        assert_eq!(Source::Miss.to_string(), "miss");
    }
}
