//! HTTP fetcher
//!
//! The network side of the fetch-through cache: a small trait so callers can
//! swap the transport, and a reqwest-backed implementation.

use std::future::Future;

use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while fetching or decoding a resource
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of raw resource payloads.
///
/// An implementation returns `Ok` only for a payload that is safe to cache.
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Bytes, FetchError>> + Send;
}

/// Client for fetching raw payloads over HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new HttpFetcher with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new HttpFetcher with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    /// Fetch the body at `url`.
    ///
    /// # Returns
    /// * `Ok(Bytes)` - The full body of a 2xx response
    /// * `Err(FetchError)` - On transport failure or any other status
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Request returned non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!(url, size = body.len(), "Fetched resource");
        Ok(body)
    }
}
