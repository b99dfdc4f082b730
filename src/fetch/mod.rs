//! Fetch Module
//!
//! Network access for the client, routed through the [`TimedCache`] so that
//! repeated requests for the same resource are served from memory.
//!
//! [`TimedCache`]: crate::cache::TimedCache

mod cached;
mod client;

pub use cached::{CachedFetcher, Fetched, Source};
pub use client::{Fetch, FetchError, HttpFetcher};

/// Base URL of the public Pokémon REST API
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Joins an API base URL and a resource path into a full URL.
///
/// The result doubles as the cache key, so the same resource always maps to
/// the same string regardless of stray slashes at the seam.
pub fn resource_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
