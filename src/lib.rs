//! pokecache - A time-expiring response cache for a REST API client
//!
//! Provides a concurrent in-memory cache with background expiry, and a
//! fetch-through HTTP client that consults it before going to the network.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod tasks;

pub use cache::TimedCache;
pub use config::Config;
pub use fetch::{CachedFetcher, HttpFetcher};
