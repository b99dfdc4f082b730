//! Configuration Module
//!
//! Loads client configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::fetch::DEFAULT_BASE_URL;

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache entry lifetime (and reaper period) in milliseconds
    pub cache_ttl_ms: u64,
    /// Base URL of the REST API
    pub api_base_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Cache TTL in milliseconds (default: 5000)
    /// - `API_BASE_URL` - REST API base URL (default: https://pokeapi.co/api/v2)
    ///
    /// Unparseable values fall back to the default. A TTL of zero is kept as-is
    /// and rejected when the cache is built.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl_ms: env::var("CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_ms),
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base_url),
        }
    }

    /// Cache TTL as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_ms: 5000,
            api_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
