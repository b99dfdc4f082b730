//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Lookups and inserts are
//! infallible, so every variant here is a construction-time failure.

use std::time::Duration;

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised while constructing a [`TimedCache`](crate::cache::TimedCache).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    /// TTL must be positive and small enough to schedule a sweep for
    #[error("Invalid TTL {0:?}: must be greater than zero and within the clock range")]
    InvalidTtl(Duration),

    /// The reaper task needs a tokio runtime to be spawned on
    #[error("No tokio runtime available to run the reaper")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for cache construction.
pub type Result<T> = std::result::Result<T, CacheError>;
