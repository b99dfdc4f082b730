//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the life of a cache.
//!
//! # Tasks
//! - Reaper: Removes entries older than the cache TTL once per period

mod reaper;

pub use reaper::spawn_reaper;
