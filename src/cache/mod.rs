//! Cache Module
//!
//! Provides a concurrent in-memory cache whose entries expire after a fixed TTL.

mod entry;
mod stats;
mod store;
mod timed;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use timed::TimedCache;
