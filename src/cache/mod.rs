//! Cache Module
//!
//! Provides an in-memory TTL cache with lazy, on-read expiration.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::TtlCache;
