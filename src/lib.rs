//! Cache Batch - TTL caching and batch coalescing for async clients
//!
//! Two independent primitives for cutting redundant work: a keyed cache whose
//! entries expire lazily on read, and a coalescer that runs operations
//! submitted under the same window together while settling each caller's
//! future individually. `ReadThrough` shows one way of composing them.

pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
mod tasks;

pub use batch::{BatchCoalescer, BatchHandle, BatchStats};
pub use cache::{CacheStats, TtlCache};
pub use config::Config;
pub use error::BatchError;
pub use loader::ReadThrough;
