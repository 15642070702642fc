//! Batch Module
//!
//! Coalesces keyed asynchronous operations into time-windowed waves.

mod coalescer;
mod handle;
mod stats;

pub use coalescer::BatchCoalescer;
pub use handle::BatchHandle;
pub use stats::BatchStats;

pub(crate) use coalescer::{BatchState, OperationQueue, Settlement};
