//! Batch Statistics Module
//!
//! Tracks flushed waves and how their operations settled.

use serde::Serialize;

// == Batch Stats ==
/// Counters for a coalescer's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Number of operations accepted by `add`
    pub operations_queued: u64,
    /// Number of waves whose queue has been detached for execution
    pub waves_flushed: u64,
    /// Number of operations that settled with a value
    pub operations_succeeded: u64,
    /// Number of operations that settled with their own error
    pub operations_failed: u64,
    /// Number of operations that panicked
    pub operations_panicked: u64,
}

impl BatchStats {
    // == Constructor ==
    /// Creates a new BatchStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Operations Settled ==
    /// Total operations that reached settlement, whatever the outcome.
    pub fn operations_settled(&self) -> u64 {
        self.operations_succeeded + self.operations_failed + self.operations_panicked
    }

    // == Record Queued ==
    /// Increments the queued operations counter.
    pub fn record_queued(&mut self) {
        self.operations_queued += 1;
    }

    // == Record Wave ==
    /// Increments the flushed waves counter.
    pub fn record_wave(&mut self) {
        self.waves_flushed += 1;
    }

    // == Record Settlements ==
    /// Folds the settlement counts of one finished wave into the totals.
    pub fn record_settlements(&mut self, succeeded: u64, failed: u64, panicked: u64) {
        self.operations_succeeded += succeeded;
        self.operations_failed += failed;
        self.operations_panicked += panicked;
    }
}
