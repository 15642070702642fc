//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and their liveness rule.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A single memoized value together with the instant it was written.
///
/// The timestamp comes from Tokio's monotonic clock, so wall-clock adjustments
/// never revive or expire an entry, and tests can drive it with a paused clock.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value, opaque to the cache
    pub data: V,
    /// Instant the entry was written
    pub timestamp: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stamped with the current instant.
    pub fn new(data: V) -> Self {
        Self {
            data,
            timestamp: Instant::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the entry was written.
    pub fn age(&self) -> Duration {
        self.timestamp.elapsed()
    }

    // == Is Live ==
    /// Checks whether the entry is still fresh under `timeout`.
    ///
    /// Boundary condition: an entry is live only while its age is strictly
    /// less than the timeout. Once the full timeout has elapsed it is stale,
    /// and a zero timeout makes every entry stale immediately.
    pub fn is_live(&self, timeout: Duration) -> bool {
        self.age() < timeout
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_creation() {
        let entry = CacheEntry::new("test_value");

        assert_eq!(entry.data, "test_value");
        assert_eq!(entry.age(), Duration::ZERO);
        assert!(entry.is_live(Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_ages_with_clock() {
        let entry = CacheEntry::new(42u32);

        tokio::time::advance(Duration::from_millis(750)).await;

        assert_eq!(entry.age(), Duration::from_millis(750));
        assert!(entry.is_live(Duration::from_secs(1)));
        assert!(!entry.is_live(Duration::from_millis(500)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_liveness_boundary_condition() {
        let entry = CacheEntry::new("test");

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(entry.is_live(Duration::from_secs(1)));

        // Age equal to the timeout is already stale
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!entry.is_live(Duration::from_secs(1)));
    }

    #[test]
    fn test_zero_timeout_is_never_live() {
        let entry = CacheEntry::new(());
        assert!(!entry.is_live(Duration::ZERO));
    }
}
