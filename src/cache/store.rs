//! Cache Store Module
//!
//! TTL cache engine: a keyed map of timestamped entries with lazy, on-read expiration.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};

// == TTL Cache ==
/// Keyed memoization store whose entries go stale after a fixed timeout.
///
/// Staleness is only evaluated when a key is read. There is no capacity bound
/// and no background sweep, so a stale entry that is never read again keeps
/// its memory until `invalidate` or `clear` removes it.
///
/// Every operation takes `&mut self`, including `get`, which may evict. Share
/// an instance across tasks behind a lock such as
/// `Arc<parking_lot::Mutex<TtlCache<V>>>`.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Lookup and eviction counters
    stats: CacheStats,
    /// Maximum age of a live entry
    timeout: Duration,
}

impl<V> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache whose entries stay live for `timeout`.
    ///
    /// A zero timeout is accepted; every entry is then stale on its first read.
    pub fn new(timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            timeout,
        }
    }

    // == Set ==
    /// Stores `value` under `key`, overwriting any previous entry.
    ///
    /// Overwriting restarts the key's TTL window.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), CacheEntry::new(value));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Invalidate ==
    /// Removes the entry for `key`. Absent keys are a no-op.
    pub fn invalidate(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            debug!(key, "cache entry invalidated");
            self.stats.record_invalidations(1);
            self.stats.set_total_entries(self.entries.len());
        }
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.record_invalidations(removed);
        self.stats.set_total_entries(0);
        debug!(removed, "cache cleared");
    }

    // == Contains Key ==
    /// Returns true if the store currently holds an entry for `key`, live or stale.
    ///
    /// Does not evaluate liveness and never evicts.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries, stale or live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Timeout ==
    /// Returns the maximum age of a live entry.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }
}

impl<V: Clone> TtlCache<V> {
    // == Get ==
    /// Returns the value for `key` while it is live.
    ///
    /// A stale entry is removed from the store as a side effect. Both a key
    /// that was never set and a stale one yield `None`.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_live(self.timeout) {
            self.stats.record_hit();
            return Some(entry.data.clone());
        }

        let age = entry.age();
        self.entries.remove(key);
        self.stats.record_expiration();
        self.stats.set_total_entries(self.entries.len());
        debug!(key, ?age, "stale cache entry evicted on read");
        None
    }
}
