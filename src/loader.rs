//! Read-Through Loader
//!
//! Composes a `TtlCache` with a `BatchCoalescer`: a cache hit is served
//! directly, a miss is loaded through the coalescer and written back on success.
//! The two primitives stay independent; this is just one way to wire them.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::batch::BatchCoalescer;
use crate::cache::{CacheStats, TtlCache};
use crate::config::Config;
use crate::error::Result;

// == Read Through ==
/// Cache-first loader for values of type `V`.
///
/// Cloning is cheap; clones share the same cache and coalescer.
#[derive(Debug)]
pub struct ReadThrough<V> {
    cache: Arc<Mutex<TtlCache<V>>>,
    coalescer: BatchCoalescer,
}

impl<V> Clone for ReadThrough<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            coalescer: self.coalescer.clone(),
        }
    }
}

impl<V> ReadThrough<V>
where
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates a loader from the cache timeout and batch interval in `config`.
    pub fn new(config: &Config) -> Self {
        Self::from_parts(
            TtlCache::new(config.cache_timeout),
            BatchCoalescer::new(config.batch_interval),
        )
    }

    pub fn from_parts(cache: TtlCache<V>, coalescer: BatchCoalescer) -> Self {
        Self {
            cache: Arc::new(Mutex::new(cache)),
            coalescer,
        }
    }

    // == Load ==
    /// Returns the cached value for `key`, or loads it with `operation`.
    ///
    /// On a miss the operation is queued on the coalescer. When it runs it
    /// first checks the cache again, since an earlier operation for the same
    /// key may have filled it in the meantime. A successful load is written to
    /// the cache; a failed one leaves the cache untouched.
    pub async fn load<E, F, Fut>(&self, key: &str, operation: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
        E: Send + 'static,
    {
        let cached = self.cache.lock().get(key);
        if let Some(value) = cached {
            return Ok(value);
        }

        debug!(key, "cache miss, loading through coalescer");
        let cache = Arc::clone(&self.cache);
        let owned_key = key.to_string();
        self.coalescer
            .add(key, move || async move {
                let cached = cache.lock().get(&owned_key);
                if let Some(value) = cached {
                    return Ok(value);
                }

                let value = operation().await?;
                cache.lock().set(owned_key, value.clone());
                Ok(value)
            })
            .await
    }

    pub fn invalidate(&self, key: &str) {
        self.cache.lock().invalidate(key);
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    pub fn coalescer(&self) -> &BatchCoalescer {
        &self.coalescer
    }
}
