//! Read-through demo
//!
//! Simulates a bursty client that asks for the same few records many times.
//! Misses are coalesced into waves, hits are served from the TTL cache, and
//! the final statistics show how much upstream work was saved.
//!
//! Run with `cargo run --example read_through`; tune with `CACHE_TIMEOUT_MS`,
//! `BATCH_INTERVAL_MS` and `RUST_LOG`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cache_batch::{Config, ReadThrough};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Stand-in for a slow remote lookup.
async fn fetch_record(id: u32, upstream_calls: Arc<AtomicUsize>) -> Result<String, String> {
    upstream_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(30)).await;
    if id == 13 {
        return Err(format!("record {} is unavailable", id));
    }
    Ok(format!("record-{}", id))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_batch=debug,read_through=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_timeout={:?}, batch_interval={:?}",
        config.cache_timeout, config.batch_interval
    );

    let loader: ReadThrough<String> = ReadThrough::new(&config);
    let upstream_calls = Arc::new(AtomicUsize::new(0));

    for round in 0..3 {
        let mut requests = Vec::new();
        for i in 0..20u32 {
            let loader = loader.clone();
            let upstream_calls = Arc::clone(&upstream_calls);
            let id = [1, 2, 3, 13][i as usize % 4];
            requests.push(tokio::spawn(async move {
                let key = format!("record:{}", id);
                loader
                    .load(&key, move || fetch_record(id, upstream_calls))
                    .await
            }));
        }

        for request in requests {
            match request.await {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => warn!("Request failed: {}", err),
                Err(err) => warn!("Request task aborted: {}", err),
            }
        }
        info!("Round {} complete", round);
    }

    let cache_stats = loader.cache_stats();
    let batch_stats = loader.coalescer().stats();
    info!(
        "Cache: hits={}, misses={}, hit_rate={:.2}",
        cache_stats.hits,
        cache_stats.misses,
        cache_stats.hit_rate()
    );
    info!(
        "Batches: waves={}, queued={}, failed={}",
        batch_stats.waves_flushed, batch_stats.operations_queued, batch_stats.operations_failed
    );
    info!(
        "Upstream calls: {} for 60 requests",
        upstream_calls.load(Ordering::SeqCst)
    );
}
