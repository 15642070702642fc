//! Batch Flush Task
//!
//! One-shot timer that detaches a coalescer's queue and drives the resulting wave.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use crate::batch::{BatchState, OperationQueue, Settlement};

/// Spawns the flush timer for a batch that has just received its first operation.
///
/// After `interval` the task detaches the whole queue in one critical section,
/// then starts every detached operation and waits until each has settled.
/// Operations added while the wave runs go into the fresh queue and arm a new
/// timer of their own.
///
/// # Arguments
/// * `state` - Shared queue, timer slot and stats of the owning coalescer
/// * `interval` - Delay between arming and flushing
pub(crate) fn spawn_flush_timer(
    state: Arc<Mutex<BatchState>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(interval).await;

        let wave = state.lock().detach();
        let tally = run_wave(wave).await;

        state
            .lock()
            .stats_mut()
            .record_settlements(tally.succeeded, tally.failed, tally.panicked);

        info!(
            keys = tally.keys,
            operations = tally.total(),
            succeeded = tally.succeeded,
            failed = tally.failed,
            panicked = tally.panicked,
            "batch wave settled"
        );
    })
}

// == Wave Tally ==
/// Settlement counts of one wave.
#[derive(Debug, Default, PartialEq, Eq)]
struct WaveTally {
    keys: usize,
    succeeded: u64,
    failed: u64,
    panicked: u64,
}

impl WaveTally {
    fn total(&self) -> u64 {
        self.succeeded + self.failed + self.panicked
    }
}

/// Starts every operation of the wave, key by key in submission order, and
/// waits for all of them. One operation's failure never stops the others.
async fn run_wave(wave: OperationQueue) -> WaveTally {
    let keys = wave.len();
    let started: Vec<_> = wave
        .into_values()
        .flatten()
        .map(|operation| operation())
        .collect();

    let mut tally = WaveTally {
        keys,
        ..WaveTally::default()
    };
    for settlement in join_all(started).await {
        match settlement {
            Settlement::Succeeded => tally.succeeded += 1,
            Settlement::Failed => tally.failed += 1,
            Settlement::Panicked => tally.panicked += 1,
        }
    }
    tally
}
