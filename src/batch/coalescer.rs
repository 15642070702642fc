//! Batch Coalescer Module
//!
//! Groups operations submitted under string keys into time-windowed waves.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::batch::{BatchHandle, BatchStats};
use crate::error::BatchError;
use crate::tasks::spawn_flush_timer;

// == Settlement ==
/// How a single pending operation finished, as seen by the wave driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settlement {
    Succeeded,
    Failed,
    Panicked,
}

/// A deferred operation that forwards its own outcome to its own caller.
///
/// Invoking the box starts the wrapped operation; the returned future never
/// fails and only reports how the operation settled.
pub(crate) type PendingOperation = Box<dyn FnOnce() -> BoxFuture<'static, Settlement> + Send>;

/// Operations grouped by key, each key's list in submission order.
pub(crate) type OperationQueue = HashMap<String, Vec<PendingOperation>>;

// == Batch State ==
/// Queue and timer of one coalescer, always mutated under a single lock.
///
/// Invariant: `timer` is `Some` exactly when `queue` is non-empty. A finished
/// handle in the slot means the timer died before flushing (its runtime shut
/// down or the task was aborted); the next `enqueue` asks for a replacement.
#[derive(Default)]
pub(crate) struct BatchState {
    queue: OperationQueue,
    timer: Option<JoinHandle<()>>,
    stats: BatchStats,
}

impl BatchState {
    /// Appends an operation under `key`. Returns true if the caller must arm a
    /// timer: the queue was empty, or the timer guarding it is no longer running.
    fn enqueue(&mut self, key: String, operation: PendingOperation) -> bool {
        self.queue.entry(key).or_default().push(operation);
        self.stats.record_queued();
        self.timer.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Returns true if a timer was armed but ended without detaching the queue.
    fn timer_lost(&self) -> bool {
        self.timer.as_ref().is_some_and(JoinHandle::is_finished)
    }

    /// Takes the whole queue for execution and disarms the timer in one step.
    ///
    /// Operations added afterwards land in the fresh queue and start a new cycle.
    pub(crate) fn detach(&mut self) -> OperationQueue {
        self.timer = None;
        self.stats.record_wave();
        std::mem::take(&mut self.queue)
    }

    pub(crate) fn stats_mut(&mut self) -> &mut BatchStats {
        &mut self.stats
    }
}

// == Batch Coalescer ==
/// Defers keyed asynchronous operations and runs each accumulated batch in one wave.
///
/// The first `add` after an idle period arms a one-shot timer for
/// `batch_interval`; later adds join the same batch without moving its
/// deadline. When the timer fires, every queued operation across all keys is
/// started together and each caller's handle settles with that caller's own
/// outcome. Operations are never deduplicated or retried.
///
/// Cloning is cheap and yields a handle to the same queue.
#[derive(Clone)]
pub struct BatchCoalescer {
    state: Arc<Mutex<BatchState>>,
    batch_interval: Duration,
}

impl BatchCoalescer {
    // == Constructor ==
    /// Creates an idle coalescer with the given batch window.
    ///
    /// A zero interval flushes on the next timer tick after the first add.
    pub fn new(batch_interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(BatchState::default())),
            batch_interval,
        }
    }

    // == Add ==
    /// Queues `operation` under `key` and returns a handle to its outcome.
    ///
    /// The operation is not started until the current batch flushes, at most
    /// one `batch_interval` after the batch's first operation was added.
    /// If the timer of a pending batch died without flushing it, this call
    /// arms a new one and the stranded operations flush with this batch.
    /// Within a key, operations start in submission order.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime when it has to arm the timer.
    pub fn add<T, E, F, Fut>(&self, key: impl Into<String>, operation: F) -> BatchHandle<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let key = key.into();
        let (tx, rx) = oneshot::channel();
        let pending = wrap_operation(key.clone(), operation, tx);

        let mut state = self.state.lock();
        let timer_lost = state.timer_lost();
        if state.enqueue(key.clone(), pending) {
            state.timer = Some(spawn_flush_timer(
                Arc::clone(&self.state),
                self.batch_interval,
            ));
            if timer_lost {
                let pending: usize = state.queue.values().map(Vec::len).sum();
                warn!(key = %key, pending, "batch timer ended before flushing, re-armed");
            } else {
                debug!(key = %key, interval = ?self.batch_interval, "batch timer armed");
            }
        } else {
            debug!(key = %key, "operation joined pending batch");
        }

        BatchHandle::new(rx)
    }

    // == Pending ==
    /// Number of operations waiting for the next flush, across all keys.
    pub fn pending(&self) -> usize {
        self.state.lock().queue.values().map(Vec::len).sum()
    }

    // == Pending For Key ==
    /// Number of operations waiting for the next flush under `key`.
    pub fn pending_for(&self, key: &str) -> usize {
        self.state.lock().queue.get(key).map_or(0, Vec::len)
    }

    // == Is Armed ==
    /// Returns true while a running flush timer guards the queue.
    pub fn is_armed(&self) -> bool {
        let state = self.state.lock();
        state.timer.is_some() && !state.timer_lost()
    }

    // == Batch Interval ==
    /// Returns the window between a batch's first operation and its flush.
    pub fn batch_interval(&self) -> Duration {
        self.batch_interval
    }

    // == Stats ==
    /// Returns a snapshot of the coalescer statistics.
    pub fn stats(&self) -> BatchStats {
        self.state.lock().stats.clone()
    }
}

impl fmt::Debug for BatchCoalescer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchCoalescer")
            .field("batch_interval", &self.batch_interval)
            .field("pending", &self.pending())
            .field("armed", &self.is_armed())
            .finish()
    }
}

/// Wraps a caller's operation so that its outcome, panic included, goes to `tx`.
fn wrap_operation<T, E, F, Fut>(
    key: String,
    operation: F,
    tx: oneshot::Sender<crate::error::Result<T, E>>,
) -> PendingOperation
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    Box::new(move || {
        // Calling the closure is what starts the operation
        let started = std::panic::catch_unwind(AssertUnwindSafe(operation));

        async move {
            let outcome = match started {
                Ok(future) => AssertUnwindSafe(future).catch_unwind().await,
                Err(payload) => Err(payload),
            };

            let (settlement, result) = match outcome {
                Ok(Ok(value)) => (Settlement::Succeeded, Ok(value)),
                Ok(Err(err)) => {
                    warn!(key = %key, "batched operation failed");
                    (Settlement::Failed, Err(BatchError::Operation(err)))
                }
                Err(payload) => {
                    let message = panic_message(&*payload);
                    warn!(key = %key, panic = %message, "batched operation panicked");
                    (Settlement::Panicked, Err(BatchError::Panicked(message)))
                }
            };

            // The caller may have dropped its handle
            let _ = tx.send(result);
            settlement
        }
        .boxed()
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
