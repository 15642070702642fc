//! Batch Handle Module
//!
//! The per-caller future returned by `BatchCoalescer::add`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{BatchError, Result};

// == Batch Handle ==
/// Resolves with the outcome of one batched operation.
///
/// Each handle owns the receiving half of its own channel, so a sibling's
/// failure in the same wave can never reach it. Dropping a handle does not
/// cancel the operation; its outcome is discarded.
#[derive(Debug)]
#[must_use = "a BatchHandle does nothing unless awaited"]
pub struct BatchHandle<T, E> {
    rx: oneshot::Receiver<Result<T, E>>,
}

impl<T, E> BatchHandle<T, E> {
    pub(crate) fn new(rx: oneshot::Receiver<Result<T, E>>) -> Self {
        Self { rx }
    }
}

impl<T, E> Future for BatchHandle<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(BatchError::Dropped)))
    }
}
