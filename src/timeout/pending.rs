//! Handles for results produced on a worker.

use std::panic;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};

use crate::error::Fault;

/// A result being computed on a [`WorkerPool`](crate::WorkerPool).
///
/// Supports unbounded and bounded waiting, and explicit cancellation. Dropping
/// an unfinished handle aborts the work, so a caller that stops waiting (or is
/// itself cancelled) never leaves work running detached.
///
/// - Work that was aborted resolves to [`Fault::cancelled`]
/// - Work that panicked re-raises the panic on the waiting caller
#[derive(Debug)]
pub struct PendingResult<Y, E> {
    handle: JoinHandle<Result<Y, E>>,
}

impl<Y, E> PendingResult<Y, E> {
    pub(crate) fn new(handle: JoinHandle<Result<Y, E>>) -> Self {
        PendingResult { handle }
    }

    /// Ask the worker to stop. The work is dropped at its next suspension point.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the work has completed, failed, or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<Y, E: Fault> PendingResult<Y, E> {
    /// Wait for the result, however long it takes.
    pub async fn wait(mut self) -> Result<Y, E> {
        let joined = (&mut self.handle).await;
        settle(joined)
    }

    /// Wait at most `bound` for the result.
    ///
    /// If the bound elapses first, the work is cancelled and
    /// [`Fault::timed_out`] is returned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sturdy::{Error, WorkerPool};
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let pool = WorkerPool::dedicated().unwrap();
    /// let pending = pool.submit(async {
    ///     tokio::time::sleep(Duration::from_secs(10)).await;
    ///     Ok::<_, Error>(())
    /// });
    ///
    /// let err = pending.wait_for(Duration::from_millis(10)).await.unwrap_err();
    /// assert!(err.is_timeout());
    /// # });
    /// ```
    pub async fn wait_for(mut self, bound: Duration) -> Result<Y, E> {
        match tokio::time::timeout(bound, &mut self.handle).await {
            Ok(joined) => settle(joined),
            Err(_) => {
                self.handle.abort();
                tracing::warn!(?bound, "worker did not finish in time; cancelled");
                Err(E::timed_out(bound))
            }
        }
    }
}

impl<Y, E> Drop for PendingResult<Y, E> {
    fn drop(&mut self) {
        // No-op once the task has finished.
        self.handle.abort();
    }
}

fn settle<Y, E: Fault>(joined: Result<Result<Y, E>, JoinError>) -> Result<Y, E> {
    match joined {
        Ok(result) => result,
        Err(error) if error.is_panic() => panic::resume_unwind(error.into_panic()),
        Err(_) => Err(E::cancelled()),
    }
}
