//! Bounded waiting on computations that run on a worker.
//!
//! Two cooperating decorators:
//!
//! - [`Async`]: invoking returns a [`PendingResult`] immediately; the wrapped
//!   computation runs on a [`WorkerPool`]
//! - [`Timeout`]: invokes an `Async`-shaped computation and waits for its
//!   result for at most a fixed bound
//!
//! On every non-success path (bound elapsed, worker failure, or the caller
//! giving up by dropping its future) the worker task is cancelled rather than
//! left running detached.
//!
//! # Example
//!
//! ```rust
//! use sturdy::{from_fn, Computation, ComputationExt, Error, WorkerPool};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let sleepy = from_fn(|ms: u64| async move {
//!     tokio::time::sleep(Duration::from_millis(ms)).await;
//!     Ok::<_, Error>(ms)
//! });
//! let bounded = sleepy.timeout(Duration::from_millis(100), WorkerPool::current().unwrap());
//!
//! assert_eq!(bounded.invoke(1).await.unwrap(), 1);
//! assert!(bounded.invoke(1_000).await.unwrap_err().is_timeout());
//! # });
//! ```

mod pending;
mod pool;
mod spawn;

pub use pending::PendingResult;
pub use pool::WorkerPool;
pub use spawn::Async;

use std::io;
use std::time::Duration;

use crate::computation::Computation;
use crate::error::Fault;

/// Waits at most a fixed bound for an asynchronously computed result.
///
/// Wraps a computation whose output is a [`PendingResult`], normally an
/// [`Async`]. The caller sees:
///
/// - the result, if the worker produces it within the bound
/// - the worker's own error, if it fails within the bound
/// - [`Fault::timed_out`], if the bound elapses first (the worker is cancelled)
/// - [`Fault::cancelled`], if the worker was cancelled by someone else
///
/// Dropping the caller's future while it waits cancels the worker as well.
#[derive(Debug, Clone)]
pub struct Timeout<A> {
    origin: A,
    bound: Duration,
}

impl<A> Timeout<A> {
    /// Bound the wait on an `Async`-shaped computation.
    pub fn new(origin: A, bound: Duration) -> Self {
        Timeout { origin, bound }
    }

    /// The maximum wait.
    pub fn bound(&self) -> Duration {
        self.bound
    }
}

impl<C> Timeout<Async<C>> {
    /// Run `origin` on a dedicated single-worker pool, waiting at most `bound`.
    pub fn spawned(origin: C, bound: Duration) -> io::Result<Self> {
        Ok(Self::new(Async::new(origin)?, bound))
    }
}

impl<X, A, Y, E> Computation<X> for Timeout<A>
where
    A: Computation<X, Output = PendingResult<Y, E>, Error = E>,
    E: Fault + Send,
    X: Send,
    Y: Send,
{
    type Output = Y;
    type Error = E;

    async fn invoke(&self, input: X) -> Result<Y, E> {
        let pending = self.origin.invoke(input).await?;
        pending.wait_for(self.bound).await
    }
}

#[cfg(test)]
mod tests;
