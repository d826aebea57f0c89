//! The asynchronous decorator: invoke now, collect the result later.

use std::io;
use std::sync::Arc;

use crate::computation::Computation;
use crate::timeout::pending::PendingResult;
use crate::timeout::pool::WorkerPool;

/// Runs a computation on a [`WorkerPool`] instead of the caller's task.
///
/// Invoking returns a [`PendingResult`] straight away; the wrapped computation
/// runs on the pool. Submission itself never fails, so the outer `Result` is
/// always `Ok`.
///
/// # Example
///
/// ```rust
/// use sturdy::{from_fn, Async, Computation, Error, WorkerPool};
///
/// # tokio_test::block_on(async {
/// let slow_double = from_fn(|x: u32| async move { Ok::<_, Error>(x * 2) });
/// let spawned = Async::with_pool(slow_double, WorkerPool::current().unwrap());
///
/// let pending = spawned.invoke(21).await.unwrap();
/// assert_eq!(pending.wait().await.unwrap(), 42);
/// # });
/// ```
#[derive(Debug)]
pub struct Async<C> {
    origin: Arc<C>,
    pool: WorkerPool,
}

impl<C> Clone for Async<C> {
    fn clone(&self) -> Self {
        Async {
            origin: Arc::clone(&self.origin),
            pool: self.pool.clone(),
        }
    }
}

impl<C> Async<C> {
    /// Run `origin` on its own single-worker pool.
    pub fn new(origin: C) -> io::Result<Self> {
        Ok(Self::with_pool(origin, WorkerPool::dedicated()?))
    }

    /// Run `origin` on the given pool.
    pub fn with_pool(origin: C, pool: WorkerPool) -> Self {
        Async {
            origin: Arc::new(origin),
            pool,
        }
    }

    /// The pool invocations are submitted to.
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }
}

impl<X, C> Computation<X> for Async<C>
where
    C: Computation<X> + 'static,
    C::Output: 'static,
    C::Error: 'static,
    X: Send + 'static,
{
    type Output = PendingResult<C::Output, C::Error>;
    type Error = C::Error;

    async fn invoke(&self, input: X) -> Result<Self::Output, C::Error> {
        let origin = Arc::clone(&self.origin);
        Ok(self
            .pool
            .submit(async move { origin.invoke(input).await }))
    }
}
