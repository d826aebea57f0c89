//! Extension trait providing decorator builders for all computations.
//!
//! The `ComputationExt` trait is automatically implemented for all types
//! that implement `Computation`. Each method wraps `self` in one decorator, so
//! stacks read outside-in from right to left:
//!
//! ```rust
//! use sturdy::{from_sync, Computation, ComputationExt, Error, RetryPolicy};
//!
//! # tokio_test::block_on(async {
//! // Retry(Sticky(origin))
//! let stack = from_sync(|x: u8| Ok::<_, Error>(x))
//!     .sticky()
//!     .retry(RetryPolicy::attempts(2));
//! assert_eq!(stack.invoke(9).await.unwrap(), 9);
//! # });
//! ```

use std::hash::Hash;
use std::time::Duration;

use crate::cache::{Solid, Sticky};
use crate::checked::{unchecked, Checked, Unchecked};
use crate::computation::boxed::BoxComputation;
use crate::computation::from_fn::Discard;
use crate::computation::trait_def::Computation;
use crate::error::BoxError;
use crate::lock::{LockToken, Synchronized};
use crate::retry::{Retry, RetryPolicy};
use crate::timeout::{Async, Timeout, WorkerPool};

/// Extension trait providing decorator builders for all computations.
///
/// You don't need to implement this trait yourself.
pub trait ComputationExt<X>: Computation<X> + Sized {
    /// Retry failed invocations according to `policy`.
    fn retry(self, policy: RetryPolicy) -> Retry<Self> {
        Retry::new(self, policy)
    }

    /// Memoize results per input, without bound.
    fn sticky(self) -> Sticky<Self, X, Self::Output> {
        Sticky::new(self)
    }

    /// Memoize results for at most `max_size` inputs, evicting oldest first.
    fn sticky_bounded(self, max_size: usize) -> Sticky<Self, X, Self::Output> {
        Sticky::bounded(self, max_size)
    }

    /// Serialize invocations behind a lock owned by the decorator.
    fn synchronized(self) -> Synchronized<Self> {
        Synchronized::new(self)
    }

    /// Serialize invocations behind a shared lock.
    fn synchronized_with(self, token: LockToken) -> Synchronized<Self> {
        Synchronized::with_token(self, token)
    }

    /// Thread-safe memoization of at most `max_size` inputs.
    ///
    /// Equivalent to `self.sticky_bounded(max_size).synchronized()`.
    fn solid(self, max_size: usize) -> Solid<Self, X, Self::Output>
    where
        X: Hash + Eq + Clone,
    {
        Solid::new(self, max_size)
    }

    /// Run invocations on `pool`, returning a pending result immediately.
    fn spawned(self, pool: WorkerPool) -> Async<Self> {
        Async::with_pool(self, pool)
    }

    /// Run invocations on `pool`, waiting at most `bound` for each result.
    fn timeout(self, bound: Duration, pool: WorkerPool) -> Timeout<Async<Self>> {
        Timeout::new(Async::with_pool(self, pool), bound)
    }

    /// Surface every failure as `T`, translating foreign failures once.
    fn checked<T, F>(self, translator: F) -> Checked<Self, T, F>
    where
        F: Fn(BoxError) -> T + Send + Sync,
    {
        Checked::new(self, translator)
    }

    /// Surface every failure as `std::io::Error`.
    fn unchecked(self) -> Unchecked<Self> {
        unchecked(self)
    }

    /// Discard the output, keeping only success or failure.
    fn discard(self) -> Discard<Self> {
        Discard { origin: self }
    }

    /// Erase the decorator stack's type.
    fn boxed(self) -> BoxComputation<X, Self::Output, Self::Error>
    where
        Self: 'static,
        X: 'static,
    {
        BoxComputation::new(self)
    }
}

impl<X, C: Computation<X>> ComputationExt<X> for C {}
