//! # Sturdy
//!
//! Composable resilience and caching decorators for async computations.
//!
//! A [`Computation`] is anything that can be invoked with an input and produces
//! an output or fails. Decorators wrap a computation and expose the same
//! contract, so they stack in any order:
//!
//! - [`Retry`]: repeat on failure, following a [`RetryPolicy`]
//! - [`Async`] + [`Timeout`]: run on a [`WorkerPool`] and bound the wait,
//!   cancelling the worker when the bound elapses
//! - [`Sticky`]: memoize per input, optionally bounded with FIFO eviction
//! - [`Synchronized`]: serialize invocations behind a [`LockToken`]
//! - [`Solid`]: `Synchronized(Sticky(..))`, at-most-once computation per key
//! - [`Checked`] / [`Unchecked`]: relabel failures as one error kind, once
//!
//! ## Quick Example
//!
//! ```rust
//! use sturdy::prelude::*;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let fetch = from_fn(|id: u32| async move {
//!     tokio::time::sleep(Duration::from_millis(5)).await;
//!     Ok::<_, Error>(format!("record-{id}"))
//! });
//!
//! // Bound each attempt, retry timeouts, and memoize the outcome
//! let records = fetch
//!     .timeout(Duration::from_millis(200), WorkerPool::current().unwrap())
//!     .retry(RetryPolicy::attempts(3).with_delay(Duration::from_millis(10)))
//!     .solid(100);
//!
//! assert_eq!(records.invoke(7).await.unwrap(), "record-7");
//! assert_eq!(records.invoke(7).await.unwrap(), "record-7");
//! # });
//! ```
//!
//! ## Composition Order
//!
//! Order is load-bearing for caching under concurrency: the lock must be
//! outside the cache. [`Solid`] fixes that order for you.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cache;
pub mod checked;
pub mod computation;
pub mod config;
pub mod error;
pub mod lock;
pub mod retry;
pub mod testing;
pub mod timeout;

// Re-exports
pub use cache::{FifoStore, Solid, Sticky};
pub use checked::{unchecked, Checked, Translator, Unchecked};
pub use computation::{
    from_fn, from_sync, BoxComputation, Computation, ComputationExt, Discard, FromFn, FromSync,
};
pub use error::{BoxError, Error, Fault};
pub use lock::{LockToken, Synchronized};
pub use retry::{
    ExitCondition, JitterStrategy, Retry, RetryEvent, RetryHook, RetryPolicy, RetryStrategy,
};
pub use timeout::{Async, PendingResult, Timeout, WorkerPool};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::computation::{from_fn, from_sync, Computation, ComputationExt};
    pub use crate::error::{Error, Fault};
    pub use crate::lock::LockToken;
    pub use crate::retry::{ExitCondition, RetryPolicy};
    pub use crate::timeout::WorkerPool;
}
