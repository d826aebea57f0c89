//! Testing utilities for code built on sturdy's decorators.
//!
//! This module provides scripted computations and call counters that make the
//! observable behavior of a decorator stack (how many times the origin ran, and
//! with which outcome) easy to assert on.
//!
//! # Examples
//!
//! ## Counting invocations
//!
//! ```rust
//! use sturdy::testing::Counted;
//! use sturdy::{assert_invoked, from_sync, Computation, ComputationExt, Error};
//!
//! # tokio_test::block_on(async {
//! let origin = Counted::new(from_sync(|x: u32| Ok::<_, Error>(x + 1)));
//! let cached = origin.clone().sticky();
//!
//! cached.invoke(1).await.unwrap();
//! cached.invoke(1).await.unwrap();
//! assert_invoked!(origin, 1);
//! # });
//! ```
//!
//! ## Scripted failures
//!
//! ```rust
//! use sturdy::testing::FailTimes;
//! use sturdy::{Computation, ComputationExt, RetryPolicy};
//!
//! # tokio_test::block_on(async {
//! let flaky = FailTimes::new(2);
//! let retried = flaky.clone().retry(RetryPolicy::attempts(3));
//!
//! assert_eq!(retried.invoke(()).await.unwrap(), 3);
//! assert_eq!(flaky.calls(), 3);
//! # });
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::computation::Computation;
use crate::error::Error;

/// Wraps a computation and counts how many times it is invoked.
///
/// Clones share the counter, so a clone can be handed to a decorator while the
/// original is kept for assertions.
#[derive(Debug, Clone)]
pub struct Counted<C> {
    origin: C,
    calls: Arc<AtomicU32>,
}

impl<C> Counted<C> {
    /// Start counting invocations of `origin`.
    pub fn new(origin: C) -> Self {
        Counted {
            origin,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Number of invocations so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<X, C> Computation<X> for Counted<C>
where
    C: Computation<X>,
    X: Send,
{
    type Output = C::Output;
    type Error = C::Error;

    async fn invoke(&self, input: X) -> Result<C::Output, C::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.origin.invoke(input).await
    }
}

/// A computation that fails a fixed number of times, then succeeds.
///
/// Call `k` (1-based) fails with `Error::Failed("failure #k")` while
/// `k <= failures`, and succeeds with `k` afterwards.
#[derive(Debug, Clone)]
pub struct FailTimes {
    failures: u32,
    calls: Arc<AtomicU32>,
}

impl FailTimes {
    /// Fail the first `failures` invocations.
    pub fn new(failures: u32) -> Self {
        FailTimes {
            failures,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Never succeed.
    pub fn always() -> Self {
        Self::new(u32::MAX)
    }

    /// Number of invocations so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Computation<()> for FailTimes {
    type Output = u32;
    type Error = Error;

    async fn invoke(&self, _input: ()) -> Result<u32, Error> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            Err(Error::failed(format!("failure #{call}")))
        } else {
            Ok(call)
        }
    }
}

/// Assert that a counting helper was invoked exactly `n` times.
///
/// Works with anything exposing a `calls()` method, such as [`Counted`] and
/// [`FailTimes`].
///
/// # Example
///
/// ```rust
/// use sturdy::assert_invoked;
/// use sturdy::testing::FailTimes;
///
/// let flaky = FailTimes::new(1);
/// assert_invoked!(flaky, 0);
/// ```
#[macro_export]
macro_rules! assert_invoked {
    ($counter:expr, $n:expr) => {{
        let calls = $counter.calls();
        if calls != $n {
            panic!("Expected {} invocation(s), got {}", $n, calls);
        }
    }};
}
