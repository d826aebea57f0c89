//! Retry decorator for computations.
//!
//! This module splits retry into data and behavior:
//!
//! - **Policy**: [`RetryPolicy`] is just data: an [`ExitCondition`] deciding how
//!   many attempts are made, and a backoff strategy for the delay between them
//! - **Decorator**: [`Retry`] wraps a computation and runs the attempt loop
//!
//! # Quick Start
//!
//! ```rust
//! use sturdy::{from_sync, Computation, ComputationExt, Error, RetryPolicy};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let lookup = from_sync(|key: &'static str| Ok::<_, Error>(key.len()))
//!     .retry(RetryPolicy::attempts(3).with_delay(Duration::from_millis(10)));
//!
//! assert_eq!(lookup.invoke("abc").await.unwrap(), 3);
//! # });
//! ```
//!
//! # Failure Semantics
//!
//! - Retryable failures are retried up to the policy boundary; the caller sees
//!   the error of the last attempt
//! - Cancellation is never retried
//! - A policy allowing zero attempts is a distinct policy-violation error
//!
//! # Retry Strategies
//!
//! - **Constant**: Fixed delay between attempts (zero by default)
//! - **Linear**: Delay increases linearly (100ms, 200ms, 300ms, ...)
//! - **Exponential**: Delay doubles each attempt (100ms, 200ms, 400ms, ...)
//! - **Fibonacci**: Delay follows Fibonacci sequence
//!
//! # Jitter Support
//!
//! Enable the `jitter` feature to randomize delays:
//!
//! ```toml
//! sturdy = { version = "...", features = ["jitter"] }
//! ```

mod decorator;
mod policy;

pub use decorator::{Retry, RetryHook};
pub use policy::{
    ExitCondition, JitterStrategy, RetryEvent, RetryPolicy, RetryStrategy, DEFAULT_ATTEMPTS,
};
