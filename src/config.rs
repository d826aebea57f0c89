//! Plain-data configuration for decorators.
//!
//! These types describe construction-time settings (attempt bounds, delays,
//! timeout bounds, cache sizes) as data that can be embedded in an
//! application's own configuration. With the `serde` feature they implement
//! `Serialize` and `Deserialize`; durations use serde's `{ secs, nanos }` form.
//!
//! # Example
//!
//! ```rust
//! use sturdy::config::{CacheConfig, RetryConfig};
//! use sturdy::{from_sync, Computation, Error, Retry, RetryPolicy, Sticky};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let retry = RetryConfig {
//!     attempts: 5,
//!     delay: Duration::from_millis(10),
//!     ..RetryConfig::default()
//! };
//! let cache = CacheConfig { max_size: Some(128) };
//!
//! let origin = from_sync(|x: u32| Ok::<_, Error>(x));
//! let stack = Retry::new(cache.apply(origin), RetryPolicy::from(retry));
//! assert_eq!(stack.invoke(3).await.unwrap(), 3);
//! # });
//! ```

use std::time::Duration;

use crate::cache::Sticky;
use crate::retry::{JitterStrategy, RetryPolicy, RetryStrategy, DEFAULT_ATTEMPTS};
use crate::timeout::{Async, Timeout, WorkerPool};

/// Settings for a [`Retry`](crate::Retry) decorator.
///
/// Custom exit conditions are code, not data; build those with
/// [`RetryPolicy::until`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryConfig {
    /// Maximum number of attempts.
    pub attempts: u32,
    /// Base delay between attempts. Zero means no delay.
    pub delay: Duration,
    /// How the delay grows between attempts.
    pub backoff: Backoff,
    /// Cap on any single delay.
    pub max_delay: Option<Duration>,
    /// Randomization applied to delays.
    pub jitter: JitterStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            attempts: DEFAULT_ATTEMPTS,
            delay: Duration::ZERO,
            backoff: Backoff::Constant,
            max_delay: None,
            jitter: JitterStrategy::None,
        }
    }
}

/// Shape of the delay curve in a [`RetryConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Backoff {
    /// Same delay every time.
    #[default]
    Constant,
    /// delay * (attempt + 1)
    Linear,
    /// delay * 2^attempt
    Exponential,
    /// delay * fib(attempt + 1)
    Fibonacci,
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        let base = config.delay;
        let strategy = match config.backoff {
            Backoff::Constant => RetryStrategy::Constant(base),
            Backoff::Linear => RetryStrategy::Linear { base },
            Backoff::Exponential => RetryStrategy::Exponential { base },
            Backoff::Fibonacci => RetryStrategy::Fibonacci { base },
        };

        let mut policy = RetryPolicy::attempts(config.attempts).with_backoff(strategy);
        if let Some(max) = config.max_delay {
            policy = policy.with_max_delay(max);
        }
        match config.jitter {
            JitterStrategy::None => policy,
            JitterStrategy::Proportional(factor) => policy.with_jitter(factor),
            JitterStrategy::Full => policy.with_full_jitter(),
            JitterStrategy::Decorrelated => policy.with_decorrelated_jitter(),
        }
    }
}

/// Settings for a [`Sticky`] cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
    /// Maximum number of memoized inputs; `None` is unbounded.
    pub max_size: Option<usize>,
}

impl CacheConfig {
    /// Wrap `origin` in a cache with these settings.
    pub fn apply<C, K, V>(self, origin: C) -> Sticky<C, K, V> {
        Sticky::with_max_size(origin, self.max_size)
    }
}

/// Settings for a [`Timeout`] decorator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeoutConfig {
    /// Maximum wait for each result.
    pub bound: Duration,
}

impl TimeoutConfig {
    /// Run `origin` on `pool`, waiting at most the configured bound.
    pub fn apply<C>(self, origin: C, pool: WorkerPool) -> Timeout<Async<C>> {
        Timeout::new(Async::with_pool(origin, pool), self.bound)
    }
}
