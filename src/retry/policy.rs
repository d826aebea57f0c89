//! Retry policy types and configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Number of attempts made by [`RetryPolicy::default`].
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// A predicate over the zero-based attempt index deciding when a retry loop stops.
///
/// The condition is consulted *before* each attempt: when it returns `true` for
/// index `n`, attempt `n` is not made. A condition that is already true at index 0
/// allows no attempt at all, which the retry decorator reports as a policy
/// violation rather than success.
///
/// # Examples
///
/// ```rust
/// use sturdy::ExitCondition;
///
/// let three = ExitCondition::attempts(3);
/// assert!(!three.is_met(2));
/// assert!(three.is_met(3));
///
/// let even = ExitCondition::when(|attempt| attempt >= 2 && attempt % 2 == 0);
/// assert!(!even.is_met(1));
/// assert!(even.is_met(2));
/// ```
#[derive(Clone)]
pub enum ExitCondition {
    /// Stop once `n` attempts have been made.
    Attempts(u32),
    /// Stop when the predicate returns true for the attempt index.
    Custom(Arc<dyn Fn(u32) -> bool + Send + Sync>),
}

impl ExitCondition {
    /// Stop after `n` attempts.
    pub fn attempts(n: u32) -> Self {
        ExitCondition::Attempts(n)
    }

    /// Stop when `predicate(attempt)` holds.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(u32) -> bool + Send + Sync + 'static,
    {
        ExitCondition::Custom(Arc::new(predicate))
    }

    /// Whether attempt `attempt` (zero-based) must not be made.
    pub fn is_met(&self, attempt: u32) -> bool {
        match self {
            ExitCondition::Attempts(n) => attempt >= *n,
            ExitCondition::Custom(predicate) => predicate(attempt),
        }
    }
}

impl Default for ExitCondition {
    fn default() -> Self {
        ExitCondition::Attempts(DEFAULT_ATTEMPTS)
    }
}

impl fmt::Debug for ExitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCondition::Attempts(n) => f.debug_tuple("Attempts").field(n).finish(),
            ExitCondition::Custom(_) => f.debug_tuple("Custom").field(&"<predicate>").finish(),
        }
    }
}

/// A retry policy: when to stop, and how long to wait between failed attempts.
///
/// Policies are pure data. They describe retry behavior but don't execute it,
/// which makes them easy to test, clone, and inspect.
///
/// The default policy makes up to three attempts with no delay.
///
/// # Examples
///
/// ```rust
/// use sturdy::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::attempts(5)
///     .with_delay(Duration::from_millis(100));
///
/// assert!(!policy.exit_condition().is_met(4));
/// assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
///
/// // Exponential backoff capped at one second
/// let policy = RetryPolicy::attempts(10)
///     .with_backoff(sturdy::RetryStrategy::Exponential { base: Duration::from_millis(100) })
///     .with_max_delay(Duration::from_secs(1));
/// assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    exit: ExitCondition,
    strategy: RetryStrategy,
    max_delay: Option<Duration>,
    jitter: JitterStrategy,
}

/// The backoff strategy for delays between attempts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RetryStrategy {
    /// Fixed delay between attempts. A zero duration means no delay.
    Constant(Duration),
    /// Delay increases linearly: base * (attempt + 1).
    Linear {
        /// Base delay duration.
        base: Duration,
    },
    /// Delay doubles: base * 2^attempt.
    Exponential {
        /// Base delay duration.
        base: Duration,
    },
    /// Delay follows Fibonacci sequence: fib(attempt + 1) * base.
    Fibonacci {
        /// Base delay duration.
        base: Duration,
    },
}

impl Default for RetryStrategy {
    fn default() -> Self {
        RetryStrategy::Constant(Duration::ZERO)
    }
}

/// Strategy for adding randomness to delays.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JitterStrategy {
    /// No jitter applied.
    #[default]
    None,
    /// Add ±percentage randomness to delay.
    Proportional(f64),
    /// Random delay between 0 and calculated delay (AWS recommended).
    Full,
    /// Decorrelated jitter (AWS style).
    Decorrelated,
}

/// Information about a failed attempt, passed to retry hooks.
#[derive(Debug, Clone)]
pub struct RetryEvent<'a, E> {
    /// Which attempt just failed (1-indexed).
    pub attempt: u32,
    /// The error from the failed attempt.
    pub error: &'a E,
    /// Delay before the next attempt, or `None` if the policy stops here.
    pub next_delay: Option<Duration>,
    /// Total elapsed time since the first attempt.
    pub elapsed: Duration,
}

impl RetryPolicy {
    /// Up to `n` attempts, no delay.
    ///
    /// `attempts(0)` is accepted but allows no attempt; invoking a retry with it
    /// fails with a policy violation.
    pub fn attempts(n: u32) -> Self {
        Self {
            exit: ExitCondition::Attempts(n),
            ..Self::default()
        }
    }

    /// Stop according to a custom exit condition, no delay.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sturdy::{ExitCondition, RetryPolicy};
    ///
    /// let policy = RetryPolicy::until(ExitCondition::when(|attempt| attempt >= 2));
    /// assert!(policy.exit_condition().is_met(2));
    /// ```
    pub fn until(exit: ExitCondition) -> Self {
        Self {
            exit,
            ..Self::default()
        }
    }

    /// Wait a constant `delay` between failed attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.strategy = RetryStrategy::Constant(delay);
        self
    }

    /// Use a backoff strategy for delays between failed attempts.
    pub fn with_backoff(mut self, strategy: RetryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the maximum delay cap.
    ///
    /// Delays will never exceed this value, regardless of the backoff strategy
    /// or jitter.
    pub fn with_max_delay(mut self, d: Duration) -> Self {
        self.max_delay = Some(d);
        self
    }

    /// Add proportional jitter to delays.
    ///
    /// The factor determines the range of randomness. For example, `0.25` means
    /// the actual delay will be ±25% of the calculated delay.
    ///
    /// **Note**: Requires the `jitter` feature. Without it, delays are unchanged.
    pub fn with_jitter(mut self, factor: f64) -> Self {
        self.jitter = JitterStrategy::Proportional(factor.clamp(0.0, 1.0));
        self
    }

    /// Use full jitter: a random delay between 0 and the calculated delay.
    ///
    /// **Note**: Requires the `jitter` feature. Without it, delays are unchanged.
    pub fn with_full_jitter(mut self) -> Self {
        self.jitter = JitterStrategy::Full;
        self
    }

    /// Use decorrelated jitter: random between base and 3x the previous delay.
    ///
    /// **Note**: Requires the `jitter` feature. Without it, delays are unchanged.
    pub fn with_decorrelated_jitter(mut self) -> Self {
        self.jitter = JitterStrategy::Decorrelated;
        self
    }

    /// Get the exit condition.
    pub fn exit_condition(&self) -> &ExitCondition {
        &self.exit
    }

    /// Get the maximum delay cap.
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    /// Get the jitter strategy.
    pub fn jitter(&self) -> &JitterStrategy {
        &self.jitter
    }

    /// Get the backoff strategy.
    pub fn strategy(&self) -> &RetryStrategy {
        &self.strategy
    }

    /// Calculate the delay after failed attempt N (0-indexed), before jitter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sturdy::{RetryPolicy, RetryStrategy};
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::attempts(4)
    ///     .with_backoff(RetryStrategy::Fibonacci { base: Duration::from_millis(100) });
    ///
    /// assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
    /// assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
    /// assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
    /// assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(300));
    /// ```
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_delay = match &self.strategy {
            RetryStrategy::Constant(d) => *d,
            RetryStrategy::Linear { base } => base.saturating_mul(attempt.saturating_add(1)),
            RetryStrategy::Exponential { base } => {
                base.saturating_mul(2u32.saturating_pow(attempt))
            }
            RetryStrategy::Fibonacci { base } => {
                base.saturating_mul(fibonacci(attempt.saturating_add(1)))
            }
        };

        match self.max_delay {
            Some(max) => base_delay.min(max),
            None => base_delay,
        }
    }

    /// Calculate the delay with jitter applied.
    ///
    /// This is used internally by the retry decorator.
    #[doc(hidden)]
    pub fn delay_with_jitter(&self, attempt: u32, prev_delay: Option<Duration>) -> Duration {
        let base_delay = self.delay_for_attempt(attempt);
        self.jitter.apply(base_delay, prev_delay, self.max_delay)
    }

    /// Check that the policy allows at least one attempt.
    ///
    /// A retry built from a policy that fails this check never invokes its
    /// computation and reports a policy violation instead.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.exit.is_met(0) {
            Err("RetryPolicy allows no attempt: exit condition holds at attempt 0")
        } else {
            Ok(())
        }
    }
}

impl JitterStrategy {
    /// Apply jitter to a base delay.
    ///
    /// # Arguments
    ///
    /// * `base_delay` - The calculated delay before jitter
    /// * `prev_delay` - The previous delay (for decorrelated jitter)
    /// * `max_delay` - Optional cap on the final delay
    pub fn apply(
        &self,
        base_delay: Duration,
        #[cfg_attr(not(feature = "jitter"), allow(unused_variables))] prev_delay: Option<Duration>,
        max_delay: Option<Duration>,
    ) -> Duration {
        let jittered = match self {
            JitterStrategy::None => base_delay,
            #[cfg(feature = "jitter")]
            JitterStrategy::Proportional(factor) => {
                use rand::Rng;
                let base = saturating_nanos(base_delay);
                let spread = (base as f64 * factor.clamp(0.0, 1.0)) as u64;
                Duration::from_nanos(
                    rand::rng().random_range(base.saturating_sub(spread)..=base.saturating_add(spread)),
                )
            }
            #[cfg(feature = "jitter")]
            JitterStrategy::Full => {
                use rand::Rng;
                Duration::from_nanos(rand::rng().random_range(0..=saturating_nanos(base_delay)))
            }
            #[cfg(feature = "jitter")]
            JitterStrategy::Decorrelated => {
                use rand::Rng;
                let base = saturating_nanos(base_delay);
                let max = saturating_nanos(prev_delay.unwrap_or(base_delay)).saturating_mul(3);
                if max <= base {
                    base_delay
                } else {
                    Duration::from_nanos(rand::rng().random_range(base..=max))
                }
            }
            #[cfg(not(feature = "jitter"))]
            JitterStrategy::Proportional(_) | JitterStrategy::Full | JitterStrategy::Decorrelated => {
                base_delay
            }
        };

        match max_delay {
            Some(max) => jittered.min(max),
            None => jittered,
        }
    }
}

/// Calculate the nth Fibonacci number.
fn fibonacci(n: u32) -> u32 {
    if n == 0 {
        return 0;
    }
    let mut a = 0u32;
    let mut b = 1u32;
    for _ in 1..n {
        let temp = a.saturating_add(b);
        a = b;
        b = temp;
    }
    b
}

#[cfg(feature = "jitter")]
fn saturating_nanos(delay: Duration) -> u64 {
    u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX)
}
