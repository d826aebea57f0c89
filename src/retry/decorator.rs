//! The retry decorator.

use std::time::{Duration, Instant};

use crate::computation::Computation;
use crate::error::Fault;
use crate::retry::policy::{RetryEvent, RetryPolicy};

/// Observer notified after every failed attempt.
///
/// Implemented for `()` (no-op) and for any `Fn(&RetryEvent<'_, E>)`.
/// The hook is synchronous and should not block; use it for logging/metrics.
pub trait RetryHook<E>: Send + Sync {
    /// Called with information about the attempt that just failed.
    fn on_retry(&self, event: &RetryEvent<'_, E>);
}

impl<E> RetryHook<E> for () {
    fn on_retry(&self, _event: &RetryEvent<'_, E>) {}
}

impl<E, F> RetryHook<E> for F
where
    F: Fn(&RetryEvent<'_, E>) + Send + Sync,
{
    fn on_retry(&self, event: &RetryEvent<'_, E>) {
        self(event)
    }
}

/// Repeats a computation until it succeeds or the policy's exit condition holds.
///
/// - Success returns immediately, with no further attempt or delay.
/// - A cancellation failure ([`Fault::is_cancelled`]) is returned immediately and
///   never retried.
/// - Any other failure becomes the last error; the policy's delay is awaited
///   before the next attempt.
/// - When the exit condition holds, the last error is returned. If no attempt
///   was made at all, [`Fault::no_attempt`] is returned instead.
///
/// The input is cloned for each attempt.
///
/// Dropping the returned future (for example from an enclosing
/// `tokio::time::timeout`) aborts an in-progress delay immediately.
///
/// # Example
///
/// ```rust
/// use sturdy::{from_fn, Computation, Error, Retry, RetryPolicy};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let calls = Arc::new(AtomicU32::new(0));
/// let flaky = from_fn({
///     let calls = calls.clone();
///     move |_: ()| {
///         let n = calls.fetch_add(1, Ordering::SeqCst);
///         async move {
///             if n < 2 { Err(Error::failed("transient")) } else { Ok("done") }
///         }
///     }
/// });
///
/// let retry = Retry::new(flaky, RetryPolicy::attempts(3));
/// assert_eq!(retry.invoke(()).await.unwrap(), "done");
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Retry<C, H = ()> {
    origin: C,
    policy: RetryPolicy,
    hook: H,
}

impl<C> Retry<C> {
    /// Retry `origin` according to `policy`.
    pub fn new(origin: C, policy: RetryPolicy) -> Self {
        Retry {
            origin,
            policy,
            hook: (),
        }
    }

    /// Retry `origin` up to `attempts` times with no delay.
    pub fn times(origin: C, attempts: u32) -> Self {
        Self::new(origin, RetryPolicy::attempts(attempts))
    }
}

impl<C, H> Retry<C, H> {
    /// Install a hook called after each failed attempt.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sturdy::{from_sync, Computation, Error, Retry, RetryEvent, RetryPolicy};
    /// use std::sync::{Arc, Mutex};
    ///
    /// # tokio_test::block_on(async {
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let retry = Retry::new(
    ///     from_sync(|_: ()| Err::<(), _>(Error::failed("nope"))),
    ///     RetryPolicy::attempts(2),
    /// )
    /// .with_hook({
    ///     let seen = seen.clone();
    ///     move |event: &RetryEvent<'_, Error>| seen.lock().unwrap().push(event.attempt)
    /// });
    ///
    /// assert!(retry.invoke(()).await.is_err());
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    /// # });
    /// ```
    pub fn with_hook<H2>(self, hook: H2) -> Retry<C, H2> {
        Retry {
            origin: self.origin,
            policy: self.policy,
            hook,
        }
    }

    /// The policy this decorator follows.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The wrapped computation.
    pub fn inner(&self) -> &C {
        &self.origin
    }
}

impl<X, C, H> Computation<X> for Retry<C, H>
where
    C: Computation<X>,
    C::Error: Fault,
    H: RetryHook<C::Error>,
    X: Clone + Send,
{
    type Output = C::Output;
    type Error = C::Error;

    async fn invoke(&self, input: X) -> Result<C::Output, C::Error> {
        let start = Instant::now();
        let exit = self.policy.exit_condition();
        let mut attempt = 0u32;
        let mut last_error: Option<C::Error> = None;
        let mut prev_delay: Option<Duration> = None;

        while !exit.is_met(attempt) {
            let error = match self.origin.invoke(input.clone()).await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_cancelled() => {
                    tracing::debug!(attempt = attempt + 1, "attempt cancelled; not retrying");
                    return Err(error);
                }
                Err(error) => error,
            };

            let next = attempt.saturating_add(1);
            let delay = if exit.is_met(next) {
                None
            } else {
                Some(self.policy.delay_with_jitter(attempt, prev_delay))
            };

            self.hook.on_retry(&RetryEvent {
                attempt: next,
                error: &error,
                next_delay: delay,
                elapsed: start.elapsed(),
            });
            last_error = Some(error);

            if let Some(d) = delay {
                tracing::debug!(attempt = next, delay = ?d, "attempt failed; retrying");
                if !d.is_zero() {
                    tokio::time::sleep(d).await;
                }
                prev_delay = Some(d);
            }
            attempt = next;
        }

        match last_error {
            Some(error) => {
                tracing::warn!(
                    attempts = attempt,
                    elapsed = ?start.elapsed(),
                    "retry exhausted"
                );
                Err(error)
            }
            None => {
                tracing::warn!("retry policy allowed no attempt");
                Err(C::Error::no_attempt())
            }
        }
    }
}
