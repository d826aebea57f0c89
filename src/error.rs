//! Error taxonomy shared by every decorator.
//!
//! Decorators never invent their own error wrappers. Instead they work inside
//! the wrapped computation's error type, and use the [`Fault`] trait to
//! manufacture or recognise the handful of failure kinds they care about:
//!
//! - **Cancellation**: the calling or worker context was asked to stop
//! - **Timeout**: a bound elapsed before completion
//! - **Policy violation**: a retry policy permitted zero attempts
//!
//! Anything else is a plain computation failure, owned by the caller.
//!
//! [`Error`] is the ready-made error type implementing [`Fault`]; `std::io::Error`
//! implements it too so that [`Unchecked`](crate::Unchecked) computations compose
//! with [`Retry`](crate::Retry) and [`Timeout`](crate::Timeout) directly.
//!
//! # Examples
//!
//! ```
//! use sturdy::{Error, Fault};
//! use std::time::Duration;
//!
//! let err = Error::failed("connection refused");
//! assert!(!err.is_cancelled());
//! assert!(err.to_string().contains("connection refused"));
//!
//! let err = Error::timed_out(Duration::from_millis(50));
//! assert!(err.is_timeout());
//! ```

use std::io;
use std::time::Duration;

/// A type-erased, thread-safe error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The crate's tagged failure.
///
/// Carries an optional underlying cause (only [`Error::Failed`] has one).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The wrapped computation failed.
    #[error("computation failed: {0}")]
    Failed(#[source] BoxError),

    /// The computation was cancelled before it produced a result.
    #[error("computation was cancelled")]
    Cancelled,

    /// The computation did not complete within the bound.
    #[error("computation timed out after {0:?}")]
    Timeout(Duration),

    /// The retry policy allowed zero attempts.
    #[error("retry policy violation: no attempt was made")]
    NoAttempt,
}

impl Error {
    /// Wrap a computation failure.
    pub fn failed(cause: impl Into<BoxError>) -> Self {
        Error::Failed(cause.into())
    }

    /// Returns true if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    /// Returns true if this is a policy violation.
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, Error::NoAttempt)
    }

    /// The underlying cause of a computation failure, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Failed(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }
}

/// Failure kinds a decorator needs to create or detect in a foreign error type.
///
/// # Examples
///
/// ```
/// use sturdy::Fault;
/// use std::io;
///
/// let err = <io::Error as Fault>::cancelled();
/// assert_eq!(err.kind(), io::ErrorKind::Interrupted);
/// assert!(err.is_cancelled());
/// ```
pub trait Fault: Sized {
    /// A failure signalling that the computation was cancelled.
    fn cancelled() -> Self;

    /// A failure signalling that `after` elapsed before completion.
    fn timed_out(after: Duration) -> Self;

    /// A failure signalling that a retry policy permitted no attempt at all.
    fn no_attempt() -> Self;

    /// Whether this failure means "stop": cancellation is never retried.
    fn is_cancelled(&self) -> bool;
}

impl Fault for Error {
    fn cancelled() -> Self {
        Error::Cancelled
    }

    fn timed_out(after: Duration) -> Self {
        Error::Timeout(after)
    }

    fn no_attempt() -> Self {
        Error::NoAttempt
    }

    fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl Fault for io::Error {
    fn cancelled() -> Self {
        io::Error::new(io::ErrorKind::Interrupted, "computation was cancelled")
    }

    fn timed_out(after: Duration) -> Self {
        io::Error::new(
            io::ErrorKind::TimedOut,
            format!("computation timed out after {after:?}"),
        )
    }

    fn no_attempt() -> Self {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "retry policy violation: no attempt was made",
        )
    }

    fn is_cancelled(&self) -> bool {
        self.kind() == io::ErrorKind::Interrupted
    }
}
