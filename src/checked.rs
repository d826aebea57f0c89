//! Error-kind translation: make failures surface as one declared kind.
//!
//! - [`Checked`]: failures already of the target type pass through untouched;
//!   anything else goes through a [`Translator`] exactly once
//! - [`Unchecked`]: `Checked` specialized to `std::io::Error`, the crate's
//!   catch-all runtime failure kind
//!
//! Translation never wraps a failure twice: the check is done on the concrete
//! type of the failure, so stacking `Checked` layers with the same target is a
//! no-op after the first. Panics are never caught.
//!
//! # Example
//!
//! ```rust
//! use sturdy::{from_sync, BoxError, Computation, ComputationExt};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("storage failure")]
//! struct StorageError {
//!     #[source]
//!     cause: Option<BoxError>,
//! }
//!
//! # tokio_test::block_on(async {
//! let parse = from_sync(|s: &'static str| s.parse::<u16>())
//!     .checked(|cause| StorageError { cause: Some(cause) });
//!
//! let err = parse.invoke("not a number").await.unwrap_err();
//! assert!(err.cause.is_some());
//! # });
//! ```

use std::error::Error as StdError;
use std::io;
use std::marker::PhantomData;

use crate::computation::Computation;
use crate::error::BoxError;

/// Maps an arbitrary failure into the target error kind `T`.
///
/// Implemented for any `Fn(BoxError) -> T`.
pub trait Translator<T>: Send + Sync {
    /// Translate `error` into the target kind.
    fn translate(&self, error: BoxError) -> T;
}

impl<T, F> Translator<T> for F
where
    F: Fn(BoxError) -> T + Send + Sync,
{
    fn translate(&self, error: BoxError) -> T {
        self(error)
    }
}

/// Relabels every failure of a computation as the target kind `T`.
///
/// Created by [`ComputationExt::checked`](crate::ComputationExt::checked).
pub struct Checked<C, T, F> {
    origin: C,
    translator: F,
    _target: PhantomData<fn() -> T>,
}

impl<C, T, F> Checked<C, T, F> {
    /// Translate failures of `origin` with `translator`.
    pub fn new(origin: C, translator: F) -> Self {
        Checked {
            origin,
            translator,
            _target: PhantomData,
        }
    }

    /// The wrapped computation.
    pub fn inner(&self) -> &C {
        &self.origin
    }
}

impl<C: Clone, T, F: Clone> Clone for Checked<C, T, F> {
    fn clone(&self) -> Self {
        Checked::new(self.origin.clone(), self.translator.clone())
    }
}

impl<C: std::fmt::Debug, T, F> std::fmt::Debug for Checked<C, T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checked")
            .field("origin", &self.origin)
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<X, C, T, F> Computation<X> for Checked<C, T, F>
where
    C: Computation<X>,
    C::Error: Into<BoxError>,
    T: StdError + Send + Sync + 'static,
    F: Translator<T>,
    X: Send,
{
    type Output = C::Output;
    type Error = T;

    async fn invoke(&self, input: X) -> Result<C::Output, T> {
        self.origin
            .invoke(input)
            .await
            .map_err(|error| translate_once(error.into(), &self.translator))
    }
}

fn translate_once<T, F>(error: BoxError, translator: &F) -> T
where
    T: StdError + Send + Sync + 'static,
    F: Translator<T>,
{
    match error.downcast::<T>() {
        Ok(already) => *already,
        Err(other) => {
            tracing::trace!(target_kind = std::any::type_name::<T>(), "translating failure");
            translator.translate(other)
        }
    }
}

/// Surfaces every failure as a `std::io::Error`.
///
/// An `io::Error` from the wrapped computation passes through unchanged; any
/// other failure becomes `io::ErrorKind::Other` carrying the original as its
/// inner error.
pub type Unchecked<C> = Checked<C, io::Error, fn(BoxError) -> io::Error>;

/// Wrap `origin` so that its failures surface as `std::io::Error`.
pub fn unchecked<C>(origin: C) -> Unchecked<C> {
    Checked::new(origin, into_io_error as fn(BoxError) -> io::Error)
}

fn into_io_error(error: BoxError) -> io::Error {
    io::Error::other(error)
}
