//! Computation trait definition - the contract every decorator exposes.
//!
//! A computation is invoked with an input of type `X` and produces either an
//! `Output` or an `Error`. Invocation may have side effects and is not assumed
//! to be idempotent or pure.
//!
//! # Design Philosophy
//!
//! This trait follows the same shape as `Future` and `Iterator` adapters:
//! - Decorators are concrete types wrapping another computation
//! - Any decorator can wrap any other, since they all expose this contract
//! - Use [`boxed`](crate::ComputationExt::boxed) when type erasure is needed
//!
//! Multi-argument computations take a tuple as `X`.

use std::future::Future;
use std::sync::Arc;

/// A deferred, possibly side-effecting unit of work.
///
/// Computations are borrowed for invocation (`&self`), so a single instance can
/// be invoked arbitrarily many times, concurrently if it is shared.
///
/// # Type Parameters
///
/// * `X` - The input the computation is applied to
///
/// # Example
///
/// ```rust
/// use sturdy::{Computation, Error};
///
/// struct Double;
///
/// impl Computation<i32> for Double {
///     type Output = i32;
///     type Error = Error;
///
///     async fn invoke(&self, input: i32) -> Result<i32, Error> {
///         Ok(input * 2)
///     }
/// }
///
/// # tokio_test::block_on(async {
/// assert_eq!(Double.invoke(21).await.unwrap(), 42);
/// # });
/// ```
pub trait Computation<X>: Send + Sync {
    /// The value produced on success.
    type Output: Send;

    /// The failure produced when the computation cannot complete.
    type Error: Send;

    /// Apply the computation to `input`.
    ///
    /// Awaiting the returned future runs the computation on the caller's task.
    /// Dropping it before completion cancels the invocation.
    fn invoke(&self, input: X) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

impl<X, C> Computation<X> for Arc<C>
where
    C: Computation<X>,
{
    type Output = C::Output;
    type Error = C::Error;

    fn invoke(&self, input: X) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send {
        (**self).invoke(input)
    }
}
