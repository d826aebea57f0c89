//! BoxComputation - type-erased computation for opt-in boxing.
//!
//! Use `BoxComputation` when you need to:
//! - Store differently decorated computations in a collection
//! - Return different decorator stacks from match arms
//!
//! Every invocation allocates one boxed future.

use std::future::Future;

use futures::future::{BoxFuture, FutureExt};

use crate::computation::trait_def::Computation;

/// Object-safe mirror of [`Computation`].
trait DynComputation<X, Y, E>: Send + Sync {
    fn invoke_boxed(&self, input: X) -> BoxFuture<'_, Result<Y, E>>;
}

impl<X, C> DynComputation<X, C::Output, C::Error> for C
where
    C: Computation<X>,
    X: 'static,
{
    fn invoke_boxed(&self, input: X) -> BoxFuture<'_, Result<C::Output, C::Error>> {
        self.invoke(input).boxed()
    }
}

/// A type-erased computation.
///
/// # Example
///
/// ```rust
/// use sturdy::{from_sync, BoxComputation, Computation, ComputationExt, Error};
///
/// let stacks: Vec<BoxComputation<u32, u32, Error>> = vec![
///     from_sync(|x: u32| Ok::<_, Error>(x + 1)).boxed(),
///     from_sync(|x: u32| Ok::<_, Error>(x * 10)).sticky().boxed(),
/// ];
///
/// # tokio_test::block_on(async {
/// let mut outputs = Vec::new();
/// for stack in &stacks {
///     outputs.push(stack.invoke(4).await.unwrap());
/// }
/// assert_eq!(outputs, vec![5, 40]);
/// # });
/// ```
pub struct BoxComputation<X, Y, E> {
    inner: Box<dyn DynComputation<X, Y, E>>,
}

impl<X, Y, E> std::fmt::Debug for BoxComputation<X, Y, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxComputation")
            .field("inner", &"<computation>")
            .finish()
    }
}

impl<X, Y, E> BoxComputation<X, Y, E>
where
    X: 'static,
{
    /// Erase the type of any computation.
    pub fn new<C>(origin: C) -> Self
    where
        C: Computation<X, Output = Y, Error = E> + 'static,
    {
        BoxComputation {
            inner: Box::new(origin),
        }
    }
}

impl<X, Y, E> Computation<X> for BoxComputation<X, Y, E>
where
    X: 'static,
    Y: Send,
    E: Send,
{
    type Output = Y;
    type Error = E;

    fn invoke(&self, input: X) -> impl Future<Output = Result<Y, E>> + Send {
        self.inner.invoke_boxed(input)
    }
}
