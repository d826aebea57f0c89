//! Closure adapters: turn plain functions into computations.

use std::future::Future;

use crate::computation::trait_def::Computation;

/// Computation from an async function.
///
/// Created by [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

impl<F> std::fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromFn").field("f", &"<function>").finish()
    }
}

impl<X, F, Fut, Y, E> Computation<X> for FromFn<F>
where
    F: Fn(X) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Y, E>> + Send,
    Y: Send,
    E: Send,
{
    type Output = Y;
    type Error = E;

    fn invoke(&self, input: X) -> impl Future<Output = Result<Y, E>> + Send {
        (self.f)(input)
    }
}

/// Build a computation from an async function.
///
/// # Example
///
/// ```rust
/// use sturdy::{from_fn, Computation, Error};
///
/// let greet = from_fn(|name: String| async move {
///     Ok::<_, Error>(format!("hello, {name}"))
/// });
///
/// # tokio_test::block_on(async {
/// assert_eq!(greet.invoke("world".to_string()).await.unwrap(), "hello, world");
/// # });
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn { f }
}

/// Computation from a synchronous function.
///
/// Created by [`from_sync`]. The function runs inline on the caller's task,
/// so it should not block for long.
#[derive(Clone)]
pub struct FromSync<F> {
    f: F,
}

impl<F> std::fmt::Debug for FromSync<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromSync").field("f", &"<function>").finish()
    }
}

impl<X, F, Y, E> Computation<X> for FromSync<F>
where
    F: Fn(X) -> Result<Y, E> + Send + Sync,
    X: Send,
    Y: Send,
    E: Send,
{
    type Output = Y;
    type Error = E;

    async fn invoke(&self, input: X) -> Result<Y, E> {
        (self.f)(input)
    }
}

/// Build a computation from a synchronous function returning a `Result`.
///
/// # Example
///
/// ```rust
/// use sturdy::{from_sync, Computation};
///
/// let parse = from_sync(|s: &'static str| s.parse::<u32>());
///
/// # tokio_test::block_on(async {
/// assert_eq!(parse.invoke("42").await.unwrap(), 42);
/// assert!(parse.invoke("forty-two").await.is_err());
/// # });
/// ```
pub fn from_sync<F>(f: F) -> FromSync<F> {
    FromSync { f }
}

/// A result-producing computation turned into an action.
///
/// The output is discarded once the wrapped computation succeeds; failures
/// pass through unchanged.
#[derive(Debug, Clone)]
pub struct Discard<C> {
    pub(crate) origin: C,
}

impl<X, C> Computation<X> for Discard<C>
where
    C: Computation<X>,
    X: Send,
{
    type Output = ();
    type Error = C::Error;

    async fn invoke(&self, input: X) -> Result<(), C::Error> {
        self.origin.invoke(input).await.map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_from_fn_invokes_closure_each_time() {
        let square = from_fn(|x: u64| async move { Ok::<_, Error>(x * x) });

        assert_eq!(square.invoke(3).await.unwrap(), 9);
        assert_eq!(square.invoke(4).await.unwrap(), 16);
    }

    #[tokio::test]
    async fn test_from_sync_propagates_error() {
        let half = from_sync(|x: i32| {
            if x % 2 == 0 {
                Ok(x / 2)
            } else {
                Err(Error::failed(format!("{x} is odd")))
            }
        });

        assert_eq!(half.invoke(8).await.unwrap(), 4);
        let err = half.invoke(7).await.unwrap_err();
        assert!(err.to_string().contains("7 is odd"));
    }

    #[tokio::test]
    async fn test_discard_drops_output_keeps_error() {
        let action = Discard {
            origin: from_sync(|x: i32| if x > 0 { Ok(x) } else { Err("negative") }),
        };

        assert_eq!(action.invoke(5).await, Ok(()));
        assert_eq!(action.invoke(-1).await, Err("negative"));
    }
}
