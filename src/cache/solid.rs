//! Thread-safe memoization: a [`Sticky`] cache under a [`Synchronized`] lock.

use std::hash::Hash;

use crate::cache::sticky::Sticky;
use crate::computation::Computation;
use crate::lock::{LockToken, Synchronized};

/// A thread-safe, bounded, memoizing computation.
///
/// This is the fixed composition `Synchronized(Sticky(origin, max_size))`. The
/// lock is the outermost layer, so every invocation (hit or miss) is fully
/// serialized: a key is computed at most once even under concurrent callers,
/// and the cache bookkeeping is never observed mid-update.
///
/// The price is all inter-key parallelism: requests for different keys also
/// wait on each other.
///
/// # Example
///
/// ```rust
/// use sturdy::testing::Counted;
/// use sturdy::{from_fn, Computation, Error, Solid};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let origin = Counted::new(from_fn(|n: u64| async move { Ok::<_, Error>(n * n) }));
/// let squares = Arc::new(Solid::new(origin.clone(), 10));
///
/// let calls = (0..5).map(|_| {
///     let squares = squares.clone();
///     async move { squares.invoke(12).await }
/// });
/// for result in futures::future::join_all(calls).await {
///     assert_eq!(result.unwrap(), 144);
/// }
/// assert_eq!(origin.calls(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct Solid<C, K, V> {
    inner: Synchronized<Sticky<C, K, V>>,
}

impl<C, K, V> Solid<C, K, V> {
    /// Memoize at most `max_size` inputs behind a lock owned by this cache.
    pub fn new(origin: C, max_size: usize) -> Self {
        Solid {
            inner: Synchronized::new(Sticky::bounded(origin, max_size)),
        }
    }

    /// Memoize every distinct input behind a lock owned by this cache.
    pub fn unbounded(origin: C) -> Self {
        Solid {
            inner: Synchronized::new(Sticky::new(origin)),
        }
    }

    /// Memoize behind a shared lock.
    pub fn with_token(origin: C, max_size: Option<usize>, token: LockToken) -> Self {
        Solid {
            inner: Synchronized::with_token(Sticky::with_max_size(origin, max_size), token),
        }
    }

    /// The lock serializing this cache.
    pub fn token(&self) -> &LockToken {
        self.inner.token()
    }

    /// The memoizing layer, for inspection.
    pub fn cache(&self) -> &Sticky<C, K, V> {
        self.inner.inner()
    }
}

impl<C, K, V> Computation<K> for Solid<C, K, V>
where
    C: Computation<K, Output = V>,
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    type Output = V;
    type Error = C::Error;

    fn invoke(&self, input: K) -> impl std::future::Future<Output = Result<V, C::Error>> + Send {
        self.inner.invoke(input)
    }
}
