//! The memoizing decorator.

use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::cache::store::FifoStore;
use crate::computation::Computation;

/// Memoizes the result of a computation per distinct input.
///
/// The input itself is the cache key. A key, once stored, is never recomputed
/// unless it was evicted and is requested again. Failures are not cached.
///
/// With a bound, the store evicts the oldest *inserted* key first (see
/// [`FifoStore`]): a frequently requested old key is evicted exactly as readily
/// as one that was never reused. Callers needing LRU semantics must not rely on
/// this decorator.
///
/// # Concurrency
///
/// The store is only touched in short critical sections; the lock is never held
/// while the wrapped computation runs. Two concurrent callers asking for the
/// same missing key may therefore both compute it. Wrap in
/// [`Synchronized`](crate::Synchronized), or use [`Solid`](crate::Solid), for
/// at-most-once computation per key.
///
/// # Example
///
/// ```rust
/// use sturdy::testing::Counted;
/// use sturdy::{from_sync, Computation, Error, Sticky};
///
/// # tokio_test::block_on(async {
/// let origin = Counted::new(from_sync(|(a, b): (u32, u32)| Ok::<_, Error>(a + b)));
/// let sum = Sticky::bounded(origin.clone(), 2);
///
/// assert_eq!(sum.invoke((1, 2)).await.unwrap(), 3);
/// assert_eq!(sum.invoke((1, 2)).await.unwrap(), 3);
/// assert_eq!(origin.calls(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct Sticky<C, K, V> {
    origin: C,
    store: Mutex<FifoStore<K, V>>,
}

impl<C, K, V> Sticky<C, K, V> {
    /// Memoize every distinct input, without bound.
    pub fn new(origin: C) -> Self {
        Sticky {
            origin,
            store: Mutex::new(FifoStore::unbounded()),
        }
    }

    /// Memoize at most `max_size` inputs, evicting oldest-inserted first.
    pub fn bounded(origin: C, max_size: usize) -> Self {
        Sticky {
            origin,
            store: Mutex::new(FifoStore::bounded(max_size)),
        }
    }

    /// Memoize with an optional bound.
    pub fn with_max_size(origin: C, max_size: Option<usize>) -> Self {
        match max_size {
            Some(max) => Self::bounded(origin, max),
            None => Self::new(origin),
        }
    }

    /// Number of memoized inputs.
    pub fn len(&self) -> usize {
        self.lock_store().len()
    }

    /// Whether nothing is memoized yet.
    pub fn is_empty(&self) -> bool {
        self.lock_store().is_empty()
    }

    /// Forget every memoized result.
    pub fn clear(&self) {
        self.lock_store().clear();
    }

    /// The wrapped computation.
    pub fn inner(&self) -> &C {
        &self.origin
    }

    fn lock_store(&self) -> MutexGuard<'_, FifoStore<K, V>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C, K, V> Sticky<C, K, V>
where
    K: Hash + Eq + Clone,
{
    /// Whether `key` is memoized.
    pub fn contains(&self, key: &K) -> bool {
        self.lock_store().contains(key)
    }

    /// Memoized keys in insertion order, oldest first.
    pub fn keys(&self) -> Vec<K> {
        self.lock_store().keys().cloned().collect()
    }
}

impl<C, K, V> Computation<K> for Sticky<C, K, V>
where
    C: Computation<K, Output = V>,
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    type Output = V;
    type Error = C::Error;

    async fn invoke(&self, input: K) -> Result<V, C::Error> {
        let cached = self.lock_store().get(&input).cloned();
        if let Some(value) = cached {
            tracing::trace!("cache hit");
            return Ok(value);
        }

        tracing::trace!("cache miss");
        let value = self.origin.invoke(input.clone()).await?;

        let evicted = self.lock_store().insert(input, value.clone());
        if !evicted.is_empty() {
            tracing::debug!(evicted = evicted.len(), "evicted oldest cache entries");
        }
        Ok(value)
    }
}
