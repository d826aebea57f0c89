//! Mutual exclusion: lock tokens and the synchronizing decorator.
//!
//! A [`Synchronized`] decorator serializes every invocation of the computation
//! it wraps behind a [`LockToken`]. By default each decorator owns a fresh
//! token; passing the same token to two decorators makes them coordinate, for
//! example to protect a resource reached through two different call paths.
//!
//! # Reentrancy
//!
//! The lock is **not reentrant**. A computation that, while running under a
//! token, invokes another computation synchronized on the same token waits for
//! itself forever. Async tasks have no stable thread identity to re-enter on,
//! so nested stacks sharing a token must be restructured rather than relying on
//! re-acquisition.
//!
//! # Example
//!
//! ```rust
//! use sturdy::{from_sync, Computation, Error, LockToken, Synchronized};
//!
//! # tokio_test::block_on(async {
//! let token = LockToken::new();
//! let read = Synchronized::with_token(from_sync(|_: ()| Ok::<_, Error>("read")), token.clone());
//! let write = Synchronized::with_token(from_sync(|_: ()| Ok::<_, Error>("write")), token.clone());
//!
//! assert!(read.token().same_lock(write.token()));
//! assert_eq!(read.invoke(()).await.unwrap(), "read");
//! assert_eq!(write.invoke(()).await.unwrap(), "write");
//! # });
//! ```

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::computation::Computation;

/// An opaque mutual-exclusion handle.
///
/// Clones refer to the same lock.
#[derive(Debug, Clone, Default)]
pub struct LockToken {
    lock: Arc<Mutex<()>>,
}

impl LockToken {
    /// A fresh, unshared lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether two tokens guard the same lock.
    pub fn same_lock(&self, other: &LockToken) -> bool {
        Arc::ptr_eq(&self.lock, &other.lock)
    }

    /// Whether the lock is currently held.
    pub fn is_locked(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    /// Wait for the lock. Released when the guard drops.
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

/// Serializes invocations of a computation behind a [`LockToken`].
///
/// The lock is acquired before the wrapped computation runs and released on
/// every exit path: success, failure, or the caller dropping the future.
/// Errors pass through unchanged. Waiters are served in FIFO order by tokio's
/// mutex, but no fairness between callers is promised beyond that.
#[derive(Debug, Clone)]
pub struct Synchronized<C> {
    origin: C,
    token: LockToken,
}

impl<C> Synchronized<C> {
    /// Serialize behind a lock owned by this decorator.
    pub fn new(origin: C) -> Self {
        Self::with_token(origin, LockToken::new())
    }

    /// Serialize behind a shared lock.
    pub fn with_token(origin: C, token: LockToken) -> Self {
        Synchronized { origin, token }
    }

    /// The lock this decorator serializes on.
    pub fn token(&self) -> &LockToken {
        &self.token
    }

    /// The wrapped computation.
    pub fn inner(&self) -> &C {
        &self.origin
    }
}

impl<X, C> Computation<X> for Synchronized<C>
where
    C: Computation<X>,
    X: Send,
{
    type Output = C::Output;
    type Error = C::Error;

    async fn invoke(&self, input: X) -> Result<C::Output, C::Error> {
        let _guard = self.token.acquire().await;
        self.origin.invoke(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Counted;
    use crate::{assert_invoked, from_fn, from_sync, Error};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn overlap_probe(
        active: Arc<AtomicU32>,
        peak: Arc<AtomicU32>,
    ) -> impl Computation<u64, Output = (), Error = Error> + Clone {
        from_fn(move |ms: u64| {
            let active = active.clone();
            let peak = peak.clone();
            async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(ms)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, Error>(())
            }
        })
    }

    #[test]
    fn test_default_tokens_are_distinct() {
        let a = Synchronized::new(from_sync(|_: ()| Ok::<_, Error>(())));
        let b = Synchronized::new(from_sync(|_: ()| Ok::<_, Error>(())));
        assert!(!a.token().same_lock(b.token()));
        assert!(a.token().same_lock(&a.token().clone()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_invocations_are_serialized() {
        let active = Arc::new(AtomicU32::new(0));
        let peak = Arc::new(AtomicU32::new(0));
        let sync = Arc::new(Synchronized::new(overlap_probe(active, peak.clone())));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let sync = sync.clone();
                tokio::spawn(async move { sync.invoke(5).await })
            })
            .collect();
        for task in futures::future::join_all(tasks).await {
            task.unwrap().unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_token_serializes_two_decorators() {
        let active = Arc::new(AtomicU32::new(0));
        let peak = Arc::new(AtomicU32::new(0));
        let probe = overlap_probe(active, peak.clone());
        let token = LockToken::new();
        let left = Arc::new(Synchronized::with_token(probe.clone(), token.clone()));
        let right = Arc::new(Synchronized::with_token(probe, token));

        let mut tasks = Vec::new();
        for _ in 0..4 {
            let left = left.clone();
            let right = right.clone();
            tasks.push(tokio::spawn(async move { left.invoke(5).await }));
            tasks.push(tokio::spawn(async move { right.invoke(5).await }));
        }
        for task in futures::future::join_all(tasks).await {
            task.unwrap().unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_independent_tokens_may_overlap() {
        let active = Arc::new(AtomicU32::new(0));
        let peak = Arc::new(AtomicU32::new(0));
        let probe = overlap_probe(active, peak.clone());
        let left = Arc::new(Synchronized::new(probe.clone()));
        let right = Arc::new(Synchronized::new(probe));

        let l = tokio::spawn({
            let left = left.clone();
            async move { left.invoke(100).await }
        });
        let r = tokio::spawn({
            let right = right.clone();
            async move { right.invoke(100).await }
        });
        l.await.unwrap().unwrap();
        r.await.unwrap().unwrap();

        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lock_released_after_failure() {
        let sync = Synchronized::new(from_sync(|fail: bool| {
            if fail {
                Err(Error::failed("boom"))
            } else {
                Ok(())
            }
        }));

        assert!(sync.invoke(true).await.is_err());
        assert!(!sync.token().is_locked());
        assert!(sync.invoke(false).await.is_ok());
    }

    #[tokio::test]
    async fn test_lock_released_when_caller_dropped() {
        let sync = Synchronized::new(from_fn(|_: ()| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, Error>(())
        }));

        let outcome = tokio::time::timeout(Duration::from_millis(20), sync.invoke(())).await;

        assert!(outcome.is_err());
        assert!(!sync.token().is_locked());
    }

    #[tokio::test]
    async fn test_nested_same_token_is_not_reentrant() {
        let token = LockToken::new();
        let innermost = Counted::new(from_sync(|_: ()| Ok::<_, Error>(())));
        let inner = Arc::new(Synchronized::with_token(innermost.clone(), token.clone()));
        let outer = Synchronized::with_token(
            from_fn(move |_: ()| {
                let inner = inner.clone();
                async move { inner.invoke(()).await }
            }),
            token.clone(),
        );

        let outcome = tokio::time::timeout(Duration::from_millis(50), outer.invoke(())).await;

        assert!(outcome.is_err());
        assert_invoked!(innermost, 0);
        assert!(!token.is_locked());
    }
}
