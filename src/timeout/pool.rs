//! Worker pools for running computations off the caller's task.

use std::future::Future;
use std::io;
use std::sync::Arc;

use tokio::runtime::{Builder, Handle, Runtime};

use crate::timeout::pending::PendingResult;

/// Where asynchronous invocations run: "submit a unit of work, get back a
/// [`PendingResult`]".
///
/// A pool is a cheap, cloneable handle to a tokio runtime. It either borrows a
/// runtime the host already runs ([`WorkerPool::current`],
/// [`WorkerPool::from_handle`]) or owns a dedicated single-worker runtime
/// ([`WorkerPool::dedicated`]), which is shut down in the background once the
/// last handle is dropped.
///
/// # Example
///
/// ```rust
/// use sturdy::{Error, WorkerPool};
///
/// # tokio_test::block_on(async {
/// let pool = WorkerPool::dedicated().unwrap();
/// let pending = pool.submit(async { Ok::<_, Error>(6 * 7) });
/// assert_eq!(pending.wait().await.unwrap(), 42);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct WorkerPool {
    handle: Handle,
    owned: Option<Arc<OwnedRuntime>>,
}

impl WorkerPool {
    /// A pool backed by its own runtime with a single worker thread.
    pub fn dedicated() -> io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("sturdy-worker")
            .enable_all()
            .build()?;
        tracing::debug!("started dedicated worker runtime");

        Ok(WorkerPool {
            handle: runtime.handle().clone(),
            owned: Some(Arc::new(OwnedRuntime {
                runtime: Some(runtime),
            })),
        })
    }

    /// A pool running work on the runtime of the calling task.
    ///
    /// Fails when called outside a tokio runtime.
    pub fn current() -> io::Result<Self> {
        Handle::try_current()
            .map(Self::from_handle)
            .map_err(io::Error::other)
    }

    /// A pool running work on the given runtime.
    pub fn from_handle(handle: Handle) -> Self {
        WorkerPool {
            handle,
            owned: None,
        }
    }

    /// Whether this pool owns its runtime.
    pub fn is_dedicated(&self) -> bool {
        self.owned.is_some()
    }

    /// Start `work` on the pool without waiting for it.
    ///
    /// The work starts running immediately. Dropping the returned handle
    /// before it completes aborts the work.
    pub fn submit<F, Y, E>(&self, work: F) -> PendingResult<Y, E>
    where
        F: Future<Output = Result<Y, E>> + Send + 'static,
        Y: Send + 'static,
        E: Send + 'static,
    {
        PendingResult::new(self.handle.spawn(work))
    }
}

/// A runtime owned by one or more pool handles.
#[derive(Debug)]
struct OwnedRuntime {
    runtime: Option<Runtime>,
}

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            // Dropping a runtime from async context panics; shut down without blocking.
            runtime.shutdown_background();
            tracing::debug!("shut down dedicated worker runtime");
        }
    }
}
