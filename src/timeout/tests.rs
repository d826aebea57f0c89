//! Tests for the asynchronous and timeout decorators.

use super::*;
use crate::{from_fn, ComputationExt, Error};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Sets its flag when dropped, i.e. when the work it lives in stops.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[derive(Clone, Default)]
struct Probe {
    stopped: Arc<AtomicBool>,
    completed: Arc<AtomicBool>,
}

impl Probe {
    /// A computation sleeping for the input number of milliseconds.
    fn sleeper(&self) -> impl Computation<u64, Output = u64, Error = Error> + Clone + 'static {
        let probe = self.clone();
        from_fn(move |ms: u64| {
            let probe = probe.clone();
            async move {
                let _flag = DropFlag(probe.stopped.clone());
                tokio::time::sleep(Duration::from_millis(ms)).await;
                probe.completed.store(true, Ordering::SeqCst);
                Ok::<_, Error>(ms)
            }
        })
    }

    fn stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }
}

fn current_pool() -> WorkerPool {
    WorkerPool::current().expect("inside a tokio runtime")
}

#[tokio::test]
async fn test_fast_result_returned_unchanged() {
    let probe = Probe::default();
    let bounded = Timeout::new(
        Async::with_pool(probe.sleeper(), current_pool()),
        Duration::from_millis(500),
    );

    assert_eq!(bounded.invoke(5).await.unwrap(), 5);
    assert!(probe.completed());
}

#[tokio::test]
async fn test_slow_result_times_out_and_cancels_worker() {
    let probe = Probe::default();
    let bounded = Timeout::new(
        Async::with_pool(probe.sleeper(), current_pool()),
        Duration::from_millis(100),
    );

    let err = bounded.invoke(200).await.unwrap_err();
    assert!(matches!(err, Error::Timeout(d) if d == Duration::from_millis(100)));

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(probe.stopped());
    assert!(!probe.completed());
}

#[tokio::test]
async fn test_worker_error_surfaces_before_bound() {
    let failing = from_fn(|_: ()| async { Err::<(), _>(Error::failed("worker broke")) });
    let bounded = failing.timeout(Duration::from_secs(5), current_pool());

    let err = bounded.invoke(()).await.unwrap_err();
    assert!(!err.is_timeout());
    assert_eq!(err.to_string(), "computation failed: worker broke");
}

#[tokio::test]
async fn test_dropping_caller_cancels_worker() {
    let probe = Probe::default();
    let bounded = probe
        .sleeper()
        .timeout(Duration::from_secs(10), current_pool());

    let outcome = tokio::time::timeout(Duration::from_millis(50), bounded.invoke(5_000)).await;
    assert!(outcome.is_err());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(probe.stopped());
    assert!(!probe.completed());
}

#[tokio::test]
async fn test_dedicated_pool_runs_work() {
    let probe = Probe::default();
    let bounded = Timeout::spawned(probe.sleeper(), Duration::from_millis(500)).unwrap();

    assert_eq!(bounded.invoke(10).await.unwrap(), 10);
    assert!(probe.completed());
}

#[tokio::test]
async fn test_dedicated_pool_times_out() {
    let probe = Probe::default();
    let bounded = Timeout::spawned(probe.sleeper(), Duration::from_millis(20)).unwrap();

    assert!(bounded.invoke(2_000).await.unwrap_err().is_timeout());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(probe.stopped());
    assert!(!probe.completed());
}

#[tokio::test]
async fn test_async_returns_before_work_finishes() {
    let probe = Probe::default();
    let spawned = Async::with_pool(probe.sleeper(), current_pool());

    let pending = spawned.invoke(100).await.unwrap();
    assert!(!pending.is_finished());
    assert!(!probe.completed());

    assert_eq!(pending.wait().await.unwrap(), 100);
    assert!(probe.completed());
}

#[tokio::test]
async fn test_explicit_cancel_yields_cancellation() {
    let probe = Probe::default();
    let spawned = Async::with_pool(probe.sleeper(), current_pool());

    let pending = spawned.invoke(5_000).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    pending.cancel();

    let err = pending.wait().await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(probe.stopped());
}

#[tokio::test]
async fn test_dropping_pending_result_cancels_work() {
    let probe = Probe::default();
    let spawned = Async::with_pool(probe.sleeper(), current_pool());

    let pending = spawned.invoke(5_000).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    drop(pending);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(probe.stopped());
    assert!(!probe.completed());
}

#[tokio::test]
async fn test_io_error_flavour_times_out_with_kind() {
    let probe = Probe::default();
    let bounded = probe
        .sleeper()
        .unchecked()
        .timeout(Duration::from_millis(10), current_pool());

    let err = bounded.invoke(1_000).await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::TimedOut);
}

#[tokio::test]
#[should_panic(expected = "worker exploded")]
async fn test_worker_panic_is_resumed_on_caller() {
    let exploding = from_fn(|_: ()| async {
        if true {
            panic!("worker exploded");
        }
        Ok::<(), Error>(())
    });
    let bounded = exploding.timeout(Duration::from_secs(1), current_pool());

    let _ = bounded.invoke(()).await;
}
