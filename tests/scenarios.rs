//! End-to-end scenarios for each decorator and for stacks of them.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sturdy::prelude::*;
use sturdy::testing::{Counted, FailTimes};
use sturdy::{assert_invoked, BoxComputation, BoxError, Retry, Solid, Sticky, Timeout};

#[tokio::test]
async fn retry_fails_twice_then_succeeds() {
    let flaky = FailTimes::new(2);
    let retry = Retry::times(flaky.clone(), 3);

    assert_eq!(retry.invoke(()).await.unwrap(), 3);
    assert_invoked!(flaky, 3);
}

#[tokio::test]
async fn retry_always_failing_raises_third_error() {
    let broken = FailTimes::always();
    let retry = Retry::times(broken.clone(), 3);

    let err = retry.invoke(()).await.unwrap_err();

    assert_eq!(err.cause().unwrap().to_string(), "failure #3");
    assert_invoked!(broken, 3);
}

#[tokio::test]
async fn sticky_bounded_keeps_last_two_keys() {
    let origin = Counted::new(from_sync(|key: char| Ok::<_, Error>(key as u32)));
    let sticky = Sticky::bounded(origin.clone(), 2);

    for key in ['A', 'B', 'C'] {
        sticky.invoke(key).await.unwrap();
    }

    assert_eq!(sticky.keys(), vec!['B', 'C']);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn solid_concurrent_callers_share_one_computation() {
    let counter = Arc::new(AtomicU32::new(0));
    let origin = from_fn({
        let counter = counter.clone();
        move |_key: u32| {
            let counter = counter.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok::<_, Error>(counter.fetch_add(1, Ordering::SeqCst) + 1)
            }
        }
    });
    let solid = Arc::new(Solid::new(origin, 10));

    let callers: Vec<_> = (0..10)
        .map(|_| {
            let solid = solid.clone();
            tokio::spawn(async move { solid.invoke(42).await })
        })
        .collect();
    let results: Vec<u32> = futures::future::join_all(callers)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|&r| r == 1));
}

#[tokio::test]
async fn timeout_cancels_slow_worker() {
    let finished = Arc::new(AtomicBool::new(false));
    let sleepy = from_fn({
        let finished = finished.clone();
        move |_: ()| {
            let finished = finished.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                finished.store(true, Ordering::SeqCst);
                Ok::<_, Error>(())
            }
        }
    });
    let bounded = Timeout::spawned(sleepy, Duration::from_millis(100)).unwrap();

    let err = bounded.invoke(()).await.unwrap_err();
    assert!(err.is_timeout());

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(!finished.load(Ordering::SeqCst));
}

#[derive(Debug, thiserror::Error)]
#[error("kind x")]
struct KindX {
    #[source]
    cause: Option<BoxError>,
}

#[tokio::test]
async fn checked_does_not_double_wrap() {
    let throws_x = from_sync(|_: ()| Err::<(), _>(KindX { cause: None }));
    let checked = throws_x.checked(|cause| KindX { cause: Some(cause) });

    let err = checked.invoke(()).await.unwrap_err();
    assert!(err.cause.is_none());
}

#[tokio::test]
async fn retry_outside_timeout_retries_each_timeout() {
    let attempts = Arc::new(AtomicU32::new(0));
    let slow_then_fast = from_fn({
        let attempts = attempts.clone();
        move |_: ()| {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
                Ok::<_, Error>(n)
            }
        }
    });

    let stack = slow_then_fast
        .timeout(Duration::from_millis(30), WorkerPool::current().unwrap())
        .retry(RetryPolicy::attempts(3));

    assert_eq!(stack.invoke(()).await.unwrap(), 2);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_gives_up_on_cancellation() {
    let origin = Counted::new(from_fn(|_: ()| async { Err::<(), _>(Error::Cancelled) }));
    let retry = origin.clone().retry(RetryPolicy::attempts(5));

    assert!(retry.invoke(()).await.unwrap_err().is_cancelled());
    assert_invoked!(origin, 1);
}

#[tokio::test]
async fn unchecked_failures_are_retried() {
    let origin = Counted::new(from_fn(|_: ()| async { Err::<(), _>(Error::failed("boom")) }));
    let stack = origin.clone().unchecked().retry(RetryPolicy::attempts(4));

    let err = stack.invoke(()).await.unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::Other);
    assert_invoked!(origin, 4);
}

#[tokio::test]
async fn shared_token_coordinates_cache_and_writer() {
    let token = LockToken::new();
    let value = Arc::new(AtomicU32::new(10));

    let reader = from_fn({
        let value = value.clone();
        move |_: ()| {
            let value = value.clone();
            async move { Ok::<_, Error>(value.load(Ordering::SeqCst)) }
        }
    })
    .synchronized_with(token.clone());
    let writer = from_fn({
        let value = value.clone();
        move |v: u32| {
            let value = value.clone();
            async move {
                value.store(v, Ordering::SeqCst);
                Ok::<_, Error>(())
            }
        }
    })
    .synchronized_with(token.clone());

    assert!(reader.token().same_lock(writer.token()));
    writer.invoke(99).await.unwrap();
    assert_eq!(reader.invoke(()).await.unwrap(), 99);
    assert!(!token.is_locked());
}

#[tokio::test]
async fn boxed_stacks_share_one_type() {
    let pool = WorkerPool::current().unwrap();
    let stacks: Vec<BoxComputation<u32, u32, Error>> = vec![
        from_sync(|x: u32| Ok::<_, Error>(x)).boxed(),
        from_sync(|x: u32| Ok::<_, Error>(x + 1)).solid(4).boxed(),
        from_fn(|x: u32| async move { Ok::<_, Error>(x * 2) })
            .timeout(Duration::from_secs(1), pool)
            .boxed(),
    ];

    let mut outputs = Vec::new();
    for stack in &stacks {
        outputs.push(stack.invoke(5).await.unwrap());
    }
    assert_eq!(outputs, vec![5, 6, 10]);
}

#[tokio::test]
async fn discarded_output_becomes_action() {
    let origin = Counted::new(from_sync(|x: u8| Ok::<_, Error>(x)));
    let action = origin.clone().discard().retry(RetryPolicy::default());

    action.invoke(1).await.unwrap();
    assert_invoked!(origin, 1);
}
