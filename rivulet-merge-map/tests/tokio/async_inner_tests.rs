// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use rivulet_core::{from_future, from_iter, from_stream, BoxObservable, Observable, RivuletError};
use rivulet_merge_map::{MergeMap, MergeMapExt};
use rivulet_test_utils::{test_channel, test_error, wait_until, Recorder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Limits with asynchronous inner sources
// ============================================================================

#[tokio::test]
async fn test_async_inners_respect_limit() -> anyhow::Result<()> {
    // Arrange
    let gauge = Arc::new(Gauge::default());
    let tracked = gauge.clone();
    let operator = MergeMap::new(move |v: u64, _| {
        let gauge = tracked.clone();
        Ok(from_future(async move {
            gauge.enter();
            tokio::time::sleep(Duration::from_millis(5 + v % 3)).await;
            gauge.leave();
            Ok::<_, RivuletError>(v)
        }))
    })
    .with_limit(3)?;
    let recorder = Recorder::new();

    // Act
    from_iter(0..10u64)
        .merge_map_with(operator)
        .subscribe(recorder.observer());

    // Assert
    assert!(wait_until(|| recorder.is_completed(), 2000).await);
    let mut values = recorder.values();
    values.sort_unstable();
    assert_eq!(values, (0..10).collect::<Vec<_>>());
    assert!(gauge.peak.load(Ordering::SeqCst) <= 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_async_inners_respect_limit_on_worker_threads() -> anyhow::Result<()> {
    // Arrange
    let gauge = Arc::new(Gauge::default());
    let tracked = gauge.clone();
    let operator = MergeMap::new(move |v: u64, _| {
        let gauge = tracked.clone();
        Ok(from_future(async move {
            gauge.enter();
            tokio::time::sleep(Duration::from_millis(2)).await;
            gauge.leave();
            Ok::<_, RivuletError>(v * 2)
        }))
    })
    .with_limit(2)?;
    let recorder = Recorder::new();

    // Act
    from_iter(0..20u64)
        .merge_map_with(operator)
        .subscribe(recorder.observer());

    // Assert
    assert!(wait_until(|| recorder.is_completed(), 5000).await);
    assert_eq!(recorder.values().len(), 20);
    assert_eq!(recorder.completion_count(), 1);
    assert!(gauge.peak.load(Ordering::SeqCst) <= 2);
    Ok(())
}

#[tokio::test]
async fn test_async_inner_error_terminates_merge() {
    // Arrange
    let recorder = Recorder::<i32>::new();

    // Act
    from_iter(vec![1, 2])
        .merge_map(|v: i32, _| {
            Ok(from_future(async move {
                if v == 2 {
                    Err(test_error("async inner failed"))
                } else {
                    Ok(v)
                }
            }))
        })
        .subscribe(recorder.observer());

    // Assert
    assert!(wait_until(|| recorder.is_errored(), 1000).await);
    assert_eq!(recorder.terminal_count(), 1);
    assert!(!recorder.is_completed());
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_unsubscribe_cancels_pending_inner_stream() {
    // Arrange
    let (tx, rx) = test_channel::<i32>();
    let inner: BoxObservable<i32> = Arc::new(from_stream(rx));
    let recorder = Recorder::new();
    let subscription = from_iter(vec![()])
        .merge_map(move |_: (), _| Ok(Arc::clone(&inner)))
        .subscribe(recorder.observer());
    tx.unbounded_send(1).ok();
    assert!(wait_until(|| recorder.values() == vec![1], 1000).await);

    // Act
    subscription.unsubscribe();

    // Assert: the driving task dropped the receiver
    assert!(wait_until(|| tx.is_closed(), 1000).await);
    assert!(!recorder.is_completed());
}
