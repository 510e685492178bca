// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use futures::stream;
use rivulet_core::{from_future, from_stream, Observable, RivuletError, StreamItem};
use rivulet_test_utils::{
    test_channel, test_channel_with_errors, test_error, wait_until, ErrorInjectingStream, Recorder,
};
use std::time::Duration;

// ============================================================================
// from_stream
// ============================================================================

#[tokio::test]
async fn test_from_stream_emits_values_and_completes() {
    // Arrange
    let source = from_stream(stream::iter(vec![
        StreamItem::Value(1),
        StreamItem::Value(2),
    ]));
    let recorder = Recorder::new();

    // Act
    source.subscribe(recorder.observer());

    // Assert
    assert!(wait_until(|| recorder.is_completed(), 1000).await);
    assert_eq!(recorder.values(), vec![1, 2]);
}

#[tokio::test]
async fn test_from_stream_stops_at_first_error() {
    // Arrange
    let source = from_stream(ErrorInjectingStream::new(stream::iter(vec![1, 2, 3]), 1));
    let recorder = Recorder::new();

    // Act
    source.subscribe(recorder.observer());

    // Assert
    assert!(wait_until(|| recorder.is_errored(), 1000).await);
    assert_eq!(recorder.values(), vec![1]);
    assert_eq!(recorder.terminal_count(), 1);
}

#[tokio::test]
async fn test_from_stream_follows_channel() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = test_channel();
    let recorder = Recorder::new();
    from_stream(rx).subscribe(recorder.observer());

    // Act
    tx.unbounded_send("a")?;
    tx.unbounded_send("b")?;
    drop(tx);

    // Assert
    assert!(wait_until(|| recorder.is_completed(), 1000).await);
    assert_eq!(recorder.values(), vec!["a", "b"]);
    Ok(())
}

#[tokio::test]
async fn test_from_stream_is_single_shot() {
    // Arrange
    let source = from_stream(stream::iter(vec![StreamItem::Value(1)]));
    let first = Recorder::new();
    let second = Recorder::<i32>::new();

    // Act
    source.subscribe(first.observer());
    source.subscribe(second.observer());

    // Assert
    assert!(matches!(
        second.errors().first(),
        Some(RivuletError::SourceConsumed { .. })
    ));
    assert!(wait_until(|| first.is_completed(), 1000).await);
}

#[tokio::test]
async fn test_unsubscribe_stops_stream_delivery() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = test_channel_with_errors();
    let recorder = Recorder::new();
    let subscription = from_stream(rx).subscribe(recorder.observer());

    tx.unbounded_send(StreamItem::Value(1))?;
    assert!(wait_until(|| recorder.len() == 1, 1000).await);

    // Act
    subscription.unsubscribe();
    let _ = tx.unbounded_send(StreamItem::Value(2));
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Assert
    assert_eq!(recorder.values(), vec![1]);
    assert_eq!(recorder.terminal_count(), 0);
    Ok(())
}

#[test]
fn test_from_stream_outside_runtime_errors() {
    let source = from_stream(stream::iter(vec![StreamItem::Value(1)]));
    let recorder = Recorder::<i32>::new();

    source.subscribe(recorder.observer());

    assert!(matches!(
        recorder.errors().first(),
        Some(RivuletError::StreamProcessingError { .. })
    ));
}

// ============================================================================
// from_future
// ============================================================================

#[tokio::test]
async fn test_from_future_emits_once() {
    // Arrange
    let source = from_future(async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok::<_, RivuletError>(7)
    });
    let recorder = Recorder::new();

    // Act
    source.subscribe(recorder.observer());

    // Assert
    assert!(wait_until(|| recorder.is_completed(), 1000).await);
    assert_eq!(recorder.values(), vec![7]);
}

#[tokio::test]
async fn test_from_future_error() {
    // Arrange
    let source = from_future(async { Err::<i32, _>(test_error("failed")) });
    let recorder = Recorder::new();

    // Act
    source.subscribe(recorder.observer());

    // Assert
    assert!(wait_until(|| recorder.is_errored(), 1000).await);
    assert!(recorder.values().is_empty());
}

#[tokio::test]
async fn test_unsubscribe_cancels_pending_future() {
    // Arrange
    let source = from_future(async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok::<_, RivuletError>(1)
    });
    let recorder = Recorder::<i32>::new();
    let subscription = source.subscribe(recorder.observer());

    // Act
    subscription.unsubscribe();
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Assert
    assert!(recorder.is_empty());
}
