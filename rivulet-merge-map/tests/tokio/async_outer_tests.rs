// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use futures::StreamExt;
use rivulet_core::{from_stream, just, Observable, ObservableExt, StreamItem, Subject};
use rivulet_merge_map::MergeMapExt;
use rivulet_test_utils::{test_channel, wait_until, Recorder};

#[tokio::test]
async fn test_stream_outer_is_merged_as_it_arrives() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = test_channel();
    let recorder = Recorder::new();
    from_stream(rx)
        .merge_map(|v: i32, _| Ok(vec![v, -v]))
        .subscribe(recorder.observer());

    // Act
    tx.unbounded_send(1)?;
    assert!(wait_until(|| recorder.len() == 2, 1000).await);
    tx.unbounded_send(2)?;
    drop(tx);

    // Assert
    assert!(wait_until(|| recorder.is_completed(), 1000).await);
    assert_eq!(recorder.values(), vec![1, -1, 2, -2]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_subject_fed_from_many_tasks() -> anyhow::Result<()> {
    // Arrange
    let outer = Subject::new();
    let recorder = Recorder::new();
    outer
        .clone()
        .merge_map(|v: u32, _| Ok(just(v)))
        .subscribe(recorder.observer());

    // Act
    let producers: Vec<_> = (0..4u32)
        .map(|worker| {
            let outer = outer.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    let _ = outer.next(worker * 100 + i);
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();
    for producer in producers {
        producer.await?;
    }
    outer.complete();

    // Assert
    assert_eq!(recorder.values().len(), 200);
    assert_eq!(recorder.completion_count(), 1);
    assert!(!recorder.has_value_after_terminal());
    Ok(())
}

#[tokio::test]
async fn test_merged_output_as_stream() {
    // Arrange
    let stream = rivulet_core::from_iter(vec![1, 2])
        .merge_map(|v: i32, _| Ok(vec![v; 2]))
        .into_stream();

    // Act
    let items: Vec<_> = stream.collect().await;

    // Assert
    assert_eq!(
        items,
        vec![
            StreamItem::Value(1),
            StreamItem::Value(1),
            StreamItem::Value(2),
            StreamItem::Value(2),
        ]
    );
}

#[tokio::test]
async fn test_dropping_stream_releases_merge() {
    // Arrange
    let outer = Subject::<i32>::new();
    let stream = outer
        .clone()
        .merge_map(|v: i32, _| Ok(just(v)))
        .into_stream();
    assert_eq!(outer.observer_count(), 1);

    // Act
    drop(stream);

    // Assert
    assert_eq!(outer.observer_count(), 0);
}
