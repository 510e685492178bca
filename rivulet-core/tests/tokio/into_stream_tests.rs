// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use futures::StreamExt;
use rivulet_core::{from_iter, throw_error, ObservableExt, StreamItem, Subject};
use rivulet_test_utils::{assert_no_element_emitted, test_error};

#[tokio::test]
async fn test_into_stream_yields_values_then_ends() {
    let stream = from_iter(vec![1, 2, 3]).into_stream();

    let items: Vec<_> = stream.collect().await;

    assert_eq!(
        items,
        vec![
            StreamItem::Value(1),
            StreamItem::Value(2),
            StreamItem::Value(3)
        ]
    );
}

#[tokio::test]
async fn test_into_stream_yields_error_then_ends() {
    let mut stream = throw_error::<i32>(test_error("boom")).into_stream();

    assert!(matches!(stream.next().await, Some(StreamItem::Error(_))));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_into_stream_follows_hot_subject() -> anyhow::Result<()> {
    let subject = Subject::new();
    let mut stream = subject.clone().into_stream();

    assert_no_element_emitted(&mut stream, 10).await;
    subject.next("late")?;

    assert_eq!(stream.next().await, Some(StreamItem::Value("late")));
    Ok(())
}

#[tokio::test]
async fn test_dropping_stream_releases_subscription() {
    let subject = Subject::<i32>::new();
    let stream = subject.clone().into_stream();
    assert_eq!(subject.observer_count(), 1);

    drop(stream);

    assert_eq!(subject.observer_count(), 0);
}
