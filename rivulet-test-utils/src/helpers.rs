// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::StreamExt;
use futures::Stream;
use std::time::Duration;
use tokio::time::sleep;

/// Fails the test if `stream` yields anything within `timeout_ms`.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("Unexpected element emitted, expected no output.");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}

/// Polls `condition` every millisecond until it holds or `timeout_ms` elapses.
///
/// Returns whether the condition was met.
pub async fn wait_until<F>(mut condition: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(1)).await;
    }
    condition()
}
