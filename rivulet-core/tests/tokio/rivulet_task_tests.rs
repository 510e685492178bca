// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use rivulet_core::{RivuletError, RivuletTask};
use rivulet_test_utils::wait_until;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_drop_cancels_task() -> anyhow::Result<()> {
    // Arrange
    let stopped = Arc::new(AtomicBool::new(false));
    let flag = stopped.clone();
    let task = RivuletTask::spawn(move |cancel| async move {
        cancel.cancelled().await;
        flag.store(true, Ordering::SeqCst);
    })?;

    // Act
    drop(task);

    // Assert
    assert!(wait_until(|| stopped.load(Ordering::SeqCst), 1000).await);
    Ok(())
}

#[tokio::test]
async fn test_manual_cancel_sets_flag() -> anyhow::Result<()> {
    let task = RivuletTask::spawn(|cancel| async move { cancel.cancelled().await })?;

    assert!(!task.is_cancelled());
    task.cancel();
    assert!(task.is_cancelled());
    Ok(())
}

#[test]
fn test_spawn_outside_runtime_fails() {
    let result = RivuletTask::spawn(|_cancel| async {});

    assert!(matches!(
        result,
        Err(RivuletError::StreamProcessingError { .. })
    ));
}
