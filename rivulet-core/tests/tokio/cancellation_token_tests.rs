// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use rivulet_core::CancellationToken;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Signal State
// ============================================================================

#[test]
fn test_fresh_and_default_tokens_are_unfired() {
    assert!(!CancellationToken::new().is_cancelled());
    assert!(!CancellationToken::default().is_cancelled());
}

#[test]
fn test_firing_twice_keeps_token_fired() {
    let token = CancellationToken::new();

    token.cancel();
    token.cancel();

    assert!(token.is_cancelled());
}

#[test]
fn test_any_clone_fires_every_clone() {
    // Arrange
    let producer_side = CancellationToken::new();
    let subscription_side = producer_side.clone();
    let observer_side = producer_side.clone();

    // Act
    subscription_side.cancel();

    // Assert
    assert!(producer_side.is_cancelled());
    assert!(observer_side.is_cancelled());
}

// ============================================================================
// Waiting
// ============================================================================

#[tokio::test]
async fn test_wait_on_fired_token_returns_at_once() -> anyhow::Result<()> {
    let token = CancellationToken::new();
    token.cancel();

    tokio::time::timeout(Duration::from_millis(100), token.cancelled()).await?;
    Ok(())
}

#[tokio::test]
async fn test_wait_on_unfired_token_stays_pending() {
    let token = CancellationToken::new();

    let outcome = tokio::time::timeout(Duration::from_millis(30), token.cancelled()).await;

    assert!(outcome.is_err());
}

#[tokio::test]
async fn test_firing_releases_every_parked_producer() -> anyhow::Result<()> {
    // Arrange
    let token = CancellationToken::new();
    let stopped = Arc::new(AtomicUsize::new(0));
    let producers: Vec<_> = (0..5)
        .map(|_| {
            let token = token.clone();
            let stopped = stopped.clone();
            tokio::spawn(async move {
                token.cancelled().await;
                stopped.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Act
    token.cancel();

    // Assert
    for producer in producers {
        tokio::time::timeout(Duration::from_secs(1), producer).await??;
    }
    assert_eq!(stopped.load(Ordering::SeqCst), 5);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fire_from_another_thread_wakes_waiter() -> anyhow::Result<()> {
    // Arrange
    let token = CancellationToken::new();
    let remote = token.clone();

    // Act
    let firing = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(10));
        remote.cancel();
    });

    // Assert
    tokio::time::timeout(Duration::from_secs(1), token.cancelled()).await?;
    firing
        .join()
        .map_err(|_| anyhow::anyhow!("firing thread panicked"))?;
    Ok(())
}
