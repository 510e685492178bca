// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use rivulet_core::{from_iter, just, Observable, ObservableExt, RivuletError};
use rivulet_merge_map::{Concurrency, MergeMap, MergeMapArg, MergeMapExt};
use rivulet_test_utils::Recorder;
use std::sync::{Arc, Mutex};

// ============================================================================
// Positional construction
// ============================================================================

#[test]
fn test_numeric_second_argument_wins_over_limit() -> anyhow::Result<()> {
    // Act
    let operator = MergeMap::from_args(|v: i32, _| Ok(just(v)), Some(MergeMapArg::Limit(3)), Some(7))?;

    // Assert
    assert_eq!(operator.concurrency(), Concurrency::limited(3)?);
    assert!(!operator.has_combine());
    Ok(())
}

#[test]
fn test_combine_with_limit() -> anyhow::Result<()> {
    // Act
    let operator = MergeMap::from_args(
        |v: i32, _| Ok(just(v)),
        Some(MergeMapArg::combine(|o: &i32, i: i32, _, _| Ok(o + i))),
        Some(2),
    )?;

    // Assert
    assert_eq!(operator.concurrency().get(), Some(2));
    assert!(operator.has_combine());
    Ok(())
}

#[test]
fn test_no_optional_arguments_means_unbounded() -> anyhow::Result<()> {
    // Act
    let operator = MergeMap::from_args(|v: i32, _| Ok(just(v)), None, None)?;

    // Assert
    assert_eq!(operator.concurrency(), Concurrency::Unbounded);
    assert!(!operator.has_combine());
    Ok(())
}

#[test]
fn test_usize_converts_to_limit_argument() -> anyhow::Result<()> {
    // Arrange
    let second: MergeMapArg<i32, i32> = 4.into();

    // Act
    let operator = MergeMap::from_args(|v: i32, _| Ok(just(v)), Some(second), None)?;

    // Assert
    assert_eq!(operator.concurrency().get(), Some(4));
    Ok(())
}

#[test]
fn test_zero_limit_is_rejected() {
    // Act
    let positional = MergeMap::from_args(|v: i32, _| Ok(just(v)), Some(MergeMapArg::Limit(0)), None);
    let explicit = MergeMap::from_args(|v: i32, _| Ok(just(v)), None, Some(0));
    let builder = MergeMap::new(|v: i32, _| Ok(just(v))).with_limit(0);

    // Assert
    assert!(matches!(
        positional,
        Err(RivuletError::InvalidConcurrencyLimit { limit: 0 })
    ));
    assert!(explicit.is_err());
    assert!(builder.is_err());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrency_capacity_and_display() -> anyhow::Result<()> {
    // Arrange
    let two = Concurrency::limited(2)?;

    // Assert
    assert!(two.has_capacity(1));
    assert!(!two.has_capacity(2));
    assert!(Concurrency::Unbounded.has_capacity(usize::MAX));
    assert_eq!(Concurrency::SERIAL.get(), Some(1));
    assert_eq!(two.to_string(), "2");
    assert_eq!(Concurrency::Unbounded.to_string(), "unbounded");
    Ok(())
}

#[test]
fn test_debug_output_hides_closures() -> anyhow::Result<()> {
    // Arrange
    let operator = MergeMap::new(|v: i32, _| Ok(just(v))).with_limit(2)?;

    // Act
    let rendered = format!("{operator:?}");

    // Assert
    assert!(rendered.starts_with("MergeMap"));
    assert!(rendered.contains("combine: false"));
    Ok(())
}

// ============================================================================
// Reuse
// ============================================================================

#[test]
fn test_operator_is_reusable_across_sources() -> anyhow::Result<()> {
    // Arrange
    let operator = MergeMap::new(|v: i32, index| Ok(vec![v * 10 + index as i32])).with_limit(1)?;
    let first = Recorder::new();
    let second = Recorder::new();

    // Act
    from_iter(vec![1, 2])
        .merge_map_with(operator.clone())
        .subscribe(first.observer());
    from_iter(vec![5])
        .merge_map_with(operator)
        .subscribe(second.observer());

    // Assert
    assert_eq!(first.values(), vec![10, 21]);
    assert_eq!(second.values(), vec![50]);
    assert!(first.is_completed() && second.is_completed());
    Ok(())
}

#[test]
fn test_lifted_source_restarts_indices_per_subscription() {
    // Arrange
    let indices = Arc::new(Mutex::new(Vec::new()));
    let log = indices.clone();
    let merged = from_iter(vec!['a', 'b']).merge_map(move |c: char, index| {
        log.lock().unwrap().push(index);
        Ok(just(c))
    });
    let first = Recorder::new();
    let second = Recorder::new();

    // Act
    merged.subscribe(first.observer());
    merged.subscribe(second.observer());

    // Assert
    assert_eq!(first.values(), vec!['a', 'b']);
    assert_eq!(second.values(), vec!['a', 'b']);
    assert_eq!(*indices.lock().unwrap(), vec![0, 1, 0, 1]);
}

#[test]
fn test_lift_accepts_descriptor_directly() {
    // Arrange
    let recorder = Recorder::new();

    // Act
    from_iter(vec![3])
        .lift(MergeMap::new(|v: i32, _| Ok(vec![v, v])))
        .subscribe(recorder.observer());

    // Assert
    assert_eq!(recorder.values(), vec![3, 3]);
}

// ============================================================================
// Combine
// ============================================================================

#[test]
fn test_combine_receives_both_indices() {
    // Arrange
    let recorder = Recorder::new();
    let operator = MergeMap::new(|_c: char, _| Ok(vec![1, 2])).with_combine(
        |outer: &char, inner: i32, outer_index, inner_index| {
            Ok(format!("{outer}{inner}@{outer_index}.{inner_index}"))
        },
    );

    // Act
    from_iter(vec!['a', 'b'])
        .merge_map_with(operator)
        .subscribe(recorder.observer());

    // Assert
    assert_eq!(recorder.values(), vec!["a1@0.0", "a2@0.1", "b1@1.0", "b2@1.1"]);
}
