// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{from_iter, IntoObservable, Observable, ObservableExt, RivuletError, Subject};
use rivulet_test_utils::{test_error, Recorder};

fn record<U, S>(result: S) -> Recorder<U>
where
    U: Clone + Send + 'static,
    S: IntoObservable<U>,
{
    let recorder = Recorder::new();
    result.into_observable().subscribe(recorder.observer());
    recorder
}

#[test]
fn test_vec_emits_every_element() {
    let recorder = record(vec![3, 1, 2]);

    assert_eq!(recorder.values(), vec![3, 1, 2]);
    assert!(recorder.is_completed());
}

#[test]
fn test_some_emits_one_value() {
    let recorder = record(Some("only"));

    assert_eq!(recorder.values(), vec!["only"]);
    assert!(recorder.is_completed());
}

#[test]
fn test_none_completes_immediately() {
    let recorder = record(None::<i32>);

    assert!(recorder.values().is_empty());
    assert!(recorder.is_completed());
}

#[test]
fn test_ok_emits_value() {
    let recorder = record(Ok::<_, RivuletError>(5));

    assert_eq!(recorder.values(), vec![5]);
}

#[test]
fn test_err_signals_error() {
    let recorder = record(Err::<i32, _>(test_error("rejected")));

    assert!(recorder.is_errored());
    assert!(recorder.values().is_empty());
}

#[test]
fn test_box_observable_is_passed_through() {
    let recorder = record(from_iter(vec![1, 2]).boxed());

    assert_eq!(recorder.values(), vec![1, 2]);
}

#[test]
fn test_subject_adapts_as_hot_source() -> anyhow::Result<()> {
    let subject = Subject::new();
    let recorder = record(subject.clone());

    subject.next(10)?;
    subject.complete();

    assert_eq!(recorder.values(), vec![10]);
    assert!(recorder.is_completed());
    Ok(())
}
