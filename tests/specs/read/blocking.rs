//! Blocking read specs
//!
//! Verify that reads wait for adds, time out, and never hang on close.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[tokio::test]
async fn read_returns_up_to_max_count_in_order() {
    let h = Harness::new();
    for offset in 0..6 {
        h.add_append(offset);
    }

    let batch = h.source.read(2, 3, TIMEOUT).unwrap().await.unwrap();
    assert_eq!(sequences(&batch), vec![3, 4, 5]);
}

#[tokio::test]
async fn read_waits_for_add_then_returns_new_entries() {
    let h = Harness::new();
    let existing = h.add_append(0);

    let mut read = h.source.read(existing, 10, TIMEOUT).unwrap();
    assert!(tokio::time::timeout(SHORT, &mut read).await.is_err());

    let added = h.add_append(1);
    let batch = read.await.unwrap();
    assert_eq!(sequences(&batch), vec![added]);
}

#[tokio::test]
async fn read_times_out_without_add() {
    let h = Harness::new();
    let err = h.source.read(0, 10, SHORT).unwrap().await.unwrap_err();
    assert!(matches!(err, DataSourceError::Timeout(_)));

    // The next reader does not inherit a dead wait
    let read = h.source.read(0, 10, TIMEOUT).unwrap();
    h.add_append(0);
    assert_eq!(sequences(&read.await.unwrap()), vec![1]);
}

#[tokio::test]
async fn concurrent_readers_all_wake() {
    let h = Harness::new();
    let reads: Vec<_> = (0..4)
        .map(|_| h.source.read(0, 10, TIMEOUT).unwrap())
        .collect();

    h.add_append(0);
    for read in reads {
        assert_eq!(sequences(&read.await.unwrap()), vec![1]);
    }
}

#[tokio::test]
async fn close_resolves_suspended_read() {
    let h = Harness::new();
    let read = h.source.read(0, 10, TIMEOUT).unwrap();

    h.source.close();
    let outcome = tokio::time::timeout(TIMEOUT, read).await.unwrap();
    assert!(matches!(outcome, Err(DataSourceError::Cancelled)));
}

#[tokio::test]
async fn injected_read_failures_surface_at_the_right_layer() {
    let h = Harness::new();
    h.add_append(0);

    h.source
        .set_error_injector(FaultPoint::ReadSync, Some(ErrorInjector::every(2)));
    assert!(h.source.read(0, 10, TIMEOUT).is_ok());
    assert!(matches!(
        h.source.read(0, 10, TIMEOUT),
        Err(DataSourceError::Injected(_))
    ));

    h.source.set_error_injector(FaultPoint::ReadSync, None);
    h.source.set_error_injector(
        FaultPoint::ReadAsync,
        Some(ErrorInjector::new(
            |_| true,
            || DataSourceError::Injected("read failed".to_string()),
        )),
    );
    let read = h.source.read(0, 10, TIMEOUT).unwrap();
    assert!(matches!(read.await, Err(DataSourceError::Injected(_))));
}
