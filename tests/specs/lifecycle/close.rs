//! Close specs
//!
//! Verify that a closed data source fails fast and closing twice is harmless.

use crate::prelude::*;
use crate::prelude::assert_eq;
use std::sync::Mutex;

#[tokio::test]
async fn every_mutating_call_fails_after_close() {
    let h = Harness::new().segment(10);
    let checkpoint = h.add_checkpoint();
    let segment = h.source.segment_metadata(SEGMENT).unwrap();
    h.source.close();

    assert!(matches!(h.source.add(Operation::checkpoint()), Err(DataSourceError::Closed)));
    assert!(matches!(h.source.read(0, 1, TIMEOUT), Err(DataSourceError::Closed)));
    assert!(matches!(
        h.source.acknowledge(checkpoint, TIMEOUT),
        Err(DataSourceError::Closed)
    ));
    assert!(matches!(
        h.source.persist_attributes(SEGMENT, Vec::new(), TIMEOUT),
        Err(DataSourceError::Closed)
    ));
    assert!(matches!(
        h.source.seal_attributes(SEGMENT, TIMEOUT),
        Err(DataSourceError::Closed)
    ));
    assert!(matches!(
        h.source.delete_all_attributes(&segment, TIMEOUT),
        Err(DataSourceError::Closed)
    ));
    assert!(matches!(
        h.source.get_append_data(SEGMENT, 0, 1),
        Err(DataSourceError::Closed)
    ));
    assert!(matches!(
        h.source.record_append(SEGMENT, 0, Bytes::from_static(b"x")),
        Err(DataSourceError::Closed)
    ));
    assert!(matches!(
        h.source.complete_merge(SEGMENT, SegmentId(12)),
        Err(DataSourceError::Closed)
    ));
    assert!(matches!(h.source.wait_fully_acked(), Err(DataSourceError::Closed)));
}

#[tokio::test]
async fn second_close_is_a_no_op() {
    let h = Harness::new();
    h.source.close();
    h.source.close();
    assert!(h.source.is_closed());
}

#[tokio::test]
async fn close_cancels_drain_wait() {
    let h = Harness::new();
    h.add_append(0);
    let drained = h.source.wait_fully_acked().unwrap();

    h.source.close();
    assert!(matches!(drained.await, Err(DataSourceError::Cancelled)));
}

#[tokio::test]
async fn merge_callback_sees_both_segments() {
    let h = Harness::new();
    let merges = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&merges);
    h.source
        .set_complete_merge_callback(Some(Arc::new(move |target: SegmentId, source: SegmentId| {
            seen.lock().unwrap().push((target, source));
        })));

    h.source.complete_merge(SEGMENT, SegmentId(12)).unwrap();
    assert_eq!(*merges.lock().unwrap(), vec![(SEGMENT, SegmentId(12))]);
    assert_eq!(h.source.id(), 3);
}
