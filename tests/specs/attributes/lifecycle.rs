//! Attribute lifecycle specs
//!
//! Verify live, sealed and deleted attribute states.

use crate::prelude::*;
use crate::prelude::assert_eq;
use std::collections::HashMap;

fn id(n: u64) -> AttributeId {
    AttributeId::from_parts(n, n)
}

async fn persist(h: &Harness, updates: Vec<AttributeUpdate>) -> Result<(), DataSourceError> {
    h.source
        .persist_attributes(SEGMENT, updates, TIMEOUT)
        .unwrap()
        .await
}

#[tokio::test]
async fn deltas_merge_into_existing_attributes() {
    let h = Harness::new();
    persist(&h, vec![AttributeUpdate::upsert(id(1), 1), AttributeUpdate::upsert(id(2), 2)])
        .await
        .unwrap();
    persist(&h, vec![AttributeUpdate::upsert(id(2), 20), AttributeUpdate::delete(id(1))])
        .await
        .unwrap();

    assert_eq!(
        h.source.get_persisted_attributes(SEGMENT),
        HashMap::from([(id(2), 20)])
    );
}

#[tokio::test]
async fn sealed_attributes_reject_updates_unchanged() {
    let h = Harness::new();
    persist(&h, vec![AttributeUpdate::upsert(id(1), 1)])
        .await
        .unwrap();
    h.source
        .seal_attributes(SEGMENT, TIMEOUT)
        .unwrap()
        .await
        .unwrap();

    let err = persist(&h, vec![AttributeUpdate::upsert(id(1), 5)])
        .await
        .unwrap_err();
    assert!(matches!(err, DataSourceError::SegmentSealed(SEGMENT)));
    assert_eq!(
        h.source.get_persisted_attributes(SEGMENT),
        HashMap::from([(id(1), 1)])
    );
}

#[tokio::test]
async fn deleted_attributes_reject_updates_as_missing() {
    let h = Harness::new().segment(0);
    let segment = h.source.segment_metadata(SEGMENT).unwrap();
    persist(&h, vec![AttributeUpdate::upsert(id(1), 1)])
        .await
        .unwrap();
    h.source
        .delete_all_attributes(&segment, TIMEOUT)
        .unwrap()
        .await
        .unwrap();

    let err = persist(&h, vec![AttributeUpdate::upsert(id(1), 5)])
        .await
        .unwrap_err();
    assert!(matches!(err, DataSourceError::SegmentNotFound(SEGMENT)));
    assert!(h.source.get_persisted_attributes(SEGMENT).is_empty());
}

#[tokio::test]
async fn sealing_untouched_segment_freezes_empty_attributes() {
    let h = Harness::new();
    h.source
        .seal_attributes(SEGMENT, TIMEOUT)
        .unwrap()
        .await
        .unwrap();

    let err = persist(&h, vec![AttributeUpdate::upsert(id(1), 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, DataSourceError::SegmentSealed(SEGMENT)));
}

#[tokio::test]
async fn injected_persist_failure_applies_nothing() {
    let h = Harness::new();
    h.source
        .set_error_injector(FaultPoint::PersistAttributes, Some(ErrorInjector::always()));

    let err = persist(&h, vec![AttributeUpdate::upsert(id(1), 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, DataSourceError::Injected(_)));
    assert!(h.source.get_persisted_attributes(SEGMENT).is_empty());
}
