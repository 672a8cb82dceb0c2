//! Acknowledgement specs
//!
//! Verify truncation, truncation points and the fully-acknowledged wait.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[tokio::test]
async fn acknowledge_of_non_checkpoint_fails_and_leaves_log() {
    let h = Harness::new();
    h.add_checkpoint();
    let append = h.add_append(0);

    let err = h.source.acknowledge(append, TIMEOUT).unwrap_err();
    assert!(matches!(err, DataSourceError::InvalidTruncationPoint(2)));
    assert_eq!(h.read_all().await, vec![1, 2]);
}

#[tokio::test]
async fn acknowledged_operations_are_never_read_again() {
    let h = Harness::new();
    h.add_append(0);
    h.add_append(1);
    let checkpoint = h.add_checkpoint();
    h.add_append(2);

    h.ack(checkpoint).await;

    let remaining = h.read_all().await;
    assert_eq!(remaining, vec![4]);
    assert!(remaining.iter().all(|s| *s > checkpoint));
    assert!(!h.source.is_valid_truncation_point(checkpoint));
    assert_eq!(h.metadata.truncation_marker_count(), 0);
}

#[tokio::test]
async fn ineffective_acknowledge_retains_log() {
    let h = Harness::with_config(DataSourceConfig::default().with_ack_effective(false));
    h.add_append(0);
    let checkpoint = h.add_checkpoint();

    h.ack(checkpoint).await;
    assert_eq!(h.read_all().await, vec![1, 2]);
    assert!(h.source.is_valid_truncation_point(checkpoint));
}

#[tokio::test]
async fn closest_truncation_point_is_latest_checkpoint_at_or_before() {
    let h = Harness::new();
    h.add_append(0);
    let first = h.add_checkpoint();
    h.add_append(1);
    let second = h.add_checkpoint();

    assert_eq!(h.source.closest_valid_truncation_point(1), None);
    assert_eq!(h.source.closest_valid_truncation_point(first), Some(first));
    assert_eq!(h.source.closest_valid_truncation_point(second - 1), Some(first));
    assert_eq!(h.source.closest_valid_truncation_point(100), Some(second));
}

#[tokio::test]
async fn wait_fully_acked_on_empty_log_resolves_immediately() {
    let h = Harness::new();
    h.source.wait_fully_acked().unwrap().await.unwrap();
}

#[tokio::test]
async fn wait_fully_acked_resolves_when_log_drains() {
    let h = Harness::new();
    let first = h.add_checkpoint();
    h.add_append(0);
    let second = h.add_checkpoint();

    let mut drained = h.source.wait_fully_acked().unwrap();
    h.ack(first).await;
    assert!(tokio::time::timeout(SHORT, &mut drained).await.is_err());

    h.ack(second).await;
    drained.await.unwrap();
    assert_eq!(h.read_all().await, Vec::<SequenceNumber>::new());
}

#[tokio::test]
async fn waiters_share_one_drain_notification() {
    let h = Harness::new();
    let checkpoint = h.add_checkpoint();

    let first = h.source.wait_fully_acked().unwrap();
    let second = h.source.wait_fully_acked().unwrap();
    h.ack(checkpoint).await;

    first.await.unwrap();
    second.await.unwrap();
}
