//! Sequencing specs
//!
//! Verify sequence number assignment and checkpoint auto-insertion.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[tokio::test]
async fn sequence_numbers_follow_metadata_allocation() {
    let h = Harness::new();
    let mut last = 0;
    for offset in 0..20 {
        let sequence = if offset % 4 == 0 {
            h.add_checkpoint()
        } else {
            h.add_append(offset)
        };
        assert!(sequence > last);
        assert_eq!(sequence, h.metadata.current_sequence_number());
        last = sequence;
    }
    assert_eq!(h.read_all().await, (1..=20).collect::<Vec<_>>());
}

#[tokio::test]
async fn checkpoint_is_inserted_every_k_operations() {
    let k = 5;
    let h = Harness::with_config(DataSourceConfig::default().with_auto_checkpoint_frequency(k));

    let mut triggering = Vec::new();
    for offset in 0..12 {
        triggering.push(h.add_append(offset));
    }

    let batch = h.source.read(0, 100, TIMEOUT).unwrap().await.unwrap();
    let checkpoints: Vec<_> = batch
        .iter()
        .filter(|op| op.is_checkpoint())
        .filter_map(|op| op.sequence_number())
        .collect();
    assert_eq!(checkpoints, vec![6, 12]);

    // Each checkpoint immediately precedes the operation that triggered it
    for checkpoint in checkpoints {
        assert!(triggering.contains(&(checkpoint + 1)));
        assert!(h.source.is_valid_truncation_point(checkpoint));
    }
}

#[tokio::test]
async fn probe_is_sequenced_but_not_serializable() {
    let h = Harness::new();
    let sequence = h.add(Operation::probe());

    let batch = h.source.read(0, 10, TIMEOUT).unwrap().await.unwrap();
    assert_eq!(batch[0].sequence_number(), Some(sequence));
    assert!(!batch[0].can_serialize());
}

#[tokio::test]
async fn sequenced_operation_is_rejected() {
    let h = Harness::new();
    let mut op = Operation::checkpoint();
    op.set_sequence_number(1);

    assert!(matches!(
        h.source.add(op),
        Err(DataSourceError::AlreadySequenced(1))
    ));
    assert_eq!(h.source.last_sequence_number(), None);
}
