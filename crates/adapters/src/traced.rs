// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced metadata wrapper for consistent observability

use crate::metadata::ContainerMetadata;
use wds_core::{ContainerId, LogAddress, SegmentId, SegmentMetadata, SequenceNumber};

/// Wrapper that adds tracing to any ContainerMetadata
#[derive(Clone)]
pub struct TracedContainerMetadata<M> {
    inner: M,
}

impl<M> TracedContainerMetadata<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M: ContainerMetadata> ContainerMetadata for TracedContainerMetadata<M> {
    fn container_id(&self) -> ContainerId {
        self.inner.container_id()
    }

    fn next_sequence_number(&self) -> SequenceNumber {
        let sequence = self.inner.next_sequence_number();
        tracing::trace!(
            container_id = self.inner.container_id(),
            sequence,
            "sequence number allocated"
        );
        sequence
    }

    fn current_sequence_number(&self) -> SequenceNumber {
        self.inner.current_sequence_number()
    }

    fn record_truncation_marker(&self, sequence: SequenceNumber, address: LogAddress) {
        let span = tracing::debug_span!("metadata.record_truncation_marker", sequence);
        let _guard = span.enter();

        self.inner.record_truncation_marker(sequence, address);
        tracing::debug!(address = address.sequence, "truncation marker recorded");
    }

    fn truncation_marker(&self, sequence: SequenceNumber) -> Option<LogAddress> {
        self.inner.truncation_marker(sequence)
    }

    fn set_valid_truncation_point(&self, sequence: SequenceNumber) {
        self.inner.set_valid_truncation_point(sequence);
        tracing::debug!(sequence, "valid truncation point set");
    }

    fn is_valid_truncation_point(&self, sequence: SequenceNumber) -> bool {
        let valid = self.inner.is_valid_truncation_point(sequence);
        tracing::trace!(sequence, valid, "checked truncation point");
        valid
    }

    fn closest_valid_truncation_point(&self, sequence: SequenceNumber) -> Option<SequenceNumber> {
        self.inner.closest_valid_truncation_point(sequence)
    }

    fn remove_truncation_markers(&self, up_to: SequenceNumber) {
        let span = tracing::debug_span!("metadata.remove_truncation_markers", up_to);
        let _guard = span.enter();

        self.inner.remove_truncation_markers(up_to);
        tracing::debug!("truncation markers removed");
    }

    fn segment_metadata(&self, segment_id: SegmentId) -> Option<SegmentMetadata> {
        let result = self.inner.segment_metadata(segment_id);
        if result.is_none() {
            // Callers usually treat this as a programming error
            tracing::warn!(%segment_id, "segment metadata not found");
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
