// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake container metadata for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ContainerMetadata, InMemoryContainerMetadata};
use std::sync::{Arc, Mutex};
use wds_core::{ContainerId, LogAddress, SegmentId, SegmentMetadata, SequenceNumber};

/// Recorded metadata call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataCall {
    NextSequenceNumber { allocated: SequenceNumber },
    RecordTruncationMarker { sequence: SequenceNumber },
    SetValidTruncationPoint { sequence: SequenceNumber },
    RemoveTruncationMarkers { up_to: SequenceNumber },
    SegmentMetadata { segment_id: SegmentId },
}

#[derive(Default)]
struct FakeState {
    calls: Vec<MetadataCall>,
    /// Returned by the next allocation instead of a fresh number
    forced_sequence: Option<SequenceNumber>,
}

/// In-memory metadata that records the mutating calls made against it
#[derive(Clone)]
pub struct FakeContainerMetadata {
    inner: InMemoryContainerMetadata,
    state: Arc<Mutex<FakeState>>,
}

impl FakeContainerMetadata {
    pub fn new(container_id: ContainerId) -> Self {
        Self {
            inner: InMemoryContainerMetadata::new(container_id),
            state: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    /// The wrapped metadata, for segment setup
    pub fn inner(&self) -> &InMemoryContainerMetadata {
        &self.inner
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<MetadataCall> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Make the next allocation return `sequence`, bypassing the counter
    pub fn force_next_sequence_number(&self, sequence: SequenceNumber) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .forced_sequence = Some(sequence);
    }

    fn record(&self, call: MetadataCall) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .push(call);
    }
}

impl ContainerMetadata for FakeContainerMetadata {
    fn container_id(&self) -> ContainerId {
        self.inner.container_id()
    }

    fn next_sequence_number(&self) -> SequenceNumber {
        let forced = self
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .forced_sequence
            .take();
        let allocated = match forced {
            Some(sequence) => sequence,
            None => self.inner.next_sequence_number(),
        };
        self.record(MetadataCall::NextSequenceNumber { allocated });
        allocated
    }

    fn current_sequence_number(&self) -> SequenceNumber {
        self.inner.current_sequence_number()
    }

    fn record_truncation_marker(&self, sequence: SequenceNumber, address: LogAddress) {
        self.record(MetadataCall::RecordTruncationMarker { sequence });
        self.inner.record_truncation_marker(sequence, address);
    }

    fn truncation_marker(&self, sequence: SequenceNumber) -> Option<LogAddress> {
        self.inner.truncation_marker(sequence)
    }

    fn set_valid_truncation_point(&self, sequence: SequenceNumber) {
        self.record(MetadataCall::SetValidTruncationPoint { sequence });
        self.inner.set_valid_truncation_point(sequence);
    }

    fn is_valid_truncation_point(&self, sequence: SequenceNumber) -> bool {
        self.inner.is_valid_truncation_point(sequence)
    }

    fn closest_valid_truncation_point(&self, sequence: SequenceNumber) -> Option<SequenceNumber> {
        self.inner.closest_valid_truncation_point(sequence)
    }

    fn remove_truncation_markers(&self, up_to: SequenceNumber) {
        self.record(MetadataCall::RemoveTruncationMarkers { up_to });
        self.inner.remove_truncation_markers(up_to);
    }

    fn segment_metadata(&self, segment_id: SegmentId) -> Option<SegmentMetadata> {
        self.record(MetadataCall::SegmentMetadata { segment_id });
        self.inner.segment_metadata(segment_id)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
