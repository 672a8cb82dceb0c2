// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory container metadata

use super::ContainerMetadata;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use wds_core::{ContainerId, LogAddress, SegmentId, SegmentMetadata, SequenceNumber};

#[derive(Debug, Default)]
struct MetadataState {
    sequence: SequenceNumber,
    markers: BTreeMap<SequenceNumber, LogAddress>,
    truncation_points: BTreeSet<SequenceNumber>,
    segments: HashMap<SegmentId, SegmentMetadata>,
}

/// Container metadata held in process memory
///
/// Clones share state, so a test (or the Writer's caller) can keep a handle
/// and mutate segment metadata while the data source holds another.
#[derive(Clone, Debug)]
pub struct InMemoryContainerMetadata {
    container_id: ContainerId,
    state: Arc<Mutex<MetadataState>>,
}

impl InMemoryContainerMetadata {
    pub fn new(container_id: ContainerId) -> Self {
        Self {
            container_id,
            state: Arc::new(Mutex::new(MetadataState::default())),
        }
    }

    /// Register a new, empty segment
    ///
    /// Re-mapping an existing id replaces its metadata.
    pub fn map_segment(&self, segment_id: SegmentId, name: impl Into<String>) -> SegmentMetadata {
        let metadata = SegmentMetadata::new(segment_id, name, self.container_id);
        self.lock().segments.insert(segment_id, metadata.clone());
        metadata
    }

    /// Apply `f` to a segment's metadata; returns the updated copy
    pub fn update_segment<F>(&self, segment_id: SegmentId, f: F) -> Option<SegmentMetadata>
    where
        F: FnOnce(&mut SegmentMetadata),
    {
        let mut state = self.lock();
        let metadata = state.segments.get_mut(&segment_id)?;
        f(metadata);
        Some(metadata.clone())
    }

    pub fn set_length(&self, segment_id: SegmentId, length: u64) -> bool {
        self.update_segment(segment_id, |m| m.length = length)
            .is_some()
    }

    pub fn set_storage_length(&self, segment_id: SegmentId, storage_length: u64) -> bool {
        self.update_segment(segment_id, |m| m.storage_length = storage_length)
            .is_some()
    }

    pub fn set_start_offset(&self, segment_id: SegmentId, start_offset: u64) -> bool {
        self.update_segment(segment_id, |m| m.start_offset = start_offset)
            .is_some()
    }

    pub fn mark_sealed(&self, segment_id: SegmentId) -> bool {
        self.update_segment(segment_id, |m| m.sealed = true)
            .is_some()
    }

    pub fn mark_deleted(&self, segment_id: SegmentId) -> bool {
        self.update_segment(segment_id, |m| m.deleted = true)
            .is_some()
    }

    /// Number of truncation markers currently recorded
    pub fn truncation_marker_count(&self) -> usize {
        self.lock().markers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MetadataState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ContainerMetadata for InMemoryContainerMetadata {
    fn container_id(&self) -> ContainerId {
        self.container_id
    }

    fn next_sequence_number(&self) -> SequenceNumber {
        let mut state = self.lock();
        state.sequence += 1;
        state.sequence
    }

    fn current_sequence_number(&self) -> SequenceNumber {
        self.lock().sequence
    }

    fn record_truncation_marker(&self, sequence: SequenceNumber, address: LogAddress) {
        self.lock().markers.insert(sequence, address);
    }

    fn truncation_marker(&self, sequence: SequenceNumber) -> Option<LogAddress> {
        self.lock().markers.get(&sequence).copied()
    }

    fn set_valid_truncation_point(&self, sequence: SequenceNumber) {
        self.lock().truncation_points.insert(sequence);
    }

    fn is_valid_truncation_point(&self, sequence: SequenceNumber) -> bool {
        self.lock().truncation_points.contains(&sequence)
    }

    fn closest_valid_truncation_point(&self, sequence: SequenceNumber) -> Option<SequenceNumber> {
        self.lock()
            .truncation_points
            .range(..=sequence)
            .next_back()
            .copied()
    }

    fn remove_truncation_markers(&self, up_to: SequenceNumber) {
        let mut state = self.lock();
        state.markers.retain(|seq, _| *seq > up_to);
        state.truncation_points.retain(|seq| *seq > up_to);
    }

    fn segment_metadata(&self, segment_id: SegmentId) -> Option<SegmentMetadata> {
        self.lock().segments.get(&segment_id).cloned()
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
