// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container metadata: sequence numbers, truncation markers, segments

mod memory;

pub use memory::InMemoryContainerMetadata;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeContainerMetadata, MetadataCall};

use wds_core::{ContainerId, LogAddress, SegmentId, SegmentMetadata, SequenceNumber};

/// Metadata of a segment container, as seen by the data source
///
/// The data source only allocates sequence numbers, manages truncation
/// bookkeeping and reads segment metadata. Every other mutation belongs to
/// the caller.
pub trait ContainerMetadata: Clone + Send + Sync + 'static {
    fn container_id(&self) -> ContainerId;

    /// Allocate the next operation sequence number
    fn next_sequence_number(&self) -> SequenceNumber;

    /// The most recently allocated sequence number (0 if none)
    fn current_sequence_number(&self) -> SequenceNumber;

    /// Associate a checkpoint's sequence number with a log position
    fn record_truncation_marker(&self, sequence: SequenceNumber, address: LogAddress);

    /// The log position recorded for `sequence`, if any
    fn truncation_marker(&self, sequence: SequenceNumber) -> Option<LogAddress>;

    fn set_valid_truncation_point(&self, sequence: SequenceNumber);

    fn is_valid_truncation_point(&self, sequence: SequenceNumber) -> bool;

    /// Greatest valid truncation point `<= sequence`
    fn closest_valid_truncation_point(&self, sequence: SequenceNumber) -> Option<SequenceNumber>;

    /// Forget markers and truncation points `<= up_to`
    fn remove_truncation_markers(&self, up_to: SequenceNumber);

    fn segment_metadata(&self, segment_id: SegmentId) -> Option<SegmentMetadata>;
}
