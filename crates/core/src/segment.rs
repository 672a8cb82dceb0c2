// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Segment identity and metadata snapshots

use std::fmt;

/// Identifier of the container that owns a set of segments
pub type ContainerId = u32;

/// Unique identifier for a segment within a container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub u64);

impl SegmentId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment-{}", self.0)
    }
}

impl From<u64> for SegmentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Point-in-time view of a segment's metadata
///
/// Offsets satisfy `start_offset <= length` and `storage_length <= length`.
/// Bytes below `storage_length` are already durable in long-term storage;
/// bytes below `start_offset` may have been trimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentMetadata {
    pub id: SegmentId,
    pub name: String,
    pub container_id: ContainerId,
    /// Total number of bytes ever appended
    pub length: u64,
    /// Offset below which data lives in long-term storage
    pub storage_length: u64,
    /// First offset that is still readable
    pub start_offset: u64,
    pub sealed: bool,
    pub deleted: bool,
}

impl SegmentMetadata {
    pub fn new(id: SegmentId, name: impl Into<String>, container_id: ContainerId) -> Self {
        Self {
            id,
            name: name.into(),
            container_id,
            length: 0,
            storage_length: 0,
            start_offset: 0,
            sealed: false,
            deleted: false,
        }
    }

    /// Number of bytes appended but not yet in long-term storage
    pub fn outstanding_length(&self) -> u64 {
        self.length.saturating_sub(self.storage_length)
    }
}

#[cfg(test)]
#[path = "segment_tests.rs"]
mod tests;
