// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations handed from producers to the Writer
//!
//! An operation is created without a sequence number. The data source assigns
//! one exactly once when the operation is added to the log; after that the
//! operation is immutable.

use crate::attribute::AttributeUpdate;
use crate::segment::SegmentId;
use bytes::Bytes;

/// Position of an operation in the log
pub type SequenceNumber = u64;

/// Opaque position token in the durable log, recorded as a truncation marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogAddress {
    pub sequence: u64,
}

impl LogAddress {
    pub fn new(sequence: u64) -> Self {
        Self { sequence }
    }
}

/// The kinds of operations the Writer consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationKind {
    /// Snapshot of container metadata; the only valid truncation point
    MetadataCheckpoint,

    /// Append bytes to a segment at a given offset
    StreamSegmentAppend {
        segment_id: SegmentId,
        offset: u64,
        data: Bytes,
    },

    /// Seal a segment so no more appends are accepted
    StreamSegmentSeal { segment_id: SegmentId },

    /// Merge a sealed source segment into a target segment
    MergeSegment {
        target_id: SegmentId,
        source_id: SegmentId,
    },

    /// Apply attribute deltas to a segment
    UpdateAttributes {
        segment_id: SegmentId,
        updates: Vec<AttributeUpdate>,
    },

    /// Delete a segment
    DeleteSegment { segment_id: SegmentId },

    /// Sequencing marker with no payload; never serialized
    Probe,
}

/// An operation and its (possibly unassigned) sequence number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    sequence_number: Option<SequenceNumber>,
    kind: OperationKind,
}

impl Operation {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            sequence_number: None,
            kind,
        }
    }

    pub fn checkpoint() -> Self {
        Self::new(OperationKind::MetadataCheckpoint)
    }

    pub fn probe() -> Self {
        Self::new(OperationKind::Probe)
    }

    pub fn append(segment_id: SegmentId, offset: u64, data: impl Into<Bytes>) -> Self {
        Self::new(OperationKind::StreamSegmentAppend {
            segment_id,
            offset,
            data: data.into(),
        })
    }

    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    /// Assigned sequence number, or `None` if the operation was never added
    pub fn sequence_number(&self) -> Option<SequenceNumber> {
        self.sequence_number
    }

    pub fn set_sequence_number(&mut self, sequence_number: SequenceNumber) {
        self.sequence_number = Some(sequence_number);
    }

    pub fn is_checkpoint(&self) -> bool {
        matches!(self.kind, OperationKind::MetadataCheckpoint)
    }

    /// Whether the operation may be written to a durable log
    pub fn can_serialize(&self) -> bool {
        !matches!(self.kind, OperationKind::Probe)
    }

    /// The segment this operation targets, if any
    pub fn segment_id(&self) -> Option<SegmentId> {
        match &self.kind {
            OperationKind::StreamSegmentAppend { segment_id, .. }
            | OperationKind::StreamSegmentSeal { segment_id }
            | OperationKind::UpdateAttributes { segment_id, .. }
            | OperationKind::DeleteSegment { segment_id } => Some(*segment_id),
            OperationKind::MergeSegment { target_id, .. } => Some(*target_id),
            OperationKind::MetadataCheckpoint | OperationKind::Probe => None,
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self.kind {
            OperationKind::MetadataCheckpoint => "metadata-checkpoint",
            OperationKind::StreamSegmentAppend { .. } => "append",
            OperationKind::StreamSegmentSeal { .. } => "seal",
            OperationKind::MergeSegment { .. } => "merge",
            OperationKind::UpdateAttributes { .. } => "update-attributes",
            OperationKind::DeleteSegment { .. } => "delete",
            OperationKind::Probe => "probe",
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
