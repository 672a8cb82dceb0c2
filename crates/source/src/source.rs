// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The contract between the Writer and its source of operations

use crate::completion::Completion;
use crate::error::DataSourceError;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use wds_core::{
    AttributeUpdate, ContainerId, Operation, SegmentId, SegmentMetadata, SequenceNumber,
};

/// Operations returned by a single read, in sequence order
pub type ReadBatch = Vec<Arc<Operation>>;

/// Everything the Writer needs from the durable write path
///
/// Methods returning `Result<Completion<_>, _>` fail the outer result for
/// contract violations and synchronous faults; everything else is reported
/// through the completion.
pub trait WriterDataSource: Send + Sync {
    /// Id of the container this source serves
    fn id(&self) -> ContainerId;

    /// Release every operation up to and including `up_to`
    ///
    /// `up_to` must be a valid truncation point.
    fn acknowledge(
        &self,
        up_to: SequenceNumber,
        timeout: Duration,
    ) -> Result<Completion<()>, DataSourceError>;

    /// Merge attribute deltas into a segment's attributes
    fn persist_attributes(
        &self,
        segment_id: SegmentId,
        updates: Vec<AttributeUpdate>,
        timeout: Duration,
    ) -> Result<Completion<()>, DataSourceError>;

    /// Freeze a segment's attributes
    fn seal_attributes(
        &self,
        segment_id: SegmentId,
        timeout: Duration,
    ) -> Result<Completion<()>, DataSourceError>;

    /// Delete all of a segment's attributes
    fn delete_all_attributes(
        &self,
        segment: &SegmentMetadata,
        timeout: Duration,
    ) -> Result<Completion<()>, DataSourceError>;

    /// Up to `max_count` operations after `after`, waiting up to `timeout`
    /// for at least one to become available
    fn read(
        &self,
        after: SequenceNumber,
        max_count: usize,
        timeout: Duration,
    ) -> Result<Completion<ReadBatch>, DataSourceError>;

    /// Notify that `source_id` has been merged into `target_id`
    fn complete_merge(
        &self,
        target_id: SegmentId,
        source_id: SegmentId,
    ) -> Result<(), DataSourceError>;

    /// Bytes of a not-yet-flushed range, or `None` if they are not resident
    fn get_append_data(
        &self,
        segment_id: SegmentId,
        start_offset: u64,
        length: usize,
    ) -> Result<Option<Bytes>, DataSourceError>;

    fn is_valid_truncation_point(&self, sequence: SequenceNumber) -> bool;

    fn closest_valid_truncation_point(&self, sequence: SequenceNumber) -> Option<SequenceNumber>;

    fn segment_metadata(&self, segment_id: SegmentId) -> Option<SegmentMetadata>;
}
