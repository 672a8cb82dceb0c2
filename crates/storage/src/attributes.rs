// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-segment attribute store

use std::collections::HashMap;
use thiserror::Error;
use wds_core::{AttributeId, AttributeUpdate, AttributeValue, SegmentId};

/// Errors from attribute mutations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttributeError {
    #[error("attributes for {0} have been deleted")]
    SegmentNotFound(SegmentId),
    #[error("attributes for {0} are sealed")]
    SegmentSealed(SegmentId),
}

/// Attribute state of a single segment
///
/// A segment that was never touched has no entry at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentAttributes {
    Live(HashMap<AttributeId, i64>),
    Sealed(HashMap<AttributeId, i64>),
    Tombstoned,
}

/// Attribute maps for all segments
#[derive(Debug, Default)]
pub struct AttributeStore {
    segments: HashMap<SegmentId, SegmentAttributes>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the given deltas into the segment's attributes
    ///
    /// Either every delta is applied or none is. An empty delta list is not a
    /// mutation, so it succeeds on sealed attributes.
    pub fn apply(
        &mut self,
        segment_id: SegmentId,
        updates: &[AttributeUpdate],
    ) -> Result<(), AttributeError> {
        let state = self
            .segments
            .entry(segment_id)
            .or_insert_with(|| SegmentAttributes::Live(HashMap::new()));

        let attributes = match state {
            SegmentAttributes::Live(attributes) => attributes,
            SegmentAttributes::Sealed(_) if updates.is_empty() => return Ok(()),
            SegmentAttributes::Sealed(_) => {
                return Err(AttributeError::SegmentSealed(segment_id));
            }
            SegmentAttributes::Tombstoned => {
                return Err(AttributeError::SegmentNotFound(segment_id));
            }
        };

        for update in updates {
            match update.value {
                AttributeValue::Upsert(value) => {
                    attributes.insert(update.id, value);
                }
                AttributeValue::Delete => {
                    attributes.remove(&update.id);
                }
            }
        }
        Ok(())
    }

    /// Freeze the segment's attributes in place
    ///
    /// Sealing an untouched segment seals an empty map. A tombstoned segment
    /// stays tombstoned.
    pub fn seal(&mut self, segment_id: SegmentId) {
        let state = self
            .segments
            .remove(&segment_id)
            .unwrap_or_else(|| SegmentAttributes::Live(HashMap::new()));

        let sealed = match state {
            SegmentAttributes::Live(attributes) | SegmentAttributes::Sealed(attributes) => {
                SegmentAttributes::Sealed(attributes)
            }
            SegmentAttributes::Tombstoned => SegmentAttributes::Tombstoned,
        };
        self.segments.insert(segment_id, sealed);
    }

    /// Replace the segment's attributes with a tombstone
    pub fn delete_all(&mut self, segment_id: SegmentId) {
        self.segments
            .insert(segment_id, SegmentAttributes::Tombstoned);
    }

    /// Current state, or `None` if the segment was never touched
    pub fn state(&self, segment_id: SegmentId) -> Option<&SegmentAttributes> {
        self.segments.get(&segment_id)
    }

    /// Copy of the segment's attributes; empty if absent or tombstoned
    pub fn snapshot(&self, segment_id: SegmentId) -> HashMap<AttributeId, i64> {
        match self.segments.get(&segment_id) {
            Some(SegmentAttributes::Live(attributes))
            | Some(SegmentAttributes::Sealed(attributes)) => attributes.clone(),
            Some(SegmentAttributes::Tombstoned) | None => HashMap::new(),
        }
    }
}

#[cfg(test)]
#[path = "attributes_tests.rs"]
mod tests;
