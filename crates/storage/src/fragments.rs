// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append fragment store
//!
//! Keeps the bytes of recent appends, keyed by segment and starting offset,
//! so that ranges not yet in long-term storage can be reconstructed.

use bytes::{Bytes, BytesMut};
use std::collections::{BTreeMap, HashMap};
use wds_core::SegmentId;

/// Sparse, offset-ordered fragments of one segment
#[derive(Debug, Default)]
pub struct SegmentFragments {
    fragments: BTreeMap<u64, Bytes>,
}

impl SegmentFragments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fragment, replacing any fragment that starts at the same offset
    pub fn insert(&mut self, offset: u64, data: Bytes) {
        self.fragments.insert(offset, data);
    }

    /// Reconstruct `length` bytes starting at `offset`
    ///
    /// The first fragment may start before `offset`. Every following fragment
    /// must start exactly where the previous one ended. Returns `None` if the
    /// range runs into a gap or past the last fragment.
    pub fn read(&self, offset: u64, length: usize) -> Option<Bytes> {
        let (&first_offset, first) = self.fragments.range(..=offset).next_back()?;
        let first_end = first_offset.checked_add(first.len() as u64)?;
        if first_end <= offset {
            // Before the first fragment or inside a gap
            return None;
        }

        // Collect covering slices first; allocate only once the range is resident
        let mut slices = Vec::new();
        let mut current = offset;
        let mut remaining = length;
        let mut fragment = Some(first.slice((offset - first_offset) as usize..));

        while remaining > 0 {
            let data = fragment?;
            if data.is_empty() {
                return None;
            }
            let take = remaining.min(data.len());
            slices.push(data.slice(..take));
            remaining -= take;
            if remaining == 0 {
                break;
            }
            current = current.checked_add(take as u64)?;
            fragment = self.fragments.get(&current).cloned();
        }

        if let [single] = slices.as_slice() {
            return Some(single.clone());
        }
        let mut result = BytesMut::with_capacity(length);
        for slice in &slices {
            result.extend_from_slice(slice);
        }
        Some(result.freeze())
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Fragments for all segments
#[derive(Debug, Default)]
pub struct FragmentStore {
    segments: HashMap<SegmentId, SegmentFragments>,
}

impl FragmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, segment_id: SegmentId, offset: u64, data: Bytes) {
        self.segments
            .entry(segment_id)
            .or_default()
            .insert(offset, data);
    }

    /// See [`SegmentFragments::read`]; `None` also when nothing was recorded
    pub fn read(&self, segment_id: SegmentId, offset: u64, length: usize) -> Option<Bytes> {
        self.segments.get(&segment_id)?.read(offset, length)
    }

    /// Drop every fragment of every segment
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn segment(&self, segment_id: SegmentId) -> Option<&SegmentFragments> {
        self.segments.get(&segment_id)
    }
}

#[cfg(test)]
#[path = "fragments_tests.rs"]
mod tests;
