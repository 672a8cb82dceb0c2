// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequenced in-memory log
//!
//! An append-only list of items keyed by strictly increasing sequence
//! numbers. The head can be truncated; reads never block.

use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use wds_core::SequenceNumber;

/// Errors that can occur in log operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogError {
    #[error("sequence numbers out of order: {attempted} does not exceed {last}")]
    OutOfOrder {
        last: SequenceNumber,
        attempted: SequenceNumber,
    },
}

/// Ordered log of sequenced items
#[derive(Debug)]
pub struct SequencedLog<T> {
    entries: VecDeque<(SequenceNumber, Arc<T>)>,
    /// Highest sequence number ever appended; survives truncation
    high_water: Option<SequenceNumber>,
}

impl<T> SequencedLog<T> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            high_water: None,
        }
    }

    /// Append an item at the given sequence number
    ///
    /// Fails if `sequence` does not strictly exceed every number appended so
    /// far, including numbers already truncated away.
    pub fn append(&mut self, sequence: SequenceNumber, item: Arc<T>) -> Result<(), LogError> {
        if let Some(last) = self.high_water {
            if sequence <= last {
                return Err(LogError::OutOfOrder {
                    last,
                    attempted: sequence,
                });
            }
        }
        self.entries.push_back((sequence, item));
        self.high_water = Some(sequence);
        Ok(())
    }

    /// Remove every entry with a sequence number `<= up_to`
    ///
    /// Returns the number of entries removed.
    pub fn truncate(&mut self, up_to: SequenceNumber) -> usize {
        let count = self.entries.partition_point(|(seq, _)| *seq <= up_to);
        self.entries.drain(..count);
        count
    }

    /// Up to `max_count` entries strictly after `after`, in order
    pub fn read(&self, after: SequenceNumber, max_count: usize) -> Vec<Arc<T>> {
        let start = self.entries.partition_point(|(seq, _)| *seq <= after);
        self.entries
            .range(start..)
            .take(max_count)
            .map(|(_, item)| Arc::clone(item))
            .collect()
    }

    pub fn last(&self) -> Option<Arc<T>> {
        self.entries.back().map(|(_, item)| Arc::clone(item))
    }

    pub fn last_sequence(&self) -> Option<SequenceNumber> {
        self.entries.back().map(|(seq, _)| *seq)
    }

    pub fn first_sequence(&self) -> Option<SequenceNumber> {
        self.entries.front().map(|(seq, _)| *seq)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for SequencedLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
