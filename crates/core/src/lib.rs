// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wds-core: shared types for the Writer data source
//!
//! This crate provides:
//! - Operations and their sequence numbers
//! - Segment identifiers and metadata snapshots
//! - Attribute identifiers and update deltas
//! - Log addresses used as truncation markers

pub mod attribute;
pub mod operation;
pub mod segment;

pub use attribute::{AttributeId, AttributeUpdate, AttributeValue};
pub use operation::{LogAddress, Operation, OperationKind, SequenceNumber};
pub use segment::{ContainerId, SegmentId, SegmentMetadata};
