// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! In-memory structures behind the Writer data source
//!
//! None of these types lock; the data source guards all of them with a
//! single mutex.

pub mod attributes;
pub mod fragments;
pub mod log;

pub use attributes::{AttributeError, AttributeStore, SegmentAttributes};
pub use fragments::{FragmentStore, SegmentFragments};
pub use log::{LogError, SequencedLog};
