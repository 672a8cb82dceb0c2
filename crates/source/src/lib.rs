// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Writer data source
//!
//! The [`WriterDataSource`] trait is what a segment container's Writer reads
//! operations from and reports progress to. [`InMemoryDataSource`] implements
//! it entirely in memory, with hooks and fault injection for exercising the
//! Writer under test.

pub mod completion;
pub mod config;
pub mod error;
pub mod fault;
pub mod memory;
pub mod source;
pub mod waiter;

pub use completion::Completion;
pub use config::{ConfigError, DataSourceConfig};
pub use error::DataSourceError;
pub use fault::{ErrorInjector, FaultPoint, FaultPoints};
pub use memory::{AppendDataHook, InMemoryDataSource, MergeCallback, SegmentMetadataHook};
pub use source::{ReadBatch, WriterDataSource};
pub use waiter::{WaitOutcome, WaitSlot, Waiter};
