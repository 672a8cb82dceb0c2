// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the data source

use crate::config::ConfigError;
use std::time::Duration;
use thiserror::Error;
use wds_core::{SegmentId, SequenceNumber};
use wds_storage::{AttributeError, LogError};

/// Errors surfaced by data source operations
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("data source is closed")]
    Closed,
    #[error("operation already has sequence number {0}")]
    AlreadySequenced(SequenceNumber),
    #[error("invalid truncation point {0}: must refer to a metadata checkpoint")]
    InvalidTruncationPoint(SequenceNumber),
    #[error("log error: {0}")]
    Log(#[from] LogError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("segment not found: {0}")]
    SegmentNotFound(SegmentId),
    #[error("segment sealed: {0}")]
    SegmentSealed(SegmentId),
    #[error("injected failure: {0}")]
    Injected(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("operation cancelled")]
    Cancelled,
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl DataSourceError {
    /// Caller misuse or a broken internal invariant; never worth retrying
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            DataSourceError::AlreadySequenced(_)
                | DataSourceError::InvalidTruncationPoint(_)
                | DataSourceError::Log(_)
                | DataSourceError::InvalidArgument(_)
        )
    }
}

impl From<AttributeError> for DataSourceError {
    fn from(err: AttributeError) -> Self {
        match err {
            AttributeError::SegmentNotFound(id) => DataSourceError::SegmentNotFound(id),
            AttributeError::SegmentSealed(id) => DataSourceError::SegmentSealed(id),
        }
    }
}
