// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault injection for data source operations
//!
//! Synchronous fault points fail the call itself before any work starts.
//! Asynchronous fault points return a completion that has already failed;
//! the operation never takes effect in either case.

use crate::error::DataSourceError;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Trigger = Arc<dyn Fn(u64) -> bool + Send + Sync>;
type Factory = Arc<dyn Fn() -> DataSourceError + Send + Sync>;

/// Produces an error on the calls selected by a trigger
///
/// The trigger sees the 1-based count of calls made so far, including the
/// current one. Clones share the counters.
#[derive(Clone)]
pub struct ErrorInjector {
    trigger: Trigger,
    factory: Factory,
    calls: Arc<AtomicU64>,
    injected: Arc<AtomicU64>,
}

impl ErrorInjector {
    pub fn new<T, F>(trigger: T, factory: F) -> Self
    where
        T: Fn(u64) -> bool + Send + Sync + 'static,
        F: Fn() -> DataSourceError + Send + Sync + 'static,
    {
        Self {
            trigger: Arc::new(trigger),
            factory: Arc::new(factory),
            calls: Arc::new(AtomicU64::new(0)),
            injected: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fail every `n`-th call with [`DataSourceError::Injected`]; `0` never fails
    pub fn every(n: u64) -> Self {
        Self::new(
            move |count| n != 0 && count % n == 0,
            || DataSourceError::Injected("intentional failure".to_string()),
        )
    }

    /// Fail every call
    pub fn always() -> Self {
        Self::every(1)
    }

    /// Count a call and return the error to inject, if any
    pub fn check(&self) -> Option<DataSourceError> {
        let count = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if (self.trigger)(count) {
            self.injected.fetch_add(1, Ordering::SeqCst);
            Some((self.factory)())
        } else {
            None
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn injected(&self) -> u64 {
        self.injected.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for ErrorInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorInjector")
            .field("calls", &self.calls())
            .field("injected", &self.injected())
            .finish()
    }
}

/// Where a fault can be injected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    Add,
    ReadSync,
    ReadAsync,
    AckSync,
    AckAsync,
    GetAppendData,
    PersistAttributes,
    SealAttributes,
    DeleteAttributes,
}

impl FaultPoint {
    /// Whether faults here fail the call rather than its completion
    pub fn is_sync(&self) -> bool {
        matches!(
            self,
            FaultPoint::Add | FaultPoint::ReadSync | FaultPoint::AckSync | FaultPoint::GetAppendData
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            FaultPoint::Add => "add",
            FaultPoint::ReadSync => "read.sync",
            FaultPoint::ReadAsync => "read.async",
            FaultPoint::AckSync => "ack.sync",
            FaultPoint::AckAsync => "ack.async",
            FaultPoint::GetAppendData => "get_append_data",
            FaultPoint::PersistAttributes => "persist_attributes",
            FaultPoint::SealAttributes => "seal_attributes",
            FaultPoint::DeleteAttributes => "delete_all_attributes",
        }
    }
}

/// The injectors installed at each fault point
#[derive(Clone, Debug, Default)]
pub struct FaultPoints {
    injectors: HashMap<FaultPoint, ErrorInjector>,
}

impl FaultPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or remove the injector at `point`
    pub fn set(&mut self, point: FaultPoint, injector: Option<ErrorInjector>) {
        match injector {
            Some(injector) => {
                self.injectors.insert(point, injector);
            }
            None => {
                self.injectors.remove(&point);
            }
        }
    }

    pub fn get(&self, point: FaultPoint) -> Option<&ErrorInjector> {
        self.injectors.get(&point)
    }

    /// Consult the injector at `point`, if one is installed
    pub fn check(&self, point: FaultPoint) -> Option<DataSourceError> {
        let err = self.injectors.get(&point)?.check()?;
        tracing::warn!(point = point.name(), error = %err, "injecting fault");
        Some(err)
    }
}

#[cfg(test)]
#[path = "fault_tests.rs"]
mod tests;
