// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot completion handles for asynchronous operations

use crate::error::DataSourceError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

/// Resolves once with the outcome of an asynchronous operation
///
/// If the work backing the handle is dropped before producing a result
/// (for example because the runtime shut down) the handle resolves to
/// [`DataSourceError::Cancelled`].
#[must_use = "completions do nothing unless awaited"]
#[derive(Debug)]
pub struct Completion<T> {
    rx: oneshot::Receiver<Result<T, DataSourceError>>,
}

impl<T: Send + 'static> Completion<T> {
    /// Run `work` on the executor and complete with its result
    pub fn spawn<F>(executor: &Handle, work: F) -> Self
    where
        F: Future<Output = Result<T, DataSourceError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        executor.spawn(async move {
            let _ = tx.send(work.await);
        });
        Self { rx }
    }
}

impl<T> Completion<T> {
    /// An already completed handle
    pub fn ready(result: Result<T, DataSourceError>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { rx }
    }

    pub fn failed(err: DataSourceError) -> Self {
        Self::ready(Err(err))
    }
}

impl<T> Future for Completion<T> {
    type Output = Result<T, DataSourceError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(result) => result,
            Err(_) => Err(DataSourceError::Cancelled),
        })
    }
}
