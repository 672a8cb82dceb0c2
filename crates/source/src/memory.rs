// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory data source
//!
//! Accumulates operations in memory the way a durable log would, and keeps
//! attributes and append bytes for the Writer to consume. Container metadata
//! is the only external dependency; apart from sequence numbers and
//! truncation bookkeeping, segment metadata must be changed by the caller.

use crate::completion::Completion;
use crate::config::DataSourceConfig;
use crate::error::DataSourceError;
use crate::fault::{ErrorInjector, FaultPoint, FaultPoints};
use crate::source::{ReadBatch, WriterDataSource};
use crate::waiter::{WaitOutcome, WaitSlot, Waiter};
use bytes::Bytes;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::{debug, trace};
use wds_adapters::ContainerMetadata;
use wds_core::{
    AttributeId, AttributeUpdate, ContainerId, LogAddress, Operation, SegmentId, SegmentMetadata,
    SequenceNumber,
};
use wds_storage::{AttributeStore, FragmentStore, SequencedLog};

/// Invoked with `(target, source)` when a merge completes
pub type MergeCallback = Arc<dyn Fn(SegmentId, SegmentId) + Send + Sync>;
/// Invoked before append data is looked up
pub type AppendDataHook = Arc<dyn Fn() + Send + Sync>;
/// Invoked whenever the Writer asks for a segment's metadata
pub type SegmentMetadataHook = Arc<dyn Fn(SegmentId) + Send + Sync>;

/// Everything guarded by the data source lock
#[derive(Default)]
struct State {
    log: SequencedLog<Operation>,
    attributes: AttributeStore,
    fragments: FragmentStore,
    /// Readers waiting for the next add
    add_processed: WaitSlot,
    /// Parties waiting for the log to drain
    fully_acked: WaitSlot,
    faults: FaultPoints,
    /// Sequence number of the last auto-inserted checkpoint
    last_auto_checkpoint: SequenceNumber,
    complete_merge: Option<MergeCallback>,
    on_get_append_data: Option<AppendDataHook>,
    segment_metadata_requested: Option<SegmentMetadataHook>,
}

struct Inner<M> {
    metadata: M,
    executor: Handle,
    config: DataSourceConfig,
    ack_effective: AtomicBool,
    closed: AtomicBool,
    state: Mutex<State>,
}

enum ReadAttempt {
    Ready(ReadBatch),
    Wait(Waiter),
}

/// Writer data source backed by process memory
///
/// Clones share the same log, attributes and append data.
pub struct InMemoryDataSource<M> {
    inner: Arc<Inner<M>>,
}

impl<M> Clone for InMemoryDataSource<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: ContainerMetadata> InMemoryDataSource<M> {
    /// Create a data source that completes asynchronous work on `executor`
    pub fn new(
        metadata: M,
        executor: Handle,
        config: DataSourceConfig,
    ) -> Result<Self, DataSourceError> {
        config.validate()?;
        let ack_effective = config.ack_effective;
        Ok(Self {
            inner: Arc::new(Inner {
                metadata,
                executor,
                config,
                ack_effective: AtomicBool::new(ack_effective),
                closed: AtomicBool::new(false),
                state: Mutex::new(State::default()),
            }),
        })
    }

    pub fn config(&self) -> &DataSourceConfig {
        &self.inner.config
    }

    pub fn metadata(&self) -> &M {
        &self.inner.metadata
    }

    /// Sequence and append an operation; returns its sequence number
    ///
    /// If a checkpoint is due it is added first, so it gets the smaller
    /// sequence number.
    pub fn add(&self, operation: Operation) -> Result<SequenceNumber, DataSourceError> {
        self.check_not_closed()?;
        if let Some(sequence) = operation.sequence_number() {
            return Err(DataSourceError::AlreadySequenced(sequence));
        }

        let mut state = self.lock();
        // A close that raced the check above must still win
        self.check_not_closed()?;
        if let Some(err) = state.faults.check(FaultPoint::Add) {
            return Err(err);
        }

        if !operation.is_checkpoint() && self.checkpoint_due(&state) {
            let sequence = self.append_locked(&mut state, Operation::checkpoint())?;
            state.last_auto_checkpoint = sequence;
            debug!(sequence, "auto-inserted metadata checkpoint");
        }

        let sequence = self.append_locked(&mut state, operation)?;
        if state.add_processed.complete() {
            trace!(sequence, "woke readers waiting for add");
        }
        Ok(sequence)
    }

    /// Record the bytes of an append so `get_append_data` can serve them
    pub fn record_append(
        &self,
        segment_id: SegmentId,
        offset: u64,
        data: impl Into<Bytes>,
    ) -> Result<(), DataSourceError> {
        self.check_not_closed()?;
        let data = data.into();
        trace!(%segment_id, offset, length = data.len(), "recording append data");
        let mut state = self.lock();
        self.check_not_closed()?;
        state.fragments.record(segment_id, offset, data);
        Ok(())
    }

    /// Forget all append data, as if long-term storage had absorbed it
    pub fn clear_append_data(&self) {
        self.lock().fragments.clear();
        debug!("append data cleared");
    }

    /// Whether acknowledgements truncate the log
    pub fn set_ack_effective(&self, effective: bool) {
        self.inner.ack_effective.store(effective, Ordering::SeqCst);
    }

    pub fn set_error_injector(&self, point: FaultPoint, injector: Option<ErrorInjector>) {
        self.lock().faults.set(point, injector);
    }

    pub fn set_complete_merge_callback(&self, callback: Option<MergeCallback>) {
        self.lock().complete_merge = callback;
    }

    pub fn set_on_get_append_data(&self, hook: Option<AppendDataHook>) {
        self.lock().on_get_append_data = hook;
    }

    pub fn set_segment_metadata_requested(&self, hook: Option<SegmentMetadataHook>) {
        self.lock().segment_metadata_requested = hook;
    }

    /// Completes once the log is empty
    ///
    /// Resolves immediately if the log is already empty and nobody else is
    /// waiting; otherwise joins the pending drain notification.
    pub fn wait_fully_acked(&self) -> Result<Completion<()>, DataSourceError> {
        let waiter = {
            let mut state = self.lock();
            self.check_not_closed()?;
            if !state.fully_acked.is_pending() && state.log.is_empty() {
                return Ok(Completion::ready(Ok(())));
            }
            state.fully_acked.join()
        };

        Ok(self.spawn(async move {
            match waiter.wait().await {
                WaitOutcome::Completed => Ok(()),
                WaitOutcome::Cancelled => Err(DataSourceError::Cancelled),
            }
        }))
    }

    /// Copy of a segment's attributes; empty if never set or deleted
    pub fn get_persisted_attributes(&self, segment_id: SegmentId) -> HashMap<AttributeId, i64> {
        self.lock().attributes.snapshot(segment_id)
    }

    /// Sequence number of the newest operation still in the log
    pub fn last_sequence_number(&self) -> Option<SequenceNumber> {
        self.lock().log.last_sequence()
    }

    /// Close the data source and cancel every pending wait
    ///
    /// Closing twice is a no-op.
    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut state = self.lock();
        let cancelled_reads = state.add_processed.cancel();
        let cancelled_drain = state.fully_acked.cancel();
        debug!(
            container_id = self.inner.metadata.container_id(),
            cancelled_reads, cancelled_drain, "data source closed"
        );
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_not_closed(&self) -> Result<(), DataSourceError> {
        if self.is_closed() {
            return Err(DataSourceError::Closed);
        }
        Ok(())
    }

    fn spawn<T, F>(&self, work: F) -> Completion<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, DataSourceError>> + Send + 'static,
    {
        Completion::spawn(&self.inner.executor, work)
    }

    fn checkpoint_due(&self, state: &State) -> bool {
        match self.inner.config.auto_checkpoint_frequency {
            Some(frequency) => {
                let since = self
                    .inner
                    .metadata
                    .current_sequence_number()
                    .saturating_sub(state.last_auto_checkpoint);
                since >= frequency
            }
            None => false,
        }
    }

    /// Assign the next sequence number and append to the log
    ///
    /// Checkpoints get their truncation marker before they become visible in
    /// the log, so any reader that sees one can already truncate to it.
    fn append_locked(
        &self,
        state: &mut State,
        mut operation: Operation,
    ) -> Result<SequenceNumber, DataSourceError> {
        let metadata = &self.inner.metadata;
        let sequence = metadata.next_sequence_number();
        operation.set_sequence_number(sequence);

        if operation.is_checkpoint() {
            metadata.record_truncation_marker(sequence, LogAddress::new(sequence));
            metadata.set_valid_truncation_point(sequence);
        }

        let kind = operation.name();
        state.log.append(sequence, Arc::new(operation))?;
        trace!(sequence, kind, "operation added");
        Ok(sequence)
    }

    fn truncate(&self, up_to: SequenceNumber) {
        let mut state = self.lock();
        if self.inner.ack_effective.load(Ordering::SeqCst) {
            let removed = state.log.truncate(up_to);
            self.inner.metadata.remove_truncation_markers(up_to);
            debug!(up_to, removed, "log truncated");
        } else {
            debug!(up_to, "acknowledgement ineffective, log left untouched");
        }

        // Compare against the tail rather than emptiness: an ineffective ack
        // leaves entries behind
        let drained = state.log.last_sequence().map_or(true, |last| last <= up_to);
        if drained && state.fully_acked.complete() {
            debug!(up_to, "log fully acknowledged");
        }
    }

    fn persist_now(
        &self,
        segment_id: SegmentId,
        updates: &[AttributeUpdate],
    ) -> Result<(), DataSourceError> {
        self.lock().attributes.apply(segment_id, updates)?;
        trace!(%segment_id, count = updates.len(), "attributes persisted");
        Ok(())
    }

    fn try_read(
        &self,
        after: SequenceNumber,
        max_count: usize,
    ) -> Result<ReadAttempt, DataSourceError> {
        let mut state = self.lock();
        // Checked under the lock so a waiter can never join after close()
        // cancelled the slot
        self.check_not_closed()?;

        let batch = state.log.read(after, max_count);
        if !batch.is_empty() || max_count == 0 {
            return Ok(ReadAttempt::Ready(batch));
        }
        Ok(ReadAttempt::Wait(state.add_processed.join()))
    }

    async fn wait_and_read(
        self,
        after: SequenceNumber,
        max_count: usize,
        deadline: Option<Instant>,
        timeout: Duration,
        mut waiter: Waiter,
    ) -> Result<ReadBatch, DataSourceError> {
        loop {
            let outcome = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, waiter.wait()).await.ok(),
                None => Some(waiter.wait().await),
            };

            match outcome {
                Some(WaitOutcome::Completed) => {}
                Some(WaitOutcome::Cancelled) => return Err(DataSourceError::Cancelled),
                None => {
                    let released = self.lock().add_processed.release_if_abandoned();
                    debug!(after, ?timeout, released, "read timed out");
                    return Err(DataSourceError::Timeout(timeout));
                }
            }

            waiter = match self.try_read(after, max_count) {
                Ok(ReadAttempt::Ready(batch)) => return Ok(batch),
                Ok(ReadAttempt::Wait(next)) => next,
                Err(_) => return Err(DataSourceError::Cancelled),
            };
        }
    }
}

impl<M: ContainerMetadata> WriterDataSource for InMemoryDataSource<M> {
    fn id(&self) -> ContainerId {
        self.inner.metadata.container_id()
    }

    fn acknowledge(
        &self,
        up_to: SequenceNumber,
        _timeout: Duration,
    ) -> Result<Completion<()>, DataSourceError> {
        self.check_not_closed()?;
        if !self.inner.metadata.is_valid_truncation_point(up_to) {
            return Err(DataSourceError::InvalidTruncationPoint(up_to));
        }

        {
            let state = self.lock();
            if let Some(err) = state.faults.check(FaultPoint::AckSync) {
                return Err(err);
            }
            if let Some(err) = state.faults.check(FaultPoint::AckAsync) {
                return Ok(Completion::failed(err));
            }
        }

        let this = self.clone();
        Ok(self.spawn(async move {
            this.truncate(up_to);
            Ok(())
        }))
    }

    fn persist_attributes(
        &self,
        segment_id: SegmentId,
        updates: Vec<AttributeUpdate>,
        _timeout: Duration,
    ) -> Result<Completion<()>, DataSourceError> {
        self.check_not_closed()?;
        if let Some(err) = self.lock().faults.check(FaultPoint::PersistAttributes) {
            return Ok(Completion::failed(err));
        }

        let this = self.clone();
        Ok(self.spawn(async move { this.persist_now(segment_id, &updates) }))
    }

    fn seal_attributes(
        &self,
        segment_id: SegmentId,
        _timeout: Duration,
    ) -> Result<Completion<()>, DataSourceError> {
        self.check_not_closed()?;
        if let Some(err) = self.lock().faults.check(FaultPoint::SealAttributes) {
            return Ok(Completion::failed(err));
        }

        let this = self.clone();
        Ok(self.spawn(async move {
            this.lock().attributes.seal(segment_id);
            debug!(%segment_id, "attributes sealed");
            Ok(())
        }))
    }

    fn delete_all_attributes(
        &self,
        segment: &SegmentMetadata,
        _timeout: Duration,
    ) -> Result<Completion<()>, DataSourceError> {
        self.check_not_closed()?;
        if let Some(err) = self.lock().faults.check(FaultPoint::DeleteAttributes) {
            return Ok(Completion::failed(err));
        }

        let segment_id = segment.id;
        let this = self.clone();
        Ok(self.spawn(async move {
            this.lock().attributes.delete_all(segment_id);
            debug!(%segment_id, "attributes deleted");
            Ok(())
        }))
    }

    fn read(
        &self,
        after: SequenceNumber,
        max_count: usize,
        timeout: Duration,
    ) -> Result<Completion<ReadBatch>, DataSourceError> {
        self.check_not_closed()?;
        {
            let state = self.lock();
            if let Some(err) = state.faults.check(FaultPoint::ReadSync) {
                return Err(err);
            }
            if let Some(err) = state.faults.check(FaultPoint::ReadAsync) {
                return Ok(Completion::failed(err));
            }
        }

        let deadline = Instant::now().checked_add(timeout);
        match self.try_read(after, max_count)? {
            ReadAttempt::Ready(batch) => Ok(Completion::ready(Ok(batch))),
            ReadAttempt::Wait(waiter) => {
                trace!(after, max_count, "no operations yet, waiting for add");
                let this = self.clone();
                Ok(self.spawn(this.wait_and_read(after, max_count, deadline, timeout, waiter)))
            }
        }
    }

    fn complete_merge(
        &self,
        target_id: SegmentId,
        source_id: SegmentId,
    ) -> Result<(), DataSourceError> {
        self.check_not_closed()?;
        let callback = self.lock().complete_merge.clone();
        if let Some(callback) = callback {
            callback(target_id, source_id);
        }
        Ok(())
    }

    fn get_append_data(
        &self,
        segment_id: SegmentId,
        start_offset: u64,
        length: usize,
    ) -> Result<Option<Bytes>, DataSourceError> {
        self.check_not_closed()?;
        let hook = {
            let state = self.lock();
            if let Some(err) = state.faults.check(FaultPoint::GetAppendData) {
                return Err(err);
            }
            state.on_get_append_data.clone()
        };
        if let Some(hook) = hook {
            hook();
        }

        let state = self.lock();
        let segment = self
            .inner
            .metadata
            .segment_metadata(segment_id)
            .ok_or(DataSourceError::SegmentNotFound(segment_id))?;
        check_append_bounds(&segment, start_offset, length)?;

        let data = state.fragments.read(segment_id, start_offset, length);
        if data.is_none() {
            trace!(%segment_id, start_offset, length, "append data not available");
        }
        Ok(data)
    }

    fn is_valid_truncation_point(&self, sequence: SequenceNumber) -> bool {
        self.inner.metadata.is_valid_truncation_point(sequence)
    }

    fn closest_valid_truncation_point(&self, sequence: SequenceNumber) -> Option<SequenceNumber> {
        self.inner.metadata.closest_valid_truncation_point(sequence)
    }

    fn segment_metadata(&self, segment_id: SegmentId) -> Option<SegmentMetadata> {
        let hook = self.lock().segment_metadata_requested.clone();
        if let Some(hook) = hook {
            hook(segment_id);
        }
        self.inner.metadata.segment_metadata(segment_id)
    }
}

/// Same checks the read index applies before serving a range
fn check_append_bounds(
    segment: &SegmentMetadata,
    start_offset: u64,
    length: usize,
) -> Result<(), DataSourceError> {
    if start_offset < segment.storage_length {
        return Err(DataSourceError::InvalidArgument(format!(
            "start offset {} is below the storage length {} of {}",
            start_offset, segment.storage_length, segment.id
        )));
    }
    if start_offset < segment.start_offset {
        return Err(DataSourceError::InvalidArgument(format!(
            "start offset {} is before the start offset {} of {}",
            start_offset, segment.start_offset, segment.id
        )));
    }
    let end = start_offset.checked_add(length as u64).ok_or_else(|| {
        DataSourceError::InvalidArgument(format!("range overflows at offset {}", start_offset))
    })?;
    if end > segment.length {
        return Err(DataSourceError::InvalidArgument(format!(
            "range end {} exceeds the length {} of {}",
            end, segment.length, segment.id
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
