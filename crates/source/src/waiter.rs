// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Joinable wait slots
//!
//! A slot holds at most one pending notification. Every party that waits on
//! the slot while it is pending shares that notification; resolving the slot
//! wakes all of them and empties it.

use tokio::sync::watch;

/// How a wait ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    Completed,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotState {
    Pending,
    Done(WaitOutcome),
}

/// Single optional pending notification
#[derive(Debug, Default)]
pub struct WaitSlot {
    sender: Option<watch::Sender<SlotState>>,
}

impl WaitSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait on the pending notification, creating it if there is none
    pub fn join(&mut self) -> Waiter {
        let sender = self
            .sender
            .get_or_insert_with(|| watch::channel(SlotState::Pending).0);
        Waiter {
            rx: sender.subscribe(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.sender.is_some()
    }

    /// Number of waiters currently attached
    pub fn waiter_count(&self) -> usize {
        self.sender.as_ref().map_or(0, |s| s.receiver_count())
    }

    /// Wake every waiter with [`WaitOutcome::Completed`]
    ///
    /// Returns false if nothing was pending.
    pub fn complete(&mut self) -> bool {
        self.resolve(WaitOutcome::Completed)
    }

    /// Wake every waiter with [`WaitOutcome::Cancelled`]
    pub fn cancel(&mut self) -> bool {
        self.resolve(WaitOutcome::Cancelled)
    }

    /// Empty the slot if every waiter has gone away
    pub fn release_if_abandoned(&mut self) -> bool {
        if self.is_pending() && self.waiter_count() == 0 {
            self.sender = None;
            true
        } else {
            false
        }
    }

    fn resolve(&mut self, outcome: WaitOutcome) -> bool {
        match self.sender.take() {
            Some(sender) => {
                sender.send_replace(SlotState::Done(outcome));
                true
            }
            None => false,
        }
    }
}

/// One party's handle on a pending notification
#[derive(Debug)]
pub struct Waiter {
    rx: watch::Receiver<SlotState>,
}

impl Waiter {
    pub async fn wait(mut self) -> WaitOutcome {
        let state = self
            .rx
            .wait_for(|state| *state != SlotState::Pending)
            .await
            .map(|state| *state);
        match state {
            Ok(SlotState::Done(outcome)) => outcome,
            // The slot was dropped without being resolved
            Ok(SlotState::Pending) | Err(_) => WaitOutcome::Cancelled,
        }
    }
}

#[cfg(test)]
#[path = "waiter_tests.rs"]
mod tests;
