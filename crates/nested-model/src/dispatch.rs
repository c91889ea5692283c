//! Burst bookkeeping for change notification.
//!
//! The outermost `apply` call opens a burst (`Idle -> Dispatching`). Every
//! call that changed something queues one announcement. Once the outermost
//! call has emitted its own attribute events it drains the queue
//! (`Draining`), emitting one `change` per announcement; re-entrant calls made
//! by `change` listeners append to the same queue, so draining ends only when
//! a round leaves it empty. `finish` returns to `Idle`.

use std::collections::VecDeque;

use crate::options::SetOptions;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Dispatching,
    Draining,
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    phase: Phase,
    pending: VecDeque<SetOptions>,
    rounds: usize,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// `true` while a burst is in progress.
    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Opens a burst if none is active. Returns `true` for the outermost call.
    pub fn begin(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = Phase::Dispatching;
        tracing::trace!("dispatcher: idle -> dispatching");
        true
    }

    pub fn announce(&mut self, options: SetOptions) {
        debug_assert!(self.is_active(), "announcement outside of a burst");
        self.pending.push_back(options);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Pops the oldest pending announcement, entering `Draining`.
    pub fn next_announcement(&mut self) -> Option<SetOptions> {
        if !self.is_active() {
            return None;
        }
        if self.phase == Phase::Dispatching {
            self.phase = Phase::Draining;
            tracing::trace!("dispatcher: dispatching -> draining");
        }
        let next = self.pending.pop_front()?;
        self.rounds += 1;
        Some(next)
    }

    /// Ends the burst and discards anything still queued.
    pub fn finish(&mut self) {
        tracing::trace!(rounds = self.rounds, "dispatcher: settled");
        self.phase = Phase::Idle;
        self.pending.clear();
        self.rounds = 0;
    }
}
