//! Startup barrier and run-state tracking for the coordinator.

use log::debug;
use parking_lot::{Condvar, Mutex};

use crate::RunState;

/// Counts workers that have announced they are ready to consume.
#[derive(Default)]
pub struct StartupBarrier {
    ready: Mutex<usize>,
    cv: Condvar,
}

impl StartupBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once by each worker before its first dequeue.
    pub fn announce_ready(&self) {
        let mut ready = self.ready.lock();
        *ready += 1;
        self.cv.notify_all();
    }

    /// Block until at least `n` workers have announced readiness.
    pub fn wait_for(&self, n: usize) {
        let mut ready = self.ready.lock();
        while *ready < n {
            self.cv.wait(&mut ready);
        }
    }

    pub fn ready(&self) -> usize {
        *self.ready.lock()
    }
}

/// Forward-only state of one run, logged on every transition.
pub struct RunStateTracker {
    state: RunState,
}

impl Default for RunStateTracker {
    fn default() -> Self {
        Self {
            state: RunState::Idle,
        }
    }
}

impl RunStateTracker {
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Move to `next`. Transitions only go forward; a backwards move is a bug.
    pub fn advance(&mut self, next: RunState) {
        debug_assert!(next > self.state, "{:?} -> {:?}", self.state, next);
        debug!("run state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
