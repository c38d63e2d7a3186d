//! Supervisor lifecycle state machine.
//!
//! ```text
//! Unconfigured ──▶ Configured ──▶ Running
//!      │               ▲             │
//!      ▼               │             ▼
//! AwaitingFirstRun ────┘       ShuttingDown ──▶ Terminated
//!      │                                            ▲
//!      └────────────────────────────────────────────┘
//! ```
//!
//! Any non-terminal state may also move to `ShuttingDown` so that Quit is
//! valid at every point. `Terminated` is absorbing.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unconfigured = 0,
    AwaitingFirstRun = 1,
    Configured = 2,
    Running = 3,
    ShuttingDown = 4,
    Terminated = 5,
}

impl From<u8> for LifecycleState {
    fn from(val: u8) -> Self {
        match val {
            0 => LifecycleState::Unconfigured,
            1 => LifecycleState::AwaitingFirstRun,
            2 => LifecycleState::Configured,
            3 => LifecycleState::Running,
            4 => LifecycleState::ShuttingDown,
            _ => LifecycleState::Terminated,
        }
    }
}

impl LifecycleState {
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        match (self, next) {
            (Terminated, _) => false,
            (ShuttingDown, Terminated) => true,
            (ShuttingDown, _) => false,
            (_, ShuttingDown) => true,
            (Unconfigured, Configured | AwaitingFirstRun) => true,
            (AwaitingFirstRun, Configured | Terminated) => true,
            (Configured, Running) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid lifecycle transition {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

/// Shared lifecycle cell.
///
/// Written only by the gate and the supervisor; everything else reads it.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: Arc<AtomicU8>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(LifecycleState::Unconfigured as u8)),
        }
    }

    pub fn current(&self) -> LifecycleState {
        LifecycleState::from(self.state.load(Ordering::SeqCst))
    }

    /// Move to `next`, returning the previous state.
    pub fn transition(&self, next: LifecycleState) -> Result<LifecycleState, TransitionError> {
        let mut current = self.state.load(Ordering::SeqCst);
        loop {
            let from = LifecycleState::from(current);
            if !from.can_transition_to(next) {
                return Err(TransitionError { from, to: next });
            }
            match self.state.compare_exchange_weak(
                current,
                next as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => {
                    tracing::debug!(from = ?from, to = ?next, "Lifecycle transition");
                    return Ok(from);
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Drive the machine to `Terminated` through `ShuttingDown` from wherever it is.
    pub fn terminate(&self) {
        let _ = self.transition(LifecycleState::ShuttingDown);
        let _ = self.transition(LifecycleState::Terminated);
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
