//! Single-slot session exclusivity.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Observable phase of the authentication ceremony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum CeremonyState {
    /// No ceremony in flight; a new request is accepted.
    Idle,
    /// A request passed the guard and the prompt is being set up.
    Requested,
    /// The platform prompt is showing and its verdict is pending.
    Prompting,
}

const IDLE: u8 = 0;
const REQUESTED: u8 = 1;
const PROMPTING: u8 = 2;

/// Holds the state of the one ceremony allowed at a time.
#[derive(Debug)]
pub struct SessionSlot {
    state: AtomicU8,
}

impl SessionSlot {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(IDLE),
        }
    }

    pub fn state(&self) -> CeremonyState {
        match self.state.load(Ordering::Acquire) {
            REQUESTED => CeremonyState::Requested,
            PROMPTING => CeremonyState::Prompting,
            _ => CeremonyState::Idle,
        }
    }

    /// Claims the slot. Returns `None` if a ceremony is already in flight.
    pub fn try_acquire(self: &Arc<Self>) -> Option<SessionGuard> {
        self.state
            .compare_exchange(IDLE, REQUESTED, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SessionGuard {
                slot: Arc::clone(self),
            })
    }
}

/// Ownership of the slot. Dropping it returns the slot to `Idle`.
#[derive(Debug)]
pub struct SessionGuard {
    slot: Arc<SessionSlot>,
}

impl SessionGuard {
    pub fn mark_prompting(&self) {
        let _ = self.slot.state.compare_exchange(
            REQUESTED,
            PROMPTING,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.slot.state.store(IDLE, Ordering::Release);
    }
}
