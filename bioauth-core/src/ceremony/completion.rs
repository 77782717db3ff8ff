//! Exactly-once outcome delivery.

use std::sync::{Arc, Mutex, PoisonError};

use super::outcome::{AuthenticationListener, AuthenticationOutcome};
use super::session::SessionGuard;

/// Pairs the listener with the session it belongs to.
///
/// The first call to [`Completion::complete`] releases the session and then
/// notifies the listener. Later calls are dropped.
pub struct Completion {
    pending: Mutex<Option<Pending>>,
}

struct Pending {
    listener: Arc<dyn AuthenticationListener>,
    guard: SessionGuard,
}

impl Completion {
    pub fn new(listener: Arc<dyn AuthenticationListener>, guard: SessionGuard) -> Self {
        Self {
            pending: Mutex::new(Some(Pending { listener, guard })),
        }
    }

    /// Moves the session to `Prompting` unless it has already completed.
    pub fn mark_prompting(&self) {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = pending.as_ref() {
            pending.guard.mark_prompting();
        }
    }

    /// Delivers `outcome` if nothing has been delivered yet.
    ///
    /// Returns whether this call delivered the outcome.
    pub fn complete(&self, outcome: AuthenticationOutcome) -> bool {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(Pending { listener, guard }) = pending else {
            log::debug!("ceremony already completed, dropping {outcome:?}");
            return false;
        };

        drop(guard);
        log::info!("biometric ceremony finished: {}", outcome.code());
        listener.on_complete(outcome);
        true
    }
}
