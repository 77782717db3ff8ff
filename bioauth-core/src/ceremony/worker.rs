//! Per-ceremony background worker and the callback handed to the prompt.

use std::sync::Arc;
use std::thread;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::sync::mpsc;

use super::completion::Completion;
use super::outcome::{AuthenticationOutcome, ChallengeSignature, PromptErrorKind};
use crate::availability::AvailabilityCode;
use crate::config::AttemptFailurePolicy;
use crate::platform::SigningOperation;

#[derive(Debug)]
enum PromptEvent {
    Succeeded,
    Failed,
    Error {
        kind: PromptErrorKind,
        message: String,
    },
}

/// Receives prompt events from the platform.
///
/// Every method may be called from any thread and returns immediately; the
/// event is processed on the ceremony's own worker. Events arriving after the
/// ceremony has ended are ignored.
#[derive(Debug, uniffi::Object)]
pub struct PromptCallback {
    events: mpsc::UnboundedSender<PromptEvent>,
}

#[uniffi::export]
impl PromptCallback {
    /// The biometric matched and the signing operation is unlocked.
    pub fn on_authentication_succeeded(&self) {
        self.send(PromptEvent::Succeeded);
    }

    /// One match attempt failed. The platform may keep the prompt open.
    pub fn on_authentication_failed(&self) {
        self.send(PromptEvent::Failed);
    }

    /// The prompt ended without a match.
    pub fn on_authentication_error(&self, kind: PromptErrorKind, message: String) {
        self.send(PromptEvent::Error { kind, message });
    }
}

impl PromptCallback {
    fn send(&self, event: PromptEvent) {
        if let Err(err) = self.events.send(event) {
            log::debug!("prompt event after ceremony ended: {:?}", err.0);
        }
    }
}

/// Consumes prompt events for one ceremony and produces its outcome.
struct CeremonyWorker {
    completion: Arc<Completion>,
    operation: Arc<dyn SigningOperation>,
    payload: Option<String>,
    policy: AttemptFailurePolicy,
}

/// Starts a dedicated worker thread for one ceremony.
///
/// The returned callback is the only sender of prompt events. If the
/// platform drops it without reporting a verdict the ceremony resolves as
/// canceled.
pub fn spawn_worker(
    completion: Arc<Completion>,
    operation: Arc<dyn SigningOperation>,
    payload: Option<String>,
    policy: AttemptFailurePolicy,
) -> std::io::Result<Arc<PromptCallback>> {
    let (events, receiver) = mpsc::unbounded_channel();
    let worker = CeremonyWorker {
        completion,
        operation,
        payload,
        policy,
    };
    thread::Builder::new()
        .name("bioauth-ceremony".to_string())
        .spawn(move || worker.run(receiver))?;
    Ok(Arc::new(PromptCallback { events }))
}

impl CeremonyWorker {
    fn run(self, mut events: mpsc::UnboundedReceiver<PromptEvent>) {
        while let Some(event) = events.blocking_recv() {
            if let Some(outcome) = self.handle(event) {
                self.completion.complete(outcome);
                return;
            }
        }

        log::warn!("prompt released without a verdict");
        self.completion.complete(AuthenticationOutcome::failed(
            AvailabilityCode::AuthenticationCanceled,
            Some("prompt released without a verdict".to_string()),
        ));
    }

    fn handle(&self, event: PromptEvent) -> Option<AuthenticationOutcome> {
        match event {
            PromptEvent::Succeeded => Some(self.sign_payload()),
            PromptEvent::Failed => match self.policy {
                AttemptFailurePolicy::Terminal => Some(AuthenticationOutcome::failed(
                    AvailabilityCode::AuthenticationFailed,
                    None,
                )),
                AttemptFailurePolicy::AwaitPlatformVerdict => {
                    log::info!("biometric not recognized, waiting for the platform verdict");
                    None
                }
            },
            PromptEvent::Error { kind, message } => {
                log::info!("biometric prompt ended ({kind}): {message}");
                Some(AuthenticationOutcome::failed(
                    AvailabilityCode::AuthenticationCanceled,
                    Some(format!("{kind}: {message}")),
                ))
            }
        }
    }

    fn sign_payload(&self) -> AuthenticationOutcome {
        let Some(payload) = &self.payload else {
            return AuthenticationOutcome::succeeded(None);
        };

        match self.operation.sign(payload.as_bytes().to_vec()) {
            Ok(signature) => AuthenticationOutcome::succeeded(Some(ChallengeSignature {
                payload: payload.clone(),
                signature: STANDARD.encode(signature),
            })),
            Err(err) => {
                log::error!("signing after biometric match failed: {err}");
                AuthenticationOutcome::failed(AvailabilityCode::NotAvailable, Some(err.to_string()))
            }
        }
    }
}
