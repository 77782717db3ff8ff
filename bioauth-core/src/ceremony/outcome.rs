use strum::Display;

use crate::availability::AvailabilityCode;

/// Message carried by a successful outcome.
pub const SUCCESS_MESSAGE: &str = "Successfully authenticated.";

/// Message carried by every failed outcome.
pub const FAILURE_MESSAGE: &str = "Not supported";

/// Signature produced over the caller's challenge.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ChallengeSignature {
    /// The challenge exactly as supplied by the caller.
    pub payload: String,
    /// Base64 signature over the UTF-8 bytes of `payload`.
    pub signature: String,
}

/// Terminal result of one authentication ceremony.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum AuthenticationOutcome {
    /// The biometric matched.
    Succeeded {
        /// Confirmation message.
        message: String,
        /// Signature over the request payload, if one was supplied.
        signature: Option<ChallengeSignature>,
    },
    /// The ceremony ended without a match.
    Failed {
        /// Failure message.
        message: String,
        /// Why the ceremony failed.
        code: AvailabilityCode,
        /// Platform detail, when there is any.
        detail: Option<String>,
    },
}

impl AuthenticationOutcome {
    pub(crate) fn succeeded(signature: Option<ChallengeSignature>) -> Self {
        Self::Succeeded {
            message: SUCCESS_MESSAGE.to_string(),
            signature,
        }
    }

    pub(crate) fn failed(code: AvailabilityCode, detail: Option<String>) -> Self {
        Self::Failed {
            message: FAILURE_MESSAGE.to_string(),
            code,
            detail,
        }
    }

    /// Whether the biometric matched.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// The outcome as an availability code; `IS_SUPPORTED` on success.
    #[must_use]
    pub const fn code(&self) -> AvailabilityCode {
        match self {
            Self::Succeeded { .. } => AvailabilityCode::IsSupported,
            Self::Failed { code, .. } => *code,
        }
    }
}

/// Reason the platform gave for ending the prompt without a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, uniffi::Enum)]
#[strum(serialize_all = "snake_case")]
pub enum PromptErrorKind {
    /// The user dismissed the prompt.
    UserCanceled,
    /// The user pressed the negative button.
    NegativeButton,
    /// The system canceled the prompt (e.g. the app lost focus).
    SystemCanceled,
    /// The prompt timed out.
    Timeout,
    /// Too many failed attempts; the sensor is temporarily locked.
    Lockout,
    /// Too many failed attempts; a device credential is required to unlock.
    LockoutPermanent,
    /// The sensor reported a hardware error.
    HardwareError,
    /// Any other platform error.
    Other,
}

/// Why a request was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, uniffi::Enum)]
#[strum(serialize_all = "snake_case")]
pub enum RejectReason {
    /// Another ceremony is in flight.
    SessionActive,
    /// The host application is not in the foreground.
    HostInBackground,
    /// The platform has no UI context to show a prompt in.
    NoUiContext,
}

/// Immediate answer to an authentication request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum CeremonyStart {
    /// The ceremony started; the listener will be called exactly once.
    Started,
    /// The request was dropped; the listener will never be called.
    Ignored {
        /// Which guard rejected the request.
        reason: RejectReason,
    },
}

/// Receives the outcome of a ceremony.
#[uniffi::export(with_foreign)]
pub trait AuthenticationListener: Send + Sync {
    /// Called exactly once per started ceremony, after the session has been
    /// released.
    fn on_complete(&self, outcome: AuthenticationOutcome);
}
