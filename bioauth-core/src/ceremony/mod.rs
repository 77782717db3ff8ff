//! The biometric authentication ceremony.
//!
//! A ceremony moves `Idle → Requested → Prompting` and ends in exactly one
//! [`AuthenticationOutcome`]. Only one ceremony may be in flight per
//! authenticator; the slot is released before the outcome is delivered, so
//! the listener can start the next ceremony right away.

mod completion;
mod outcome;
mod session;
mod worker;

pub use completion::Completion;
pub use outcome::{
    AuthenticationListener, AuthenticationOutcome, CeremonyStart, ChallengeSignature,
    PromptErrorKind, RejectReason, FAILURE_MESSAGE, SUCCESS_MESSAGE,
};
pub use session::{CeremonyState, SessionSlot};
pub use worker::{spawn_worker, PromptCallback};
