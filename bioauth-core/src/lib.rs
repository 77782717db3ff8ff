//! `bioauth` bridges platform biometric authentication and a hardware-backed
//! signing key to cross-platform hosts.
//!
//! The host implements the [`platform`] traits on top of its native APIs and
//! drives everything through a [`BiometricAuthenticator`]:
//!
//! - capability checks ([`BiometricAuthenticator::check_availability`])
//! - the signing key lifecycle ([`BiometricAuthenticator::create_keys`])
//! - authentication ceremonies ([`BiometricAuthenticator::authenticate`]) that
//!   optionally sign a challenge once the biometric matches
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

mod authenticator;
pub use authenticator::*;

mod availability;
pub use availability::{availability_code_value, AvailabilityCode, SensorState};

mod ceremony;
pub use ceremony::{
    AuthenticationListener, AuthenticationOutcome, CeremonyStart, CeremonyState,
    ChallengeSignature, PromptCallback, PromptErrorKind, RejectReason, FAILURE_MESSAGE,
    SUCCESS_MESSAGE,
};

mod config;
pub use config::*;

mod error;
pub use error::*;

mod keys;
pub use keys::{KeyAlgorithm, KeySpec, PublicKey, SignatureDigest, SignaturePadding, RSA_F4};

/// Host logging bridge.
pub mod logger;

pub mod platform;

mod prompt;
pub use prompt::*;

#[cfg(test)]
mod test_support;

uniffi::setup_scaffolding!("bioauth_core");
