//! Platform interfaces implemented by the host.
//!
//! The bridge never talks to the OS directly. Each capability it needs is a
//! foreign trait that the host implements on top of its native APIs:
//!
//! - [`PlatformProvider`]: OS version and access to the components below
//! - [`BiometricSensor`]: hardware presence, availability and enrollment
//! - [`HardwareKeystore`]: key generation, lookup, removal and signing setup
//! - [`SigningOperation`]: one signature, authorized by a biometric match
//! - [`PromptPresenter`]: shows the system biometric prompt
//!
//! ## Android (Kotlin)
//! - `BiometricSensor`: `BiometricManager.canAuthenticate()`
//! - `HardwareKeystore`: `AndroidKeyStore` with `KeyGenParameterSpec`
//! - `SigningOperation`: `Signature("SHA256withRSA")` wrapped in a `CryptoObject`
//! - `PromptPresenter`: `BiometricPrompt` on the UI thread
//!
//! ## iOS (Swift)
//! - `BiometricSensor`: `LAContext.canEvaluatePolicy`
//! - `HardwareKeystore`: Secure Enclave keys with `biometryCurrentSet` access control
//! - `SigningOperation`: `SecKeyCreateSignature` under an evaluated `LAContext`
//! - `PromptPresenter`: `LAContext.evaluatePolicy`

use std::sync::Arc;

use crate::availability::SensorState;
use crate::ceremony::PromptCallback;
use crate::error::PlatformResult;
use crate::keys::KeySpec;
use crate::prompt::PromptInfo;

/// Entry point the host hands to the bridge.
#[uniffi::export(with_foreign)]
pub trait PlatformProvider: Send + Sync {
    /// Returns the OS API level (Android SDK level, iOS major version).
    fn os_version(&self) -> u32;

    /// Returns the biometric sensor, or `None` when there is no UI context to
    /// query it from.
    fn biometric_sensor(&self) -> Option<Arc<dyn BiometricSensor>>;

    /// Returns the hardware-backed key store.
    fn keystore(&self) -> Arc<dyn HardwareKeystore>;

    /// Returns the prompt presenter, or `None` when no UI context is active.
    fn prompt_presenter(&self) -> Option<Arc<dyn PromptPresenter>>;
}

/// Biometric hardware and enrollment status.
#[uniffi::export(with_foreign)]
pub trait BiometricSensor: Send + Sync {
    /// Queries the current sensor state.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot answer the query.
    fn probe(&self) -> PlatformResult<SensorState>;
}

/// Hardware-backed key store holding the biometric signing key.
///
/// The private key must never leave secure hardware. Only the public key and
/// signatures cross the bridge.
#[uniffi::export(with_foreign)]
pub trait HardwareKeystore: Send + Sync {
    /// Generates a keypair as described by `spec`, replacing any key under
    /// the same alias, and returns the DER-encoded public key
    /// (`SubjectPublicKeyInfo`).
    ///
    /// # Errors
    ///
    /// Returns an error if the key store rejects the spec or generation fails.
    fn generate_key_pair(&self, spec: KeySpec) -> PlatformResult<Vec<u8>>;

    /// Returns whether a key exists under `alias`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key store cannot be loaded.
    fn contains_alias(&self, alias: String) -> PlatformResult<bool>;

    /// Deletes the key under `alias`. Deleting a missing alias is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the key store cannot be loaded or the entry removed.
    fn delete_entry(&self, alias: String) -> PlatformResult<()>;

    /// Initializes a signing operation bound to the private key under
    /// `alias`. The operation stays locked until a biometric match
    /// authorizes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing, invalidated by a new
    /// enrollment, or the signature cannot be initialized.
    fn begin_signing(&self, alias: String) -> PlatformResult<Arc<dyn SigningOperation>>;
}

/// A single signature over caller data, unlocked by one biometric match.
#[uniffi::export(with_foreign)]
pub trait SigningOperation: Send + Sync {
    /// Signs `payload` with the unlocked private key.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation was not authorized or signing fails.
    fn sign(&self, payload: Vec<u8>) -> PlatformResult<Vec<u8>>;
}

/// Shows the platform biometric prompt.
#[uniffi::export(with_foreign)]
pub trait PromptPresenter: Send + Sync {
    /// Schedules the prompt and returns without waiting for it.
    ///
    /// Implementations switch to the UI thread themselves, bind `operation`
    /// to the prompt so a match authorizes exactly one signature, and report
    /// every prompt event to `callback`.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be scheduled.
    fn present(
        &self,
        info: PromptInfo,
        operation: Arc<dyn SigningOperation>,
        callback: Arc<PromptCallback>,
    ) -> PlatformResult<()>;
}
