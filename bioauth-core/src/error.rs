use thiserror::Error;

use crate::availability::AvailabilityCode;

/// Result type for operations exposed to the host.
pub type BiometricResult<T, E = BiometricError> = std::result::Result<T, E>;

/// Error outputs from `bioauth`.
#[derive(Debug, Error, uniffi::Error)]
pub enum BiometricError {
    /// Biometric authentication cannot be used right now.
    #[error("not_supported: {code}")]
    NotSupported {
        /// The availability code explaining why.
        code: AvailabilityCode,
    },
    /// The OS version is below the floor required for hardware-backed keys.
    #[error("unsupported_platform: os version {os_version} is below {minimum}")]
    UnsupportedPlatform {
        /// The OS version reported by the platform.
        os_version: u32,
        /// The minimum OS version required.
        minimum: u32,
    },
    /// The keystore failed to generate the signing keypair.
    #[error("key_generation_error: {0}")]
    KeyGeneration(String),
    /// The bridge configuration is not valid.
    #[error("invalid_config: {0}")]
    InvalidConfig(String),
}

/// Result type for calls into the platform.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors raised by the host's platform implementations.
#[derive(Debug, Error, uniffi::Error)]
pub enum PlatformError {
    /// Errors coming from the hardware key store.
    #[error("keystore error: {0}")]
    Keystore(String),

    /// Errors coming from the biometric sensor query.
    #[error("sensor error: {0}")]
    Sensor(String),

    /// The prompt could not be presented.
    #[error("prompt error: {0}")]
    Prompt(String),

    /// The signing operation failed or was not authorized.
    #[error("signing error: {0}")]
    Signing(String),

    /// Unexpected `UniFFI` callback error.
    #[error("unexpected uniffi callback error: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for PlatformError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(error.reason)
    }
}
