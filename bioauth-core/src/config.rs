//! Bridge configuration and defaults.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::BiometricError;

/// Alias of the biometric signing key in the platform key store.
pub const DEFAULT_KEY_ALIAS: &str = "biometric_key";

/// Lowest OS API level with hardware-backed, biometric-bound keys (Android 6.0).
pub const DEFAULT_MINIMUM_OS_VERSION: u32 = 23;

/// RSA modulus size of the signing key.
pub const DEFAULT_KEY_SIZE_BITS: u32 = 2048;

/// Prompt title used when the caller does not supply one.
pub const DEFAULT_TITLE: &str = "Biometric authentication";

/// Prompt subtitle used when the caller does not supply one.
pub const DEFAULT_SENSOR_DESCRIPTION: &str = "Authenticate your app";

/// Negative button label used when the caller does not supply one.
pub const DEFAULT_CANCEL_TEXT: &str = "Back";

/// How a single failed match attempt affects the ceremony.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttemptFailurePolicy {
    /// The first failed attempt ends the ceremony with `AUTHENTICATION_FAILED`.
    #[default]
    Terminal,
    /// Failed attempts are logged; the ceremony ends on the platform's own
    /// verdict (a match, a dismissal, or lockout).
    AwaitPlatformVerdict,
}

/// Configuration of a `BiometricAuthenticator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct BridgeConfig {
    /// Alias of the signing key in the platform key store.
    pub key_alias: String,
    /// OS API level below which biometrics are reported as unsupported.
    pub minimum_os_version: u32,
    /// RSA modulus size requested when generating keys.
    pub key_size_bits: u32,
    /// Prompt title used when a request does not override it.
    pub default_title: String,
    /// Prompt subtitle used when a request does not override it.
    pub default_sensor_description: String,
    /// Negative button label used when a request does not override it.
    pub default_cancel_text: String,
    /// Handling of individual failed match attempts.
    pub attempt_failure_policy: AttemptFailurePolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            key_alias: DEFAULT_KEY_ALIAS.to_string(),
            minimum_os_version: DEFAULT_MINIMUM_OS_VERSION,
            key_size_bits: DEFAULT_KEY_SIZE_BITS,
            default_title: DEFAULT_TITLE.to_string(),
            default_sensor_description: DEFAULT_SENSOR_DESCRIPTION.to_string(),
            default_cancel_text: DEFAULT_CANCEL_TEXT.to_string(),
            attempt_failure_policy: AttemptFailurePolicy::default(),
        }
    }
}

impl BridgeConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the JSON is malformed or the result fails
    /// [`BridgeConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, BiometricError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| BiometricError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the key store would reject.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an empty alias or a key below 2048 bits.
    pub fn validate(&self) -> Result<(), BiometricError> {
        if self.key_alias.trim().is_empty() {
            return Err(BiometricError::InvalidConfig(
                "key_alias must not be empty".to_string(),
            ));
        }
        if self.key_size_bits < DEFAULT_KEY_SIZE_BITS {
            return Err(BiometricError::InvalidConfig(format!(
                "key_size_bits must be at least {DEFAULT_KEY_SIZE_BITS}, got {}",
                self.key_size_bits
            )));
        }
        Ok(())
    }
}

/// Returns the default bridge configuration.
#[uniffi::export]
#[must_use]
pub fn default_bridge_config() -> BridgeConfig {
    BridgeConfig::default()
}
