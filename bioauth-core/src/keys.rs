//! Lifecycle of the biometric signing key.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::availability::CapabilityGate;
use crate::error::{BiometricError, PlatformResult};
use crate::platform::{HardwareKeystore, SigningOperation};

/// RSA public exponent F4.
pub const RSA_F4: u64 = 65_537;

/// Asymmetric algorithm of the signing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum KeyAlgorithm {
    /// RSA keypair.
    Rsa,
}

/// Digest used by the signature scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum SignatureDigest {
    /// SHA-256.
    Sha256,
}

/// Padding used by the signature scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum SignaturePadding {
    /// RSASSA-PKCS1-v1_5.
    Pkcs1,
}

/// Key generation parameters handed to the platform key store.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct KeySpec {
    /// Alias under which the key is stored.
    pub alias: String,
    /// Key algorithm.
    pub algorithm: KeyAlgorithm,
    /// Modulus size in bits.
    pub key_size_bits: u32,
    /// Public exponent.
    pub public_exponent: u64,
    /// Digest of the only allowed signature scheme.
    pub digest: SignatureDigest,
    /// Padding of the only allowed signature scheme.
    pub padding: SignaturePadding,
    /// Whether every private-key use needs user authentication.
    pub user_authentication_required: bool,
    /// Seconds a successful authentication keeps the key unlocked.
    /// `None` means every signature needs a fresh biometric match.
    pub authentication_validity_seconds: Option<u32>,
}

impl KeySpec {
    /// Sign-only RSA key with SHA-256/PKCS#1 that demands a biometric match
    /// for every signature.
    #[must_use]
    pub fn biometric_signing(alias: &str, key_size_bits: u32) -> Self {
        Self {
            alias: alias.to_string(),
            algorithm: KeyAlgorithm::Rsa,
            key_size_bits,
            public_exponent: RSA_F4,
            digest: SignatureDigest::Sha256,
            padding: SignaturePadding::Pkcs1,
            user_authentication_required: true,
            authentication_validity_seconds: None,
        }
    }
}

/// Public half of the signing key.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct PublicKey {
    /// Base64 of the DER-encoded `SubjectPublicKeyInfo`, without line breaks.
    pub public_key: String,
}

impl PublicKey {
    fn from_der(der: &[u8]) -> Self {
        let mut encoded = STANDARD.encode(der);
        encoded.retain(|c| c != '\r' && c != '\n');
        Self {
            public_key: encoded,
        }
    }
}

/// Creates, inspects and removes the signing key under one alias.
pub struct KeyManager {
    keystore: Arc<dyn HardwareKeystore>,
    alias: String,
    key_size_bits: u32,
}

impl KeyManager {
    pub fn new(keystore: Arc<dyn HardwareKeystore>, alias: String, key_size_bits: u32) -> Self {
        Self {
            keystore,
            alias,
            key_size_bits,
        }
    }

    /// Replaces the signing key and returns its public half.
    pub fn create_keys(&self, gate: &CapabilityGate) -> Result<PublicKey, BiometricError> {
        if !gate.os_supported() {
            return Err(BiometricError::UnsupportedPlatform {
                os_version: gate.os_version(),
                minimum: gate.minimum_os_version(),
            });
        }

        if !self.delete_keys() {
            log::warn!("could not remove previous key `{}` before generation", self.alias);
        }

        let spec = KeySpec::biometric_signing(&self.alias, self.key_size_bits);
        let der = self.keystore.generate_key_pair(spec).map_err(|e| {
            log::error!("key generation failed for `{}`: {e}", self.alias);
            BiometricError::KeyGeneration(e.to_string())
        })?;

        log::info!("generated biometric signing key `{}`", self.alias);
        Ok(PublicKey::from_der(&der))
    }

    /// Whether the key is present. Key store errors read as absent.
    pub fn key_exists(&self) -> bool {
        self.keystore
            .contains_alias(self.alias.clone())
            .unwrap_or_else(|e| {
                log::warn!("could not check key `{}`: {e}", self.alias);
                false
            })
    }

    /// Best-effort removal of the key.
    pub fn delete_keys(&self) -> bool {
        match self.keystore.delete_entry(self.alias.clone()) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("could not delete key `{}`: {e}", self.alias);
                false
            }
        }
    }

    /// Prepares a locked signing operation over the stored private key.
    pub fn begin_signing(&self) -> PlatformResult<Arc<dyn SigningOperation>> {
        self.keystore.begin_signing(self.alias.clone())
    }
}
