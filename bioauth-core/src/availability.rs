//! Capability gate: decides whether biometric authentication can be used.

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::platform::{BiometricSensor, PlatformProvider};

/// Outcome codes shared by the capability gate and the authentication ceremony.
///
/// The integer values returned by [`AvailabilityCode::value`] are stable and
/// form part of the host contract.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityCode {
    /// Biometric authentication is usable.
    IsSupported,
    /// The OS version is below the supported floor.
    NotSupported,
    /// The device has no biometric hardware.
    NotPresent,
    /// The hardware is busy, in an unknown state, or could not be queried.
    NotAvailable,
    /// No biometrics are enrolled on the device.
    NotEnrolled,
    /// A biometric match attempt failed.
    AuthenticationFailed,
    /// The prompt was dismissed, errored, or the sensor locked out.
    AuthenticationCanceled,
}

impl AvailabilityCode {
    /// Returns the stable integer value of this code.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::IsSupported => 0,
            Self::NotSupported => 1,
            Self::NotPresent => 2,
            Self::NotAvailable => 3,
            Self::NotEnrolled => 4,
            Self::AuthenticationFailed => 5,
            Self::AuthenticationCanceled => 6,
        }
    }
}

/// Returns the stable integer value of `code` for hosts that key on integers.
#[uniffi::export]
#[must_use]
#[allow(clippy::missing_const_for_fn)]
pub fn availability_code_value(code: AvailabilityCode) -> i32 {
    code.value()
}

/// Snapshot of the biometric sensor as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
#[allow(clippy::struct_excessive_bools)]
pub struct SensorState {
    /// Whether the device has biometric hardware at all.
    pub hardware_present: bool,
    /// Whether the hardware can be used right now.
    pub hardware_available: bool,
    /// Whether at least one biometric is enrolled.
    pub enrolled: bool,
}

impl SensorState {
    /// Maps the sensor state to an availability code.
    ///
    /// Hardware presence is checked first, then availability, then enrollment.
    #[must_use]
    pub const fn classify(&self) -> AvailabilityCode {
        if !self.hardware_present {
            AvailabilityCode::NotPresent
        } else if !self.hardware_available {
            AvailabilityCode::NotAvailable
        } else if !self.enrolled {
            AvailabilityCode::NotEnrolled
        } else {
            AvailabilityCode::IsSupported
        }
    }
}

/// Point-in-time availability check against the platform.
///
/// The sensor handle is resolved lazily and cached once the platform can
/// provide one.
pub struct CapabilityGate {
    platform: Arc<dyn PlatformProvider>,
    minimum_os_version: u32,
    sensor: OnceLock<Arc<dyn BiometricSensor>>,
}

impl CapabilityGate {
    pub fn new(platform: Arc<dyn PlatformProvider>, minimum_os_version: u32) -> Self {
        Self {
            platform,
            minimum_os_version,
            sensor: OnceLock::new(),
        }
    }

    /// Whether the OS meets the version floor for hardware-backed biometrics.
    pub fn os_supported(&self) -> bool {
        self.platform.os_version() >= self.minimum_os_version
    }

    pub const fn minimum_os_version(&self) -> u32 {
        self.minimum_os_version
    }

    pub fn os_version(&self) -> u32 {
        self.platform.os_version()
    }

    fn sensor(&self) -> Option<Arc<dyn BiometricSensor>> {
        if let Some(sensor) = self.sensor.get() {
            return Some(Arc::clone(sensor));
        }
        let sensor = self.platform.biometric_sensor()?;
        Some(Arc::clone(self.sensor.get_or_init(|| sensor)))
    }

    /// Evaluates availability. Never fails; every problem maps to a code.
    pub fn check(&self) -> AvailabilityCode {
        if !self.os_supported() {
            return AvailabilityCode::NotSupported;
        }

        let Some(sensor) = self.sensor() else {
            log::debug!("no biometric sensor handle available, cannot check");
            return AvailabilityCode::NotAvailable;
        };

        match sensor.probe() {
            Ok(state) => state.classify(),
            Err(err) => {
                log::warn!("biometric sensor probe failed: {err}");
                AvailabilityCode::NotAvailable
            }
        }
    }
}
