//! Prompt copy and per-request options.

use crate::config::BridgeConfig;

/// Per-request options for an authentication ceremony.
///
/// Every field is optional; unset prompt strings fall back to the bridge
/// configuration defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct AuthenticateOptions {
    /// Prompt title.
    #[uniffi(default = None)]
    pub title: Option<String>,
    /// Prompt subtitle describing the sensor.
    #[uniffi(default = None)]
    pub sensor_description: Option<String>,
    /// Label of the negative button.
    #[uniffi(default = None)]
    pub cancel_text: Option<String>,
    /// Challenge to sign once the biometric match unlocks the key.
    ///
    /// When set, the success outcome carries the signature so a remote party
    /// can verify it against the registered public key.
    #[uniffi(default = None)]
    pub payload: Option<String>,
}

/// Copy shown by the platform prompt.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct PromptInfo {
    /// Prompt title.
    pub title: String,
    /// Prompt subtitle.
    pub subtitle: String,
    /// Why the app is asking, shown as the prompt description.
    pub description: Option<String>,
    /// Label of the negative button.
    pub negative_button_text: String,
}

impl PromptInfo {
    /// Builds the prompt copy for one request.
    pub(crate) fn resolve(reason: &str, options: &AuthenticateOptions, config: &BridgeConfig) -> Self {
        let reason = reason.trim();
        Self {
            title: options
                .title
                .clone()
                .unwrap_or_else(|| config.default_title.clone()),
            subtitle: options
                .sensor_description
                .clone()
                .unwrap_or_else(|| config.default_sensor_description.clone()),
            description: (!reason.is_empty()).then(|| reason.to_string()),
            negative_button_text: options
                .cancel_text
                .clone()
                .unwrap_or_else(|| config.default_cancel_text.clone()),
        }
    }
}
