//! The `BiometricAuthenticator` is the object the host talks to.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;

use crate::availability::{AvailabilityCode, CapabilityGate};
use crate::ceremony::{
    spawn_worker, AuthenticationListener, AuthenticationOutcome, CeremonyStart, CeremonyState,
    Completion, RejectReason, SessionSlot,
};
use crate::config::BridgeConfig;
use crate::error::{BiometricError, BiometricResult};
use crate::keys::{KeyManager, PublicKey};
use crate::platform::{PlatformProvider, PromptPresenter};
use crate::prompt::{AuthenticateOptions, PromptInfo};

/// Biometric capability checks, signing key management and authentication
/// ceremonies on top of the host's platform services.
///
/// Create one per process. A new authenticator assumes the host is in the
/// background until [`BiometricAuthenticator::on_host_resume`] is called.
#[derive(uniffi::Object)]
pub struct BiometricAuthenticator {
    config: BridgeConfig,
    platform: Arc<dyn PlatformProvider>,
    gate: CapabilityGate,
    keys: KeyManager,
    session: Arc<SessionSlot>,
    foreground: AtomicBool,
}

impl std::fmt::Debug for BiometricAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiometricAuthenticator")
            .field("config", &self.config)
            .field("state", &self.session.state())
            .field("foreground", &self.foreground.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

#[uniffi::export]
impl BiometricAuthenticator {
    /// Creates an authenticator with the default configuration.
    #[uniffi::constructor]
    #[must_use]
    pub fn new(platform: Arc<dyn PlatformProvider>) -> Self {
        Self::build(platform, BridgeConfig::default())
    }

    /// Creates an authenticator with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate.
    #[uniffi::constructor]
    pub fn with_config(
        platform: Arc<dyn PlatformProvider>,
        config: BridgeConfig,
    ) -> BiometricResult<Self> {
        config.validate()?;
        Ok(Self::build(platform, config))
    }

    /// Creates an authenticator from a JSON configuration. Missing fields
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the JSON is malformed or does not validate.
    #[uniffi::constructor]
    pub fn from_json_config(
        platform: Arc<dyn PlatformProvider>,
        config: &str,
    ) -> BiometricResult<Self> {
        let config = BridgeConfig::from_json(config)?;
        Ok(Self::build(platform, config))
    }

    /// Returns the current availability of biometric authentication.
    #[must_use]
    pub fn check_availability(&self) -> AvailabilityCode {
        self.gate.check()
    }

    /// Succeeds when biometric authentication can be used right now.
    ///
    /// # Errors
    ///
    /// Returns `NotSupported` carrying the specific availability code.
    pub fn is_supported(&self) -> BiometricResult<()> {
        match self.gate.check() {
            AvailabilityCode::IsSupported => Ok(()),
            code => Err(BiometricError::NotSupported { code }),
        }
    }

    /// Generates a new signing key, replacing any previous one, and returns
    /// its public half.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPlatform` below the OS floor and `KeyGeneration`
    /// when the key store fails.
    pub fn create_keys(&self) -> BiometricResult<PublicKey> {
        self.keys.create_keys(&self.gate)
    }

    /// Whether the signing key exists. Key store errors read as `false`.
    #[must_use]
    pub fn biometric_keys_exist(&self) -> bool {
        self.keys.key_exists()
    }

    /// Removes the signing key. Returns `false` if the key store failed.
    #[must_use]
    pub fn delete_keys(&self) -> bool {
        self.keys.delete_keys()
    }

    /// Starts an authentication ceremony and returns without waiting for it.
    ///
    /// When the result is [`CeremonyStart::Started`], `listener` is called
    /// exactly once with the outcome. When it is [`CeremonyStart::Ignored`],
    /// `listener` is never called.
    #[must_use]
    pub fn authenticate(
        &self,
        reason: &str,
        options: AuthenticateOptions,
        listener: Arc<dyn AuthenticationListener>,
    ) -> CeremonyStart {
        if self.session.state() != CeremonyState::Idle {
            return self.ignore(RejectReason::SessionActive);
        }
        if !self.foreground.load(Ordering::Acquire) {
            return self.ignore(RejectReason::HostInBackground);
        }
        let Some(presenter) = self.platform.prompt_presenter() else {
            return self.ignore(RejectReason::NoUiContext);
        };
        let Some(guard) = self.session.try_acquire() else {
            return self.ignore(RejectReason::SessionActive);
        };

        let info = PromptInfo::resolve(reason, &options, &self.config);
        let completion = Arc::new(Completion::new(listener, guard));
        self.start_ceremony(&completion, presenter.as_ref(), info, options.payload);
        CeremonyStart::Started
    }

    /// Returns the phase of the current ceremony.
    #[must_use]
    pub fn ceremony_state(&self) -> CeremonyState {
        self.session.state()
    }

    /// The host came to the foreground.
    pub fn on_host_resume(&self) {
        self.foreground.store(true, Ordering::Release);
    }

    /// The host went to the background.
    pub fn on_host_pause(&self) {
        self.foreground.store(false, Ordering::Release);
    }

    /// The host is being torn down.
    pub fn on_host_destroy(&self) {
        self.foreground.store(false, Ordering::Release);
    }
}

#[uniffi::export(async_runtime = "tokio")]
impl BiometricAuthenticator {
    /// Runs an authentication ceremony to completion.
    ///
    /// Returns `None` when the request was ignored.
    #[allow(clippy::needless_pass_by_value)]
    pub async fn authenticate_async(
        &self,
        reason: String,
        options: AuthenticateOptions,
    ) -> Option<AuthenticationOutcome> {
        let (sender, receiver) = oneshot::channel();
        let listener = Arc::new(OneshotListener {
            sender: Mutex::new(Some(sender)),
        });
        match self.authenticate(&reason, options, listener) {
            CeremonyStart::Started => receiver.await.ok(),
            CeremonyStart::Ignored { .. } => None,
        }
    }
}

impl BiometricAuthenticator {
    fn build(platform: Arc<dyn PlatformProvider>, config: BridgeConfig) -> Self {
        let gate = CapabilityGate::new(Arc::clone(&platform), config.minimum_os_version);
        let keys = KeyManager::new(
            platform.keystore(),
            config.key_alias.clone(),
            config.key_size_bits,
        );
        Self {
            config,
            platform,
            gate,
            keys,
            session: Arc::new(SessionSlot::new()),
            foreground: AtomicBool::new(false),
        }
    }

    fn ignore(&self, reason: RejectReason) -> CeremonyStart {
        log::debug!(
            "authentication request ignored ({reason}), ceremony is {:?}",
            self.session.state()
        );
        CeremonyStart::Ignored { reason }
    }

    /// Drives `Requested → Prompting`. Every failure here completes the
    /// ceremony.
    fn start_ceremony(
        &self,
        completion: &Arc<Completion>,
        presenter: &dyn PromptPresenter,
        info: PromptInfo,
        payload: Option<String>,
    ) {
        let code = self.gate.check();
        if code != AvailabilityCode::IsSupported {
            completion.complete(AuthenticationOutcome::failed(code, None));
            return;
        }

        let operation = match self.keys.begin_signing() {
            Ok(operation) => operation,
            Err(err) => {
                log::error!("could not initialize biometric signature: {err}");
                completion.complete(AuthenticationOutcome::failed(
                    AvailabilityCode::NotAvailable,
                    Some(err.to_string()),
                ));
                return;
            }
        };

        let callback = match spawn_worker(
            Arc::clone(completion),
            Arc::clone(&operation),
            payload,
            self.config.attempt_failure_policy,
        ) {
            Ok(callback) => callback,
            Err(err) => {
                log::error!("could not start ceremony worker: {err}");
                completion.complete(AuthenticationOutcome::failed(
                    AvailabilityCode::NotAvailable,
                    Some(err.to_string()),
                ));
                return;
            }
        };

        completion.mark_prompting();
        log::info!("presenting biometric prompt `{}`", info.title);
        if let Err(err) = presenter.present(info, operation, callback) {
            log::error!("could not present biometric prompt: {err}");
            completion.complete(AuthenticationOutcome::failed(
                AvailabilityCode::NotAvailable,
                Some(err.to_string()),
            ));
        }
    }
}

/// Bridges the listener convention to a future.
struct OneshotListener {
    sender: Mutex<Option<oneshot::Sender<AuthenticationOutcome>>>,
}

impl AuthenticationListener for OneshotListener {
    fn on_complete(&self, outcome: AuthenticationOutcome) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sender) = sender {
            let _ = sender.send(outcome);
        }
    }
}
