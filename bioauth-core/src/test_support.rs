//! In-memory platform doubles for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use crate::availability::SensorState;
use crate::ceremony::{AuthenticationListener, AuthenticationOutcome, CeremonyState, SessionSlot};
use crate::error::{PlatformError, PlatformResult};
use crate::keys::KeySpec;
use crate::platform::{
    BiometricSensor, HardwareKeystore, PlatformProvider, PromptPresenter, SigningOperation,
};

pub enum FakeSensorMode {
    Ready(SensorState),
    Missing,
    Failing,
}

pub struct FakeSensor {
    state: Mutex<SensorState>,
    failing: bool,
    probes: AtomicUsize,
}

impl FakeSensor {
    pub fn new(state: SensorState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
            failing: false,
            probes: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SensorState {
                hardware_present: true,
                hardware_available: true,
                enrolled: true,
            }),
            failing: true,
            probes: AtomicUsize::new(0),
        })
    }

    pub fn set_state(&self, state: SensorState) {
        *self.state.lock().unwrap() = state;
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

impl BiometricSensor for FakeSensor {
    fn probe(&self) -> PlatformResult<SensorState> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(PlatformError::Sensor("sensor service died".to_string()));
        }
        Ok(*self.state.lock().unwrap())
    }
}

pub struct FakeSigner {
    prefix: Vec<u8>,
}

impl FakeSigner {
    pub fn new(prefix: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            prefix: prefix.to_vec(),
        })
    }
}

impl SigningOperation for FakeSigner {
    fn sign(&self, payload: Vec<u8>) -> PlatformResult<Vec<u8>> {
        let mut signature = self.prefix.clone();
        signature.extend_from_slice(&payload);
        Ok(signature)
    }
}

/// Key store that hands out numbered fake keys.
#[derive(Default)]
pub struct FakeKeystore {
    current: Mutex<Option<(String, u8)>>,
    generation: AtomicUsize,
    deletions: AtomicUsize,
    last_spec: Mutex<Option<KeySpec>>,
    fail_generation: AtomicBool,
    fail_lookups: AtomicBool,
}

impl FakeKeystore {
    pub fn deletions(&self) -> usize {
        self.deletions.load(Ordering::SeqCst)
    }

    pub fn last_spec(&self) -> Option<KeySpec> {
        self.last_spec.lock().unwrap().clone()
    }

    pub fn fail_generation(&self, fail: bool) {
        self.fail_generation.store(fail, Ordering::SeqCst);
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    fn check_lookups(&self) -> PlatformResult<()> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(PlatformError::Keystore("keystore not loaded".to_string()));
        }
        Ok(())
    }
}

impl HardwareKeystore for FakeKeystore {
    fn generate_key_pair(&self, spec: KeySpec) -> PlatformResult<Vec<u8>> {
        if self.fail_generation.load(Ordering::SeqCst) {
            return Err(PlatformError::Keystore("generation refused".to_string()));
        }
        let id = u8::try_from(self.generation.fetch_add(1, Ordering::SeqCst) % 256).unwrap();
        *self.current.lock().unwrap() = Some((spec.alias.clone(), id));
        *self.last_spec.lock().unwrap() = Some(spec);
        Ok(vec![0x30, 0x82, id])
    }

    fn contains_alias(&self, alias: String) -> PlatformResult<bool> {
        self.check_lookups()?;
        Ok(self
            .current
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|(stored, _)| *stored == alias))
    }

    fn delete_entry(&self, alias: String) -> PlatformResult<()> {
        self.check_lookups()?;
        self.deletions.fetch_add(1, Ordering::SeqCst);
        let mut current = self.current.lock().unwrap();
        if current.as_ref().is_some_and(|(stored, _)| *stored == alias) {
            *current = None;
        }
        Ok(())
    }

    fn begin_signing(&self, alias: String) -> PlatformResult<Arc<dyn SigningOperation>> {
        let current = self.current.lock().unwrap();
        match current.as_ref() {
            Some((stored, id)) if *stored == alias => Ok(FakeSigner::new(&[*id])),
            _ => Err(PlatformError::Keystore(format!("no key under `{alias}`"))),
        }
    }
}

pub struct TestPlatform {
    os_version: u32,
    sensor: Option<Arc<FakeSensor>>,
    sensor_lookups: AtomicUsize,
    pub keystore: Arc<FakeKeystore>,
}

impl TestPlatform {
    pub fn new(os_version: u32, mode: FakeSensorMode) -> Arc<Self> {
        let sensor = match mode {
            FakeSensorMode::Ready(state) => Some(FakeSensor::new(state)),
            FakeSensorMode::Missing => None,
            FakeSensorMode::Failing => Some(FakeSensor::failing()),
        };
        Arc::new(Self {
            os_version,
            sensor,
            sensor_lookups: AtomicUsize::new(0),
            keystore: Arc::new(FakeKeystore::default()),
        })
    }

    pub fn with_sensor(os_version: u32, sensor: Arc<FakeSensor>) -> Arc<Self> {
        Arc::new(Self {
            os_version,
            sensor: Some(sensor),
            sensor_lookups: AtomicUsize::new(0),
            keystore: Arc::new(FakeKeystore::default()),
        })
    }

    pub fn sensor_lookups(&self) -> usize {
        self.sensor_lookups.load(Ordering::SeqCst)
    }
}

impl PlatformProvider for TestPlatform {
    fn os_version(&self) -> u32 {
        self.os_version
    }

    fn biometric_sensor(&self) -> Option<Arc<dyn BiometricSensor>> {
        self.sensor_lookups.fetch_add(1, Ordering::SeqCst);
        self.sensor
            .as_ref()
            .map(|sensor| Arc::clone(sensor) as Arc<dyn BiometricSensor>)
    }

    fn keystore(&self) -> Arc<dyn HardwareKeystore> {
        Arc::clone(&self.keystore) as Arc<dyn HardwareKeystore>
    }

    fn prompt_presenter(&self) -> Option<Arc<dyn PromptPresenter>> {
        None
    }
}

/// Listener that records every outcome and, optionally, the session state
/// at delivery time.
pub struct RecordingListener {
    outcomes: Mutex<Vec<AuthenticationOutcome>>,
    delivered: Condvar,
    slot: Option<Arc<SessionSlot>>,
    states: Mutex<Vec<CeremonyState>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Self::build(None)
    }

    pub fn watching(slot: Arc<SessionSlot>) -> Arc<Self> {
        Self::build(Some(slot))
    }

    fn build(slot: Option<Arc<SessionSlot>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(Vec::new()),
            delivered: Condvar::new(),
            slot,
            states: Mutex::new(Vec::new()),
        })
    }

    pub fn outcomes(&self) -> Vec<AuthenticationOutcome> {
        self.outcomes.lock().unwrap().clone()
    }

    pub fn states_seen(&self) -> Vec<CeremonyState> {
        self.states.lock().unwrap().clone()
    }

    /// Blocks until the first outcome arrives.
    pub fn wait(&self) -> AuthenticationOutcome {
        let outcomes = self.outcomes.lock().unwrap();
        let (outcomes, timeout) = self
            .delivered
            .wait_timeout_while(outcomes, Duration::from_secs(5), |o| o.is_empty())
            .unwrap();
        assert!(!timeout.timed_out(), "no outcome delivered");
        outcomes[0].clone()
    }

    pub fn assert_no_more(&self) {
        std::thread::sleep(Duration::from_millis(100));
        assert!(self.outcomes.lock().unwrap().len() <= 1, "outcome delivered twice");
    }
}

impl AuthenticationListener for RecordingListener {
    fn on_complete(&self, outcome: AuthenticationOutcome) {
        if let Some(slot) = &self.slot {
            self.states.lock().unwrap().push(slot.state());
        }
        self.outcomes.lock().unwrap().push(outcome);
        self.delivered.notify_all();
    }
}
