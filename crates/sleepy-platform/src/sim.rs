//! Host simulation of the platform: mesh stack, netif layer and power manager.
//!
//! The simulated stack follows the real stack's rules where bring-up depends
//! on them (Thread cannot start before IPv6 is up) and drives the radio
//! descriptor from a poll timer once Thread is enabled. Every call is
//! recorded in a journal shared through [`SimControl`], and individual
//! steps can be made to fail.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Deserialize;

use sleepy_core::constants::DEFAULT_POLL_PERIOD_MS;
use sleepy_core::{LinkModeConfig, OperationalDataset, PowerPolicy};

use crate::config::{PortConfig, RadioMode, StackConfig};
use crate::error::{PlatformError, PowerError, StackError};
use crate::pool::{EventSignal, ResourcePool};
use crate::shutdown::TaskToken;
use crate::traits::{EventSource, MeshStack, Platform, PowerManager, StackControl, StackLogLevel};

/// A stack API call that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackStep {
    LogLevel,
    PollPeriod,
    LinkMode,
    DatasetApply,
    Ipv6Enable,
    ThreadEnable,
}

/// Capabilities and fault injection for the simulated platform.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SimConfig {
    /// Whether the simulated chip has an IEEE 802.15.4 radio.
    #[serde(default = "default_true")]
    pub ieee802154: bool,
    /// Whether the simulated build supports tickless idle.
    #[serde(default = "default_true")]
    pub tickless_idle: bool,
    /// CPU frequencies the power manager accepts.
    #[serde(default = "default_cpu_freqs")]
    pub cpu_freqs_mhz: Vec<u32>,
    /// Stack call that returns an error.
    pub fail_step: Option<StackStep>,
    #[serde(default)]
    pub fail_stack_init: bool,
    #[serde(default)]
    pub fail_power: bool,
    /// The stack requests a stop after this many data polls.
    pub stop_after_polls: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_cpu_freqs() -> Vec<u32> {
    vec![40, 80, 160]
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ieee802154: true,
            tickless_idle: true,
            cpu_freqs_mhz: default_cpu_freqs(),
            fail_step: None,
            fail_stack_init: false,
            fail_power: false,
            stop_after_polls: None,
        }
    }
}

/// One observable platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    SystemInit { partition: String },
    StackInit { radio: RadioMode },
    LogLevel(StackLogLevel),
    PollPeriod(u32),
    LinkMode(LinkModeConfig),
    DatasetApplied { len: usize },
    Ip6Enabled(bool),
    ThreadEnabled(bool),
    NetifCreated,
    GlueAttached,
    DefaultNetifSet,
    NetifDestroyed,
    GlueDetached,
    PowerConfigured(PowerPolicy),
    DataPoll,
    StopRequested,
}

#[derive(Default)]
struct ControlInner {
    journal: Mutex<Vec<SimEvent>>,
    stop_requested: AtomicBool,
    signals: Mutex<Vec<EventSignal>>,
}

/// Shared view into the simulation, kept by tests and the binary.
#[derive(Clone, Default)]
pub struct SimControl {
    inner: Arc<ControlInner>,
}

impl SimControl {
    pub fn journal(&self) -> Vec<SimEvent> {
        lock(&self.inner.journal).clone()
    }

    pub fn contains(&self, event: &SimEvent) -> bool {
        lock(&self.inner.journal).contains(event)
    }

    pub fn data_polls(&self) -> usize {
        lock(&self.inner.journal)
            .iter()
            .filter(|e| **e == SimEvent::DataPoll)
            .count()
    }

    /// Ask the stack to stop, as the stack itself would on an exit condition.
    pub fn request_stop(&self) {
        self.inner.stop_requested.store(true, Ordering::SeqCst);
        let signals = lock(&self.inner.signals);
        if let Some(task_queue) = signals.iter().find(|s| s.source() == EventSource::TaskQueue) {
            let _ = task_queue.signal();
        }
    }

    pub fn stop_requested(&self) -> bool {
        self.inner.stop_requested.load(Ordering::SeqCst)
    }

    /// Event descriptors the stack registered that are not yet released.
    pub fn open_descriptors(&self) -> usize {
        lock(&self.inner.signals)
            .iter()
            .filter(|s| !s.is_released())
            .count()
    }

    fn record(&self, event: SimEvent) {
        lock(&self.inner.journal).push(event);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulated mesh stack.
pub struct SimStack {
    control: SimControl,
    radio: EventSignal,
    fail_step: Option<StackStep>,
    stop_after_polls: Option<u64>,
    poll_period_ms: u32,
    link_mode: Option<LinkModeConfig>,
    dataset_len: Option<usize>,
    ip6_enabled: bool,
    thread_enabled: bool,
    polls: u64,
    poll_timer: TaskToken,
}

impl SimStack {
    fn check(&self, step: StackStep) -> Result<(), StackError> {
        if self.fail_step == Some(step) {
            tracing::debug!(?step, "simulated stack rejecting call");
            return Err(StackError::Failed);
        }
        Ok(())
    }

    pub fn link_mode(&self) -> Option<LinkModeConfig> {
        self.link_mode
    }

    pub fn is_thread_enabled(&self) -> bool {
        self.thread_enabled
    }

    fn start_poll_timer(&mut self) -> Result<(), StackError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| StackError::InvalidState)?;
        let period_ms = if self.poll_period_ms == 0 {
            DEFAULT_POLL_PERIOD_MS
        } else {
            self.poll_period_ms
        };
        let period = Duration::from_millis(u64::from(period_ms));
        let radio = self.radio.clone();
        let mut stop_rx = self.poll_timer.subscribe();

        let task = handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = interval.tick() => {
                        if radio.signal().is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::trace!("poll timer stopped");
        });
        self.poll_timer.add_task(task);
        Ok(())
    }
}

impl MeshStack for SimStack {
    fn set_log_level(&mut self, level: StackLogLevel) -> Result<(), StackError> {
        self.check(StackStep::LogLevel)?;
        self.control.record(SimEvent::LogLevel(level));
        Ok(())
    }

    fn set_poll_period(&mut self, period_ms: u32) -> Result<(), StackError> {
        self.check(StackStep::PollPeriod)?;
        self.poll_period_ms = period_ms;
        self.control.record(SimEvent::PollPeriod(period_ms));
        Ok(())
    }

    fn set_link_mode(&mut self, mode: LinkModeConfig) -> Result<(), StackError> {
        self.check(StackStep::LinkMode)?;
        self.link_mode = Some(mode);
        self.control.record(SimEvent::LinkMode(mode));
        Ok(())
    }

    fn set_active_dataset(&mut self, dataset: &OperationalDataset) -> Result<(), StackError> {
        self.check(StackStep::DatasetApply)?;
        self.dataset_len = Some(dataset.len());
        self.control.record(SimEvent::DatasetApplied { len: dataset.len() });
        Ok(())
    }

    fn set_ip6_enabled(&mut self, enabled: bool) -> Result<(), StackError> {
        self.check(StackStep::Ipv6Enable)?;
        if !enabled && self.thread_enabled {
            return Err(StackError::InvalidState);
        }
        self.ip6_enabled = enabled;
        self.control.record(SimEvent::Ip6Enabled(enabled));
        Ok(())
    }

    fn set_thread_enabled(&mut self, enabled: bool) -> Result<(), StackError> {
        self.check(StackStep::ThreadEnable)?;
        if enabled == self.thread_enabled {
            return Ok(());
        }
        if enabled {
            if !self.ip6_enabled {
                return Err(StackError::InvalidState);
            }
            self.start_poll_timer()?;
        } else {
            self.poll_timer.signal_stop();
        }
        self.thread_enabled = enabled;
        self.control.record(SimEvent::ThreadEnabled(enabled));
        tracing::debug!(
            dataset_len = ?self.dataset_len,
            "simulated stack thread {}",
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    fn process(&mut self, source: EventSource) -> StackControl {
        match source {
            EventSource::Radio => {
                self.polls += 1;
                self.control.record(SimEvent::DataPoll);
                tracing::trace!(polls = self.polls, "data poll");
                if self.stop_after_polls.is_some_and(|limit| self.polls >= limit) {
                    self.control.inner.stop_requested.store(true, Ordering::SeqCst);
                }
            }
            EventSource::TaskQueue | EventSource::Netif => {}
        }

        if self.control.stop_requested() {
            self.control.record(SimEvent::StopRequested);
            self.poll_timer.signal_stop();
            return StackControl::Stop;
        }
        StackControl::Continue
    }
}

/// Simulated network interface.
#[derive(Debug)]
pub struct SimNetif {
    name: String,
    glue_attached: bool,
}

impl SimNetif {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_glue_attached(&self) -> bool {
        self.glue_attached
    }
}

/// Simulated power manager.
pub struct SimPowerManager {
    control: SimControl,
    cpu_freqs_mhz: Vec<u32>,
    tickless_idle: bool,
    fail: bool,
    active: Option<PowerPolicy>,
}

impl SimPowerManager {
    pub fn active_policy(&self) -> Option<PowerPolicy> {
        self.active
    }
}

impl PowerManager for SimPowerManager {
    fn configure(&mut self, policy: &PowerPolicy) -> Result<(), PowerError> {
        if self.fail {
            return Err(PowerError::NotSupported("power management disabled"));
        }
        if !policy.is_well_formed() {
            return Err(PowerError::InvalidArgs("frequency bounds out of order"));
        }
        if !self.cpu_freqs_mhz.contains(&policy.min_freq_mhz)
            || !self.cpu_freqs_mhz.contains(&policy.max_freq_mhz)
        {
            return Err(PowerError::InvalidArgs("unsupported CPU frequency"));
        }
        if policy.light_sleep_enable && !self.tickless_idle {
            return Err(PowerError::NotSupported("light sleep requires tickless idle"));
        }
        self.active = Some(*policy);
        self.control.record(SimEvent::PowerConfigured(*policy));
        Ok(())
    }

    fn supports_tickless_idle(&self) -> bool {
        self.tickless_idle
    }
}

/// The simulated platform.
pub struct SimPlatform {
    config: SimConfig,
    control: SimControl,
    power: SimPowerManager,
    system_ready: bool,
    glue_attached: bool,
}

impl SimPlatform {
    pub fn new(config: SimConfig) -> Self {
        let control = SimControl::default();
        let power = SimPowerManager {
            control: control.clone(),
            cpu_freqs_mhz: config.cpu_freqs_mhz.clone(),
            tickless_idle: config.tickless_idle,
            fail: config.fail_power,
            active: None,
        };
        Self {
            config,
            control,
            power,
            system_ready: false,
            glue_attached: false,
        }
    }

    pub fn control(&self) -> SimControl {
        self.control.clone()
    }
}

impl Default for SimPlatform {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl Platform for SimPlatform {
    type Stack = SimStack;
    type Netif = SimNetif;
    type Power = SimPowerManager;

    fn supports_ieee802154(&self) -> bool {
        self.config.ieee802154
    }

    fn init_system(&mut self, port: &PortConfig) -> Result<(), PlatformError> {
        if port.storage_partition_name.is_empty() {
            return Err(PlatformError::Storage(port.storage_partition_name.clone()));
        }
        self.system_ready = true;
        self.control.record(SimEvent::SystemInit {
            partition: port.storage_partition_name.clone(),
        });
        Ok(())
    }

    fn init_stack(
        &mut self,
        config: &StackConfig,
        pool: &mut ResourcePool,
    ) -> Result<SimStack, PlatformError> {
        if !self.system_ready {
            return Err(PlatformError::StackInit(
                "platform services not initialized".into(),
            ));
        }
        if self.config.fail_stack_init {
            return Err(PlatformError::StackInit("simulated failure".into()));
        }
        if config.port.netif_queue_size == 0 || config.port.task_queue_size == 0 {
            return Err(PlatformError::StackInit("queue size must be nonzero".into()));
        }

        let mut signals = Vec::with_capacity(EventSource::ALL.len());
        for source in EventSource::ALL {
            signals.push(pool.register(source)?);
        }
        let radio = signals[2].clone();
        lock(&self.control.inner.signals).extend(signals);

        self.control.record(SimEvent::StackInit {
            radio: config.radio.mode,
        });

        Ok(SimStack {
            control: self.control.clone(),
            radio,
            fail_step: self.config.fail_step,
            stop_after_polls: self.config.stop_after_polls,
            poll_period_ms: DEFAULT_POLL_PERIOD_MS,
            link_mode: None,
            dataset_len: None,
            ip6_enabled: false,
            thread_enabled: false,
            polls: 0,
            poll_timer: TaskToken::new(),
        })
    }

    fn create_netif(&mut self) -> Result<SimNetif, PlatformError> {
        if !self.system_ready {
            return Err(PlatformError::NetifCreate);
        }
        self.control.record(SimEvent::NetifCreated);
        Ok(SimNetif {
            name: "ot0".to_string(),
            glue_attached: false,
        })
    }

    fn attach_netif_glue(
        &mut self,
        netif: &mut SimNetif,
        _config: &StackConfig,
    ) -> Result<(), PlatformError> {
        if self.glue_attached {
            return Err(PlatformError::GlueAttach("glue already attached".into()));
        }
        self.glue_attached = true;
        netif.glue_attached = true;
        self.control.record(SimEvent::GlueAttached);
        Ok(())
    }

    fn set_default_netif(&mut self, _netif: &SimNetif) {
        self.control.record(SimEvent::DefaultNetifSet);
    }

    fn destroy_netif(&mut self, netif: SimNetif) {
        tracing::trace!(netif = netif.name(), "destroying netif");
        self.control.record(SimEvent::NetifDestroyed);
    }

    fn detach_netif_glue(&mut self) {
        if std::mem::take(&mut self.glue_attached) {
            self.control.record(SimEvent::GlueDetached);
        }
    }

    fn power_manager(&mut self) -> &mut SimPowerManager {
        &mut self.power
    }
}
