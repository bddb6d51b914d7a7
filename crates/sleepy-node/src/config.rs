//! TOML-based configuration for the node.
//!
//! The configuration is read once, validated, and handed to the launcher as
//! an immutable value. Every field has a default, so an empty file (or no
//! file at all) describes the stock sleepy end device.

use std::path::Path;

use serde::Deserialize;

use sleepy_core::constants::{DEFAULT_NETWORK_DATASET, DEFAULT_POLL_PERIOD_MS};
use sleepy_platform::config::{HostConfig, PortConfig, RadioConfig, StackConfig};
use sleepy_platform::sim::SimConfig;

use crate::error::NodeError;

/// Top-level node configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct NodeConfig {
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub radio: RadioConfig,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub port: PortConfig,
    #[serde(default)]
    pub power: PowerSection,
    #[serde(default)]
    pub worker: WorkerSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub simulation: SimConfig,
}

impl NodeConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s)
            .map_err(|e| NodeError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the stack would otherwise reject late.
    ///
    /// The dataset is deliberately not checked here: decoding it is a
    /// bring-up step with its own failure path.
    pub fn validate(&self) -> Result<(), NodeError> {
        let uart = &self.host.uart;
        if !(5..=8).contains(&uart.data_bits) {
            return Err(NodeError::Config(format!(
                "host.uart.data_bits must be between 5 and 8, got {}",
                uart.data_bits
            )));
        }
        if uart.baud_rate == 0 {
            return Err(NodeError::Config("host.uart.baud_rate must be nonzero".into()));
        }
        if self.port.storage_partition_name.is_empty() {
            return Err(NodeError::Config(
                "port.storage_partition_name must not be empty".into(),
            ));
        }
        if self.port.netif_queue_size == 0 || self.port.task_queue_size == 0 {
            return Err(NodeError::Config("port queue sizes must be nonzero".into()));
        }
        if self.power.enable && self.power.cpu_freq_mhz == 0 {
            return Err(NodeError::Config("power.cpu_freq_mhz must be nonzero".into()));
        }
        if self.worker.name.is_empty() || self.worker.name.contains('\0') {
            return Err(NodeError::Config(
                "worker.name must be non-empty and free of NUL bytes".into(),
            ));
        }
        Ok(())
    }

    /// The stack platform configuration.
    pub fn stack_config(&self) -> StackConfig {
        StackConfig {
            radio: self.radio,
            host: self.host.clone(),
            port: self.port.clone(),
        }
    }
}

/// The `[network]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NetworkSection {
    /// Active operational dataset as hex TLVs.
    #[serde(default = "default_dataset")]
    pub dataset: String,
    /// Milliseconds between data polls to the parent.
    #[serde(default = "default_poll_period")]
    pub poll_period_ms: u32,
}

fn default_dataset() -> String {
    DEFAULT_NETWORK_DATASET.to_string()
}

fn default_poll_period() -> u32 {
    DEFAULT_POLL_PERIOD_MS
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            poll_period_ms: default_poll_period(),
        }
    }
}

/// The `[power]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PowerSection {
    /// Register a power policy at all. Disabled means the platform keeps its defaults.
    #[serde(default = "default_true")]
    pub enable: bool,
    /// Default CPU frequency; the policy pins min and max to it.
    #[serde(default = "default_cpu_freq")]
    pub cpu_freq_mhz: u32,
    /// Request light sleep on idle when the platform supports tickless idle.
    #[serde(default = "default_true")]
    pub tickless_idle: bool,
}

fn default_true() -> bool {
    true
}

fn default_cpu_freq() -> u32 {
    160
}

impl Default for PowerSection {
    fn default() -> Self {
        Self {
            enable: true,
            cpu_freq_mhz: default_cpu_freq(),
            tickless_idle: true,
        }
    }
}

/// The `[worker]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WorkerSection {
    #[serde(default = "default_worker_name")]
    pub name: String,
    /// Stack size of the worker thread in bytes.
    #[serde(default = "default_stack_size")]
    pub stack_size: usize,
}

fn default_worker_name() -> String {
    "ot_power_save_main".to_string()
}

fn default_stack_size() -> usize {
    256 * 1024
}

impl Default for WorkerSection {
    fn default() -> Self {
        Self {
            name: default_worker_name(),
            stack_size: default_stack_size(),
        }
    }
}

/// The `[logging]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Set the stack's log level to match `level` at stack init.
    #[serde(default = "default_true")]
    pub stack_log_level_dynamic: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            stack_log_level_dynamic: true,
        }
    }
}
