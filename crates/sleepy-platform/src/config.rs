//! Stack platform configuration: radio, host connection and port sizing.
//!
//! Defaults match a native-radio device with a CLI on UART0 at 115200 8N1.

use serde::Deserialize;

/// Everything `Platform::init_stack` needs.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct StackConfig {
    #[serde(default)]
    pub radio: RadioConfig,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub port: PortConfig,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RadioMode {
    /// On-chip IEEE 802.15.4 radio.
    #[default]
    Native,
    /// Radio co-processor over UART (spinel).
    UartRcp,
    /// Radio co-processor over SPI (spinel).
    SpiRcp,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct RadioConfig {
    #[serde(default)]
    pub mode: RadioMode,
}

/// How a companion host attaches to the node.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HostConnectionMode {
    None,
    #[default]
    CliUart,
    CliUsb,
    RcpUart,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    #[default]
    Disable,
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub enum StopBits {
    #[default]
    #[serde(rename = "1")]
    One,
    #[serde(rename = "1.5")]
    OneAndHalf,
    #[serde(rename = "2")]
    Two,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlowControl {
    #[default]
    Disable,
    Rts,
    Cts,
    CtsRts,
}

/// Serial parameters of the host connection.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UartConfig {
    #[serde(default)]
    pub port: u8,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_data_bits")]
    pub data_bits: u8,
    #[serde(default)]
    pub parity: Parity,
    #[serde(default)]
    pub stop_bits: StopBits,
    #[serde(default)]
    pub flow_control: FlowControl,
    #[serde(default)]
    pub rx_flow_ctrl_thresh: u8,
    /// `None` leaves the pin assignment unchanged.
    pub rx_pin: Option<u32>,
    pub tx_pin: Option<u32>,
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_data_bits() -> u8 {
    8
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            port: 0,
            baud_rate: default_baud_rate(),
            data_bits: default_data_bits(),
            parity: Parity::default(),
            stop_bits: StopBits::default(),
            flow_control: FlowControl::default(),
            rx_flow_ctrl_thresh: 0,
            rx_pin: None,
            tx_pin: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct HostConfig {
    #[serde(default)]
    pub connection_mode: HostConnectionMode,
    #[serde(default)]
    pub uart: UartConfig,
}

/// Storage and queue sizing for the stack port.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PortConfig {
    /// Partition where the stack persists its own state.
    #[serde(default = "default_storage_partition")]
    pub storage_partition_name: String,
    #[serde(default = "default_queue_size")]
    pub netif_queue_size: usize,
    #[serde(default = "default_queue_size")]
    pub task_queue_size: usize,
}

fn default_storage_partition() -> String {
    "ot_storage".to_string()
}

fn default_queue_size() -> usize {
    10
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            storage_partition_name: default_storage_partition(),
            netif_queue_size: default_queue_size(),
            task_queue_size: default_queue_size(),
        }
    }
}
