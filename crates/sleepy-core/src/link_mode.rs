//! MLE link mode of the device.

use core::fmt;

/// The three independent MLE mode flags a device advertises to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkModeConfig {
    /// Keep the receiver on while idle (`r`).
    pub rx_on_when_idle: bool,
    /// Full Thread device, able to become a router (`d`).
    pub device_type: bool,
    /// Request the full network data rather than stable-only (`n`).
    pub network_data: bool,
}

impl LinkModeConfig {
    /// Sleepy, non-router, stable-network-data-only end device.
    pub const SLEEPY_END_DEVICE: Self = Self {
        rx_on_when_idle: false,
        device_type: false,
        network_data: false,
    };

    pub const fn is_sleepy(&self) -> bool {
        !self.rx_on_when_idle
    }
}

/// Formats as the `rdn` flag string used by the Thread CLI, `-` when empty.
impl fmt::Display for LinkModeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !(self.rx_on_when_idle || self.device_type || self.network_data) {
            return f.write_str("-");
        }
        if self.rx_on_when_idle {
            f.write_str("r")?;
        }
        if self.device_type {
            f.write_str("d")?;
        }
        if self.network_data {
            f.write_str("n")?;
        }
        Ok(())
    }
}
