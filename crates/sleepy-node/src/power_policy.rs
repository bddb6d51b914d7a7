//! CPU frequency and light sleep policy.

use sleepy_core::PowerPolicy;
use sleepy_platform::PowerManager;

use crate::config::PowerSection;
use crate::error::PowerConfigError;

/// Decide the policy to register, if any.
///
/// The frequency is pinned to the configured default. Light sleep is only
/// requested when both the configuration and the platform allow tickless
/// idle. Returns `None` when power management is disabled.
pub fn plan_power_policy(config: &PowerSection, tickless_supported: bool) -> Option<PowerPolicy> {
    if !config.enable {
        return None;
    }
    Some(PowerPolicy::pinned(
        config.cpu_freq_mhz,
        config.tickless_idle && tickless_supported,
    ))
}

/// Register `policy` with the power manager.
pub fn apply_power_policy<P: PowerManager + ?Sized>(
    power: &mut P,
    policy: &PowerPolicy,
) -> Result<(), PowerConfigError> {
    power.configure(policy)?;
    tracing::info!(
        freq_mhz = policy.max_freq_mhz,
        light_sleep = policy.light_sleep_enable,
        "power policy applied"
    );
    Ok(())
}
