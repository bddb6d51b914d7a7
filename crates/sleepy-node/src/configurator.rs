//! Network configuration of a freshly initialized stack.
//!
//! Turns a stack into a sleepy end device attached (or attaching) to the
//! network described by the operational dataset.

use sleepy_core::{LinkModeConfig, OperationalDataset};
use sleepy_platform::MeshStack;

use crate::error::StackOperationError;

/// Apply poll period, link mode and dataset, then bring up IPv6 and Thread.
///
/// Steps run strictly in that order and the first rejected call aborts the
/// sequence. Nothing is retried or rolled back.
pub fn configure_network<S: MeshStack>(
    stack: &mut S,
    poll_period_ms: u32,
    dataset: &OperationalDataset,
) -> Result<(), StackOperationError> {
    stack
        .set_poll_period(poll_period_ms)
        .map_err(StackOperationError::PollPeriod)?;
    tracing::debug!(poll_period_ms, "poll period set");

    let mode = LinkModeConfig::SLEEPY_END_DEVICE;
    stack
        .set_link_mode(mode)
        .map_err(StackOperationError::LinkMode)?;
    tracing::debug!(%mode, "link mode set");

    log_dataset_summary(dataset);
    stack
        .set_active_dataset(dataset)
        .map_err(StackOperationError::DatasetApply)?;
    tracing::debug!(len = dataset.len(), "active dataset installed");

    stack
        .set_ip6_enabled(true)
        .map_err(StackOperationError::Ipv6Enable)?;
    tracing::debug!("IPv6 interface up");

    stack
        .set_thread_enabled(true)
        .map_err(StackOperationError::ThreadEnable)?;
    tracing::debug!("Thread enabled");

    Ok(())
}

// Only public identifiers; the network key and PSKc stay out of the logs.
fn log_dataset_summary(dataset: &OperationalDataset) {
    let summary = dataset.summary();
    tracing::info!(
        len = dataset.len(),
        tlvs = summary.tlv_count,
        channel = ?summary.channel,
        pan_id = ?summary.pan_id.map(|id| format!("{id:#06x}")),
        network_name = summary.network_name().unwrap_or("-"),
        "applying operational dataset"
    );
    if summary.truncated {
        tracing::warn!("operational dataset ends inside a TLV");
    }
}
