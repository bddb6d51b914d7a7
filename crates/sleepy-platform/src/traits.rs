//! Seams to the mesh stack, network interface layer and power manager.

use std::fmt;

use sleepy_core::{LinkModeConfig, OperationalDataset, PowerPolicy};

use crate::config::{PortConfig, StackConfig};
use crate::error::{PlatformError, PowerError, StackError};
use crate::pool::ResourcePool;

/// The asynchronous subsystems that can wake the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// Outbound IPv6 traffic queued by the network interface.
    Netif,
    /// Tasklets posted to the stack task queue.
    TaskQueue,
    /// Radio driver events (frame received, transmit done, poll timer).
    Radio,
}

impl EventSource {
    pub const ALL: [EventSource; 3] = [EventSource::Netif, EventSource::TaskQueue, EventSource::Radio];

    pub const fn as_str(&self) -> &'static str {
        match self {
            EventSource::Netif => "netif",
            EventSource::TaskQueue => "task_queue",
            EventSource::Radio => "radio",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the stack wants the event loop to do after processing an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackControl {
    Continue,
    /// The stack asked to stop; the worker leaves its event loop.
    Stop,
}

/// Stack log levels, most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StackLogLevel {
    None,
    Crit,
    Warn,
    Note,
    Info,
    Debug,
}

/// Control surface of the mesh stack used during bring-up and steady state.
///
/// Every call is synchronous and returns the stack's status.
pub trait MeshStack: Send {
    fn set_log_level(&mut self, level: StackLogLevel) -> Result<(), StackError>;

    /// Milliseconds between data polls to the parent.
    fn set_poll_period(&mut self, period_ms: u32) -> Result<(), StackError>;

    fn set_link_mode(&mut self, mode: LinkModeConfig) -> Result<(), StackError>;

    /// Install the active operational dataset. The stack keeps its own copy.
    fn set_active_dataset(&mut self, dataset: &OperationalDataset) -> Result<(), StackError>;

    fn set_ip6_enabled(&mut self, enabled: bool) -> Result<(), StackError>;

    /// Enable Thread operation; the device starts attaching.
    fn set_thread_enabled(&mut self, enabled: bool) -> Result<(), StackError>;

    /// Run the stack's internal processing for a signalled subsystem.
    fn process(&mut self, source: EventSource) -> StackControl;
}

/// The platform power manager.
pub trait PowerManager: Send {
    /// Register a power policy. Synchronous.
    fn configure(&mut self, policy: &PowerPolicy) -> Result<(), PowerError>;

    /// Whether the build supports tickless idle (and therefore automatic light sleep).
    fn supports_tickless_idle(&self) -> bool;
}

/// Everything the orchestrator needs from the platform.
pub trait Platform: Send + 'static {
    type Stack: MeshStack;
    type Netif: Send;
    type Power: PowerManager;

    /// Whether an IEEE 802.15.4 radio is present.
    fn supports_ieee802154(&self) -> bool;

    /// Initialize the storage partition, default event loop and netif layer.
    fn init_system(&mut self, port: &PortConfig) -> Result<(), PlatformError>;

    /// Initialize the mesh stack. The stack registers its event descriptors in `pool`.
    fn init_stack(
        &mut self,
        config: &StackConfig,
        pool: &mut ResourcePool,
    ) -> Result<Self::Stack, PlatformError>;

    fn create_netif(&mut self) -> Result<Self::Netif, PlatformError>;

    /// Bind the netif to the stack's data path.
    fn attach_netif_glue(
        &mut self,
        netif: &mut Self::Netif,
        config: &StackConfig,
    ) -> Result<(), PlatformError>;

    fn set_default_netif(&mut self, netif: &Self::Netif);

    fn destroy_netif(&mut self, netif: Self::Netif);

    fn detach_netif_glue(&mut self);

    fn power_manager(&mut self) -> &mut Self::Power;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_source_names() {
        let names: Vec<String> = EventSource::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["netif", "task_queue", "radio"]);
    }

    #[test]
    fn log_levels_are_ordered_by_verbosity() {
        assert!(StackLogLevel::None < StackLogLevel::Crit);
        assert!(StackLogLevel::Info < StackLogLevel::Debug);
    }
}
