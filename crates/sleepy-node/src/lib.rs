//! Bring-up and lifecycle orchestration for a sleepy Thread end device.
//!
//! The node decodes its provisioned operational dataset, configures the
//! mesh stack as a sleepy end device, pins the power policy and then runs
//! the stack's event loop on a dedicated worker thread until asked to stop.

pub mod config;
pub mod configurator;
pub mod error;
pub mod launch;
pub mod logging;
pub mod orchestrator;
pub mod power_policy;
pub mod state;

pub use config::NodeConfig;
pub use configurator::configure_network;
pub use error::{BringUpError, NodeError, PowerConfigError, StackOperationError};
pub use launch::{NodeHandle, escalate, launch, prepare};
pub use orchestrator::{ShutdownReport, StopReason, Worker};
pub use power_policy::{apply_power_policy, plan_power_policy};
pub use state::{NodeState, StopHandle};
