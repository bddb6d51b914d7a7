//! Platform services consumed by the bring-up orchestrator.
//!
//! The mesh stack, the network interface layer and the power manager are
//! opaque services. This crate defines the seams they are reached through,
//! the event-descriptor pool the worker multiplexes, and a host simulation
//! of the whole platform for development and tests.

pub mod config;
pub mod error;
pub mod pool;
pub mod shutdown;
pub mod sim;
pub mod testing;
pub mod traits;

pub use config::{HostConfig, PortConfig, RadioConfig, StackConfig};
pub use error::{PlatformError, PoolError, PowerError, StackError};
pub use pool::{EventSignal, ResourcePool};
pub use shutdown::TaskToken;
pub use traits::{EventSource, MeshStack, Platform, PowerManager, StackControl, StackLogLevel};
