//! Error types for node bring-up.

use sleepy_core::DatasetError;
use sleepy_platform::{PlatformError, PowerError, StackError};

/// A stack call of the network configuration sequence was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StackOperationError {
    #[error("failed to set poll period: {0}")]
    PollPeriod(#[source] StackError),
    #[error("failed to set link mode: {0}")]
    LinkMode(#[source] StackError),
    #[error("failed to apply active dataset: {0}")]
    DatasetApply(#[source] StackError),
    #[error("failed to enable IPv6: {0}")]
    Ipv6Enable(#[source] StackError),
    #[error("failed to enable Thread: {0}")]
    ThreadEnable(#[source] StackError),
}

impl StackOperationError {
    /// Name of the configuration step that failed.
    pub fn step(&self) -> &'static str {
        match self {
            Self::PollPeriod(_) => "poll_period",
            Self::LinkMode(_) => "link_mode",
            Self::DatasetApply(_) => "dataset_apply",
            Self::Ipv6Enable(_) => "ipv6_enable",
            Self::ThreadEnable(_) => "thread_enable",
        }
    }

    pub fn stack_error(&self) -> StackError {
        match self {
            Self::PollPeriod(e)
            | Self::LinkMode(e)
            | Self::DatasetApply(e)
            | Self::Ipv6Enable(e)
            | Self::ThreadEnable(e) => *e,
        }
    }
}

/// The power manager refused the power policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to configure power management: {0}")]
pub struct PowerConfigError(#[from] pub PowerError);

/// Any failure that stops the node from reaching its running state.
///
/// All of these are fatal.
#[derive(Debug, thiserror::Error)]
pub enum BringUpError {
    #[error("platform has no IEEE 802.15.4 radio")]
    RadioUnsupported,
    #[error("platform initialization failed: {0}")]
    Platform(#[source] PlatformError),
    #[error("stack initialization failed: {0}")]
    StackInit(#[source] PlatformError),
    #[error("network interface binding failed: {0}")]
    NetifBind(#[source] PlatformError),
    #[error("invalid operational dataset: {0}")]
    Dataset(#[from] DatasetError),
    #[error("network configuration failed: {0}")]
    StackOperation(#[from] StackOperationError),
    #[error(transparent)]
    PowerConfig(#[from] PowerConfigError),
    #[error("worker could not be started: {0}")]
    Worker(#[source] std::io::Error),
}

impl BringUpError {
    /// Short name of the bring-up step that failed, for logs.
    pub fn step(&self) -> &'static str {
        match self {
            Self::RadioUnsupported => "radio_check",
            Self::Platform(_) => "platform_init",
            Self::StackInit(_) => "stack_init",
            Self::NetifBind(_) => "netif_bind",
            Self::Dataset(_) => "dataset_decode",
            Self::StackOperation(e) => e.step(),
            Self::PowerConfig(_) => "power_policy",
            Self::Worker(_) => "worker_spawn",
        }
    }
}

/// Errors loading the node configuration.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use sleepy_core::DecodeError;

    use super::*;

    #[test]
    fn stack_operation_error_names_its_step() {
        let err = StackOperationError::DatasetApply(StackError::InvalidArgs);
        assert_eq!(err.step(), "dataset_apply");
        assert_eq!(err.stack_error(), StackError::InvalidArgs);
        assert_eq!(
            err.to_string(),
            "failed to apply active dataset: invalid arguments"
        );
    }

    #[test]
    fn bring_up_error_steps() {
        let err: BringUpError = StackOperationError::ThreadEnable(StackError::InvalidState).into();
        assert_eq!(err.step(), "thread_enable");

        let err: BringUpError = DatasetError::EmptyDataset.into();
        assert_eq!(err.step(), "dataset_decode");
        assert_eq!(err.to_string(), "invalid operational dataset: dataset is empty");

        let err: BringUpError =
            PowerConfigError(PowerError::InvalidArgs("unsupported CPU frequency")).into();
        assert_eq!(err.step(), "power_policy");
        assert!(err.to_string().starts_with("failed to configure power management"));
    }

    #[test]
    fn dataset_decode_error_chain() {
        let err: BringUpError =
            DatasetError::Decode(DecodeError::InvalidHexDigit { pair: 1, byte: b'G' }).into();
        assert!(err.to_string().contains("byte pair 1"));
        let source = std::error::Error::source(&err).expect("dataset error is the source");
        assert!(source.to_string().starts_with("failed to decode dataset"));
    }

    #[test]
    fn node_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: NodeError = io_err.into();
        assert!(matches!(err, NodeError::Io(_)));
        assert!(err.to_string().contains("not found"));
    }
}
