//! Error types for the platform layer.

use crate::traits::EventSource;

/// Status returned by a mesh stack API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    #[error("invalid arguments")]
    InvalidArgs,
    #[error("invalid state")]
    InvalidState,
    #[error("insufficient buffers")]
    NoBufs,
    #[error("busy")]
    Busy,
    #[error("operation failed")]
    Failed,
}

/// Status returned by the power manager.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PowerError {
    #[error("invalid power configuration: {0}")]
    InvalidArgs(&'static str),
    #[error("not supported: {0}")]
    NotSupported(&'static str),
}

/// Errors from the event-descriptor pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("all {capacity} event descriptors are in use")]
    Exhausted { capacity: usize },
    #[error("event descriptor for {0} already registered")]
    Duplicate(EventSource),
    #[error("event descriptor pool released")]
    Released,
}

/// Errors from platform service initialization.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("storage partition {0:?} could not be initialized")]
    Storage(String),
    #[error("default event loop could not be created")]
    EventLoop,
    #[error("network interface layer could not be initialized")]
    NetifLayer,
    #[error("stack initialization failed: {0}")]
    StackInit(String),
    #[error("event descriptor pool: {0}")]
    Pool(#[from] PoolError),
    #[error("network interface could not be created")]
    NetifCreate,
    #[error("netif glue attach failed: {0}")]
    GlueAttach(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_variants() {
        assert_eq!(StackError::InvalidState.to_string(), "invalid state");
        assert_eq!(StackError::NoBufs.to_string(), "insufficient buffers");

        let pe = PowerError::InvalidArgs("min above max");
        assert_eq!(pe.to_string(), "invalid power configuration: min above max");

        let exhausted = PoolError::Exhausted { capacity: 3 };
        assert_eq!(exhausted.to_string(), "all 3 event descriptors are in use");

        let dup = PoolError::Duplicate(EventSource::Radio);
        assert_eq!(dup.to_string(), "event descriptor for radio already registered");

        let storage = PlatformError::Storage("ot_storage".into());
        assert!(storage.to_string().contains("\"ot_storage\""));
    }

    #[test]
    fn test_platform_error_from_pool() {
        let err: PlatformError = PoolError::Released.into();
        assert!(matches!(err, PlatformError::Pool(PoolError::Released)));
        assert!(err.to_string().contains("pool released"));
    }
}
