//! Tracing subscriber configuration for the node.
//!
//! Log levels follow these conventions:
//! - ERROR: fatal bring-up failures
//! - WARN: ignored failures (stack log level), unexpected but handled conditions
//! - INFO: lifecycle transitions, dataset summary, applied policy
//! - DEBUG: individual bring-up steps, event loop entry and exit
//! - TRACE: descriptor wakeups and data polls

use sleepy_platform::StackLogLevel;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence; `default_level` is used when it is unset.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Initialize the tracing subscriber with JSON output.
///
/// Activated by setting `RUST_LOG_FORMAT=json`.
pub fn init_json(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .init();
}

/// Initialize the tracing subscriber for tests.
///
/// Uses `try_init` so repeated calls are harmless.
pub fn init_for_tests() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Map a configured log level name onto the stack's log levels, so the
/// stack logs at the same verbosity as the node.
pub fn stack_log_level(level: &str) -> StackLogLevel {
    match level.to_ascii_lowercase().as_str() {
        "off" | "none" => StackLogLevel::None,
        "error" => StackLogLevel::Crit,
        "warn" => StackLogLevel::Warn,
        "info" => StackLogLevel::Info,
        "debug" | "trace" => StackLogLevel::Debug,
        _ => StackLogLevel::Note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_log_level_mapping() {
        assert_eq!(stack_log_level("off"), StackLogLevel::None);
        assert_eq!(stack_log_level("ERROR"), StackLogLevel::Crit);
        assert_eq!(stack_log_level("warn"), StackLogLevel::Warn);
        assert_eq!(stack_log_level("info"), StackLogLevel::Info);
        assert_eq!(stack_log_level("trace"), StackLogLevel::Debug);
        assert_eq!(stack_log_level("sleepy_node=debug"), StackLogLevel::Note);
    }
}
