//! Entry point: platform checks, system init and the worker thread.

use std::thread;

use tokio::sync::watch;

use sleepy_core::EVENT_DESCRIPTOR_COUNT;
use sleepy_platform::{Platform, ResourcePool};

use crate::config::NodeConfig;
use crate::error::BringUpError;
use crate::orchestrator::{ShutdownReport, Worker};
use crate::state::{NodeState, StopHandle};

/// Check the platform, initialize its system services and allocate the
/// event descriptor pool. The returned worker has not started.
pub fn prepare<P: Platform>(config: NodeConfig, mut platform: P) -> Result<Worker<P>, BringUpError> {
    if !platform.supports_ieee802154() {
        return Err(BringUpError::RadioUnsupported);
    }

    platform
        .init_system(&config.port)
        .map_err(BringUpError::Platform)?;
    tracing::debug!(
        partition = %config.port.storage_partition_name,
        "platform services initialized"
    );

    let pool = ResourcePool::new(EVENT_DESCRIPTOR_COUNT);
    Ok(Worker::new(config, platform, pool))
}

/// Prepare the worker and start it on its own thread.
///
/// The thread runs a current-thread runtime for the worker's lifetime.
/// A bring-up failure on that thread is escalated and aborts the process.
pub fn launch<P: Platform>(config: NodeConfig, platform: P) -> Result<NodeHandle, BringUpError> {
    let name = config.worker.name.clone();
    let stack_size = config.worker.stack_size;

    let worker = prepare(config, platform)?;
    let stop = worker.stop_handle();
    let state = worker.subscribe();

    let join = thread::Builder::new()
        .name(name.clone())
        .stack_size(stack_size)
        .spawn(move || run_worker(worker))
        .map_err(BringUpError::Worker)?;
    tracing::info!(worker = %name, stack_size, "worker started");

    Ok(NodeHandle { stop, state, join })
}

fn run_worker<P: Platform>(worker: Worker<P>) -> ShutdownReport {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => escalate(&BringUpError::Worker(e)),
    };

    match runtime.block_on(worker.run()) {
        Ok(report) => report,
        Err(e) => escalate(&e),
    }
}

/// Log a fatal bring-up failure with the failing step and abort.
///
/// Teardown is skipped; the process is gone.
pub fn escalate(err: &BringUpError) -> ! {
    tracing::error!(step = err.step(), "fatal: {err}");
    std::process::abort()
}

/// Handle to a launched worker.
pub struct NodeHandle {
    stop: StopHandle,
    state: watch::Receiver<NodeState>,
    join: thread::JoinHandle<ShutdownReport>,
}

impl NodeHandle {
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Ask the worker to leave its event loop and tear down.
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn state(&self) -> watch::Receiver<NodeState> {
        self.state.clone()
    }

    /// Block until the worker thread ends.
    pub fn join(self) -> thread::Result<ShutdownReport> {
        self.join.join()
    }
}

#[cfg(test)]
mod tests {
    use sleepy_platform::sim::{SimConfig, SimPlatform};

    use super::*;

    #[test]
    fn missing_radio_is_refused_before_init() {
        let platform = SimPlatform::new(SimConfig {
            ieee802154: false,
            ..SimConfig::default()
        });
        let control = platform.control();
        let err = prepare(NodeConfig::default(), platform).err().unwrap();
        assert!(matches!(err, BringUpError::RadioUnsupported));
        assert_eq!(err.step(), "radio_check");
        assert!(control.journal().is_empty());
    }

    #[test]
    fn system_init_failure_is_platform_error() {
        let mut config = NodeConfig::default();
        config.port.storage_partition_name.clear();
        let err = prepare(config, SimPlatform::default()).err().unwrap();
        assert!(matches!(err, BringUpError::Platform(_)));
    }

    #[test]
    fn worker_thread_carries_configured_name() {
        let mut config = NodeConfig::default();
        config.worker.name = "mesh-worker".into();
        config.network.poll_period_ms = 5;
        let platform = SimPlatform::new(SimConfig {
            stop_after_polls: Some(1),
            ..SimConfig::default()
        });

        let handle = launch(config, platform).unwrap();
        assert_eq!(handle.join.thread().name(), Some("mesh-worker"));
        let report = handle.join().unwrap();
        assert_eq!(report.descriptors_released, 3);
        assert_eq!(report.reason, crate::orchestrator::StopReason::StackRequested);
    }
}
