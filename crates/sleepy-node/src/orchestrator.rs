//! The worker: bring-up, event loop and teardown of the mesh stack.
//!
//! A worker owns the platform, the event descriptor pool and the immutable
//! configuration for exactly one cycle. Bring-up is sequential and any
//! failure is returned to the caller untouched; the caller decides that it
//! is fatal. The event loop multiplexes the pool and hands each ready
//! descriptor to the stack until the stack or a [`StopHandle`] asks it to
//! stop. Teardown only runs after a stop.

use tokio::sync::watch;

use sleepy_core::OperationalDataset;
use sleepy_platform::{MeshStack, Platform, PowerManager, ResourcePool, StackControl};

use crate::config::NodeConfig;
use crate::configurator::configure_network;
use crate::error::BringUpError;
use crate::logging;
use crate::power_policy::{apply_power_policy, plan_power_policy};
use crate::state::{NodeState, StateTracker, StopHandle, StopSignal, stop_channel};

/// Why the event loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The stack returned [`StackControl::Stop`].
    StackRequested,
    /// A [`StopHandle`] fired.
    StopHandle,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownReport {
    pub reason: StopReason,
    /// Ready descriptors dispatched to the stack.
    pub dispatched: u64,
    /// Events drained from the descriptors; at least `dispatched`.
    pub events: u64,
    pub descriptors_released: usize,
}

/// Everything one running cycle owns once the netif is bound.
struct WorkerContext<P: Platform> {
    stack: P::Stack,
    netif: P::Netif,
    pool: ResourcePool,
}

/// One bring-up, run and teardown cycle.
pub struct Worker<P: Platform> {
    config: NodeConfig,
    platform: P,
    pool: ResourcePool,
    state: StateTracker,
    stop: StopSignal,
    stop_handle: StopHandle,
}

impl<P: Platform> Worker<P> {
    /// The platform must already have run [`Platform::init_system`].
    pub fn new(config: NodeConfig, platform: P, pool: ResourcePool) -> Self {
        let (stop_handle, stop) = stop_channel();
        Self {
            config,
            platform,
            pool,
            state: StateTracker::new(),
            stop,
            stop_handle,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NodeState> {
        self.state.subscribe()
    }

    /// Bring the stack up, serve events until stopped, then tear down.
    pub async fn run(self) -> Result<ShutdownReport, BringUpError> {
        let Worker {
            config,
            mut platform,
            pool,
            state,
            mut stop,
            stop_handle: _stop_handle,
        } = self;

        let mut ctx = bring_up(&config, &mut platform, pool, &state)?;

        state.advance(NodeState::Running);
        let (reason, dispatched, events) = serve(&mut ctx, &mut stop).await;

        state.advance(NodeState::ShuttingDown);
        let descriptors_released = teardown(&mut platform, ctx);
        state.advance(NodeState::Terminated);

        let report = ShutdownReport {
            reason,
            dispatched,
            events,
            descriptors_released,
        };
        tracing::info!(?reason, dispatched, events, "worker finished");
        Ok(report)
    }
}

fn bring_up<P: Platform>(
    config: &NodeConfig,
    platform: &mut P,
    mut pool: ResourcePool,
    state: &StateTracker,
) -> Result<WorkerContext<P>, BringUpError> {
    let stack_config = config.stack_config();

    let mut stack = platform
        .init_stack(&stack_config, &mut pool)
        .map_err(BringUpError::StackInit)?;
    tracing::debug!(
        radio = ?stack_config.radio.mode,
        descriptors = pool.len(),
        "stack initialized"
    );
    if config.logging.stack_log_level_dynamic {
        let level = logging::stack_log_level(&config.logging.level);
        if let Err(e) = stack.set_log_level(level) {
            tracing::warn!(?level, "failed to set stack log level: {e}");
        }
    }
    state.advance(NodeState::StackInitialized);

    let mut netif = platform.create_netif().map_err(BringUpError::NetifBind)?;
    platform
        .attach_netif_glue(&mut netif, &stack_config)
        .map_err(BringUpError::NetifBind)?;
    platform.set_default_netif(&netif);
    state.advance(NodeState::NetifBound);

    let dataset = OperationalDataset::from_hex(&config.network.dataset)?;
    configure_network(&mut stack, config.network.poll_period_ms, &dataset)?;
    state.advance(NodeState::NetworkConfigured);

    let power = platform.power_manager();
    match plan_power_policy(&config.power, power.supports_tickless_idle()) {
        Some(policy) => apply_power_policy(power, &policy)?,
        None => tracing::info!("power management disabled, keeping platform defaults"),
    }

    Ok(WorkerContext { stack, netif, pool })
}

async fn serve<P: Platform>(
    ctx: &mut WorkerContext<P>,
    stop: &mut StopSignal,
) -> (StopReason, u64, u64) {
    let mut dispatched = 0u64;
    let mut events = 0u64;

    tracing::debug!("entering event loop");
    let reason = loop {
        tokio::select! {
            biased;

            _ = stop.stopped() => {
                tracing::info!("stop requested");
                break StopReason::StopHandle;
            }

            (source, count) = ctx.pool.wait() => {
                dispatched += 1;
                events += count;
                tracing::trace!(%source, count, "event descriptor ready");
                if ctx.stack.process(source) == StackControl::Stop {
                    tracing::info!("stack requested stop");
                    break StopReason::StackRequested;
                }
            }
        }
    };
    tracing::debug!(dispatched, "left event loop");

    (reason, dispatched, events)
}

fn teardown<P: Platform>(platform: &mut P, ctx: WorkerContext<P>) -> usize {
    let WorkerContext { stack, netif, pool } = ctx;
    platform.destroy_netif(netif);
    platform.detach_netif_glue();
    let released = pool.release();
    drop(stack);
    tracing::debug!(released, "worker resources released");
    released
}
