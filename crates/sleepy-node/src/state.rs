//! Lifecycle state of the worker and the stop request channel.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Lifecycle of one bring-up, run and teardown cycle.
///
/// States only move forward, one step at a time. There is no restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeState {
    Uninitialized,
    StackInitialized,
    NetifBound,
    NetworkConfigured,
    Running,
    ShuttingDown,
    Terminated,
}

impl NodeState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NodeState::Uninitialized => "uninitialized",
            NodeState::StackInitialized => "stack_initialized",
            NodeState::NetifBound => "netif_bound",
            NodeState::NetworkConfigured => "network_configured",
            NodeState::Running => "running",
            NodeState::ShuttingDown => "shutting_down",
            NodeState::Terminated => "terminated",
        }
    }

    /// The state that follows this one, if any.
    pub const fn next(&self) -> Option<NodeState> {
        match self {
            NodeState::Uninitialized => Some(NodeState::StackInitialized),
            NodeState::StackInitialized => Some(NodeState::NetifBound),
            NodeState::NetifBound => Some(NodeState::NetworkConfigured),
            NodeState::NetworkConfigured => Some(NodeState::Running),
            NodeState::Running => Some(NodeState::ShuttingDown),
            NodeState::ShuttingDown => Some(NodeState::Terminated),
            NodeState::Terminated => None,
        }
    }

    pub fn can_advance_to(&self, next: NodeState) -> bool {
        self.next() == Some(next)
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner of the state channel; lives in the worker.
pub(crate) struct StateTracker {
    tx: watch::Sender<NodeState>,
}

impl StateTracker {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(NodeState::Uninitialized);
        Self { tx }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<NodeState> {
        self.tx.subscribe()
    }

    pub(crate) fn current(&self) -> NodeState {
        *self.tx.borrow()
    }

    /// Move to `next`. Out-of-order transitions are a bug in the worker.
    pub(crate) fn advance(&self, next: NodeState) {
        let from = self.current();
        debug_assert!(
            from.can_advance_to(next),
            "illegal state transition {from} -> {next}"
        );
        // send_replace updates the value even when every receiver is gone.
        self.tx.send_replace(next);
        tracing::info!(%from, to = %next, "node state changed");
    }
}

/// Requests an explicit stop of the running worker.
///
/// Cloneable; any clone can stop the worker. Stopping twice is harmless.
#[derive(Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stop_requested(&self) -> bool {
        *self.tx.borrow()
    }
}

impl fmt::Debug for StopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopHandle")
            .field("stop_requested", &self.is_stop_requested())
            .finish()
    }
}

/// Worker side of the stop channel.
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// Resolve once a stop has been requested.
    ///
    /// Never resolves if every [`StopHandle`] was dropped without stopping.
    /// Cancel-safe.
    pub async fn stopped(&mut self) {
        if self.rx.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Create a connected stop handle and signal.
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx: Arc::new(tx) }, StopSignal { rx })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn states_advance_in_order() {
        let mut state = NodeState::Uninitialized;
        let mut seen = vec![state];
        while let Some(next) = state.next() {
            assert!(state.can_advance_to(next));
            assert!(state < next);
            state = next;
            seen.push(state);
        }
        assert_eq!(seen.len(), 7);
        assert_eq!(state, NodeState::Terminated);
    }

    #[test]
    fn no_skipping_or_going_back() {
        assert!(!NodeState::Uninitialized.can_advance_to(NodeState::Running));
        assert!(!NodeState::Running.can_advance_to(NodeState::NetworkConfigured));
        assert!(!NodeState::Terminated.can_advance_to(NodeState::Uninitialized));
        assert!(!NodeState::Running.can_advance_to(NodeState::Running));
    }

    #[test]
    fn tracker_publishes_to_receivers() {
        let tracker = StateTracker::new();
        let rx = tracker.subscribe();
        assert_eq!(*rx.borrow(), NodeState::Uninitialized);
        tracker.advance(NodeState::StackInitialized);
        assert_eq!(*rx.borrow(), NodeState::StackInitialized);
        assert_eq!(tracker.current(), NodeState::StackInitialized);
    }

    #[test]
    fn tracker_keeps_state_without_receivers() {
        let tracker = StateTracker::new();
        tracker.advance(NodeState::StackInitialized);
        assert_eq!(tracker.current(), NodeState::StackInitialized);
    }

    #[test]
    fn display_names() {
        assert_eq!(NodeState::NetworkConfigured.to_string(), "network_configured");
        assert_eq!(NodeState::ShuttingDown.to_string(), "shutting_down");
    }

    #[tokio::test]
    async fn stop_signal_resolves_after_stop() {
        let (handle, mut signal) = stop_channel();
        assert!(!handle.is_stop_requested());

        let remote = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            remote.stop();
        });

        tokio::time::timeout(Duration::from_secs(1), signal.stopped())
            .await
            .expect("stop should be observed");
        assert!(handle.is_stop_requested());

        // Already stopped: resolves immediately.
        handle.stop();
        tokio::time::timeout(Duration::from_millis(50), signal.stopped())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn dropped_handle_never_stops() {
        let (handle, mut signal) = stop_channel();
        drop(handle);
        let result = tokio::time::timeout(Duration::from_millis(20), signal.stopped()).await;
        assert!(result.is_err());
    }
}
