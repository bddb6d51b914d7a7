//! Stop token for background tasks owned by a platform service.
//!
//! Simulated services run timers on the worker's runtime. Each needs a
//! `watch` channel telling its tasks to stop, and the `JoinHandle`s so a
//! task that outlives its owner can be cancelled. [`TaskToken`] bundles
//! both. Registration is synchronous because the stack API that starts the
//! tasks is synchronous.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Coordinates shutdown of the background tasks of one service.
///
/// 1. Create with [`TaskToken::new()`].
/// 2. Give each task a receiver from [`subscribe()`](Self::subscribe) and
///    check it in a `tokio::select!` branch.
/// 3. Register the spawned handle with [`add_task()`](Self::add_task).
/// 4. Call [`signal_stop()`](Self::signal_stop) for a graceful stop.
///
/// Dropping the token signals stop and aborts every task that has not
/// finished yet.
pub struct TaskToken {
    stop_tx: watch::Sender<bool>,
    stop_rx: watch::Receiver<bool>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskToken {
    pub fn new() -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);

        Self {
            stop_tx,
            stop_rx,
            task_handles: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.stop_rx.clone()
    }

    /// Register a spawned task. Handles of tasks that already finished are
    /// dropped at the same time.
    pub fn add_task(&self, handle: JoinHandle<()>) {
        let mut handles = self.handles();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Send the stop signal. Idempotent.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    fn handles(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.task_handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TaskToken {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskToken {
    fn drop(&mut self) {
        self.signal_stop();
        for handle in self.handles().drain(..) {
            handle.abort();
        }
    }
}
