//! Fixed-capacity pool of event descriptors.
//!
//! Each descriptor behaves like an eventfd: producers add to a counter and
//! wake the owner, a read drains the counter. The worker owns the pool and
//! waits on all descriptors at once; subsystems hold cloned
//! [`EventSignal`]s to wake it.
//!
//! A single [`Notify`] wakes the waiter for any descriptor, so a signal that
//! lands between the scan and the await is never lost: `notify_one` stores a
//! permit when nobody is waiting.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::Notify;

use crate::error::PoolError;
use crate::traits::EventSource;

struct Slot {
    source: EventSource,
    pending: AtomicU64,
}

struct PoolShared {
    notify: Notify,
    released: AtomicBool,
}

/// Producer side of one descriptor.
#[derive(Clone)]
pub struct EventSignal {
    slot: Arc<Slot>,
    shared: Arc<PoolShared>,
}

impl EventSignal {
    pub fn source(&self) -> EventSource {
        self.slot.source
    }

    /// Add one event to the descriptor and wake the pool owner.
    ///
    /// Fails once the pool has been released.
    pub fn signal(&self) -> Result<(), PoolError> {
        if self.is_released() {
            return Err(PoolError::Released);
        }
        self.slot.pending.fetch_add(1, Ordering::SeqCst);
        self.shared.notify.notify_one();
        Ok(())
    }

    pub fn is_released(&self) -> bool {
        self.shared.released.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for EventSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSignal")
            .field("source", &self.slot.source)
            .field("released", &self.is_released())
            .finish()
    }
}

/// The worker-owned set of event descriptors.
///
/// Dropping the pool releases it; [`release`](Self::release) does the same
/// explicitly and reports how many descriptors were closed.
pub struct ResourcePool {
    capacity: usize,
    slots: Vec<Arc<Slot>>,
    shared: Arc<PoolShared>,
    cursor: usize,
}

impl ResourcePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::with_capacity(capacity),
            shared: Arc::new(PoolShared {
                notify: Notify::new(),
                released: AtomicBool::new(false),
            }),
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocate a descriptor for `source`.
    pub fn register(&mut self, source: EventSource) -> Result<EventSignal, PoolError> {
        if self.slots.iter().any(|s| s.source == source) {
            return Err(PoolError::Duplicate(source));
        }
        if self.slots.len() >= self.capacity {
            return Err(PoolError::Exhausted {
                capacity: self.capacity,
            });
        }

        let slot = Arc::new(Slot {
            source,
            pending: AtomicU64::new(0),
        });
        self.slots.push(Arc::clone(&slot));
        tracing::trace!(%source, used = self.slots.len(), "event descriptor registered");

        Ok(EventSignal {
            slot,
            shared: Arc::clone(&self.shared),
        })
    }

    /// Take one ready descriptor without waiting, draining its counter.
    ///
    /// Descriptors are scanned round-robin so a busy source cannot starve
    /// the others.
    pub fn try_take(&mut self) -> Option<(EventSource, u64)> {
        let n = self.slots.len();
        for offset in 0..n {
            let idx = (self.cursor + offset) % n;
            let count = self.slots[idx].pending.swap(0, Ordering::SeqCst);
            if count > 0 {
                self.cursor = (idx + 1) % n;
                return Some((self.slots[idx].source, count));
            }
        }
        None
    }

    /// Wait until any descriptor is signalled and return it with its drained count.
    ///
    /// Cancel-safe: dropping the future loses no events.
    pub async fn wait(&mut self) -> (EventSource, u64) {
        loop {
            if let Some(ready) = self.try_take() {
                return ready;
            }
            self.shared.notify.notified().await;
        }
    }

    /// Close every descriptor. Later signals fail with [`PoolError::Released`].
    pub fn release(mut self) -> usize {
        self.close()
    }

    fn close(&mut self) -> usize {
        if self.shared.released.swap(true, Ordering::SeqCst) {
            return 0;
        }
        let closed = self.slots.len();
        self.slots.clear();
        tracing::debug!(closed, "event descriptor pool released");
        closed
    }
}

impl Drop for ResourcePool {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn full_pool() -> (ResourcePool, Vec<EventSignal>) {
        let mut pool = ResourcePool::new(3);
        let signals = EventSource::ALL
            .iter()
            .map(|&s| pool.register(s).unwrap())
            .collect();
        (pool, signals)
    }

    #[test]
    fn register_up_to_capacity() {
        let (mut pool, signals) = full_pool();
        assert_eq!(pool.len(), 3);
        assert_eq!(signals[2].source(), EventSource::Radio);

        // All three sources are taken, so any further source is a duplicate;
        // a larger pool shows the capacity check.
        assert_eq!(
            pool.register(EventSource::Radio).unwrap_err(),
            PoolError::Duplicate(EventSource::Radio)
        );

        let mut small = ResourcePool::new(1);
        small.register(EventSource::Netif).unwrap();
        assert_eq!(
            small.register(EventSource::Radio).unwrap_err(),
            PoolError::Exhausted { capacity: 1 }
        );
    }

    #[test]
    fn try_take_drains_counter() {
        let (mut pool, signals) = full_pool();
        assert!(pool.try_take().is_none());

        signals[1].signal().unwrap();
        signals[1].signal().unwrap();
        assert_eq!(pool.try_take(), Some((EventSource::TaskQueue, 2)));
        assert!(pool.try_take().is_none());
    }

    #[test]
    fn try_take_is_round_robin() {
        let (mut pool, signals) = full_pool();
        for s in &signals {
            s.signal().unwrap();
        }
        let first = pool.try_take().unwrap().0;
        // Re-signal the first source; the other two must still be served first.
        signals
            .iter()
            .find(|s| s.source() == first)
            .unwrap()
            .signal()
            .unwrap();
        let second = pool.try_take().unwrap().0;
        let third = pool.try_take().unwrap().0;
        assert_ne!(second, first);
        assert_ne!(third, first);
        assert_ne!(second, third);
        assert_eq!(pool.try_take().unwrap().0, first);
    }

    #[tokio::test]
    async fn wait_returns_signalled_source() {
        let (mut pool, signals) = full_pool();
        let radio = signals[2].clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            radio.signal().unwrap();
        });

        let ready = tokio::time::timeout(Duration::from_secs(1), pool.wait())
            .await
            .expect("wait should complete after a signal");
        assert_eq!(ready, (EventSource::Radio, 1));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn signal_before_wait_is_not_lost() {
        let (mut pool, signals) = full_pool();
        signals[0].signal().unwrap();
        let ready = tokio::time::timeout(Duration::from_millis(100), pool.wait())
            .await
            .unwrap();
        assert_eq!(ready.0, EventSource::Netif);
    }

    #[test]
    fn release_closes_descriptors() {
        let (pool, signals) = full_pool();
        assert_eq!(pool.release(), 3);
        for s in &signals {
            assert!(s.is_released());
            assert_eq!(s.signal(), Err(PoolError::Released));
        }
    }

    #[test]
    fn drop_releases_pool() {
        let (pool, signals) = full_pool();
        drop(pool);
        assert!(signals.iter().all(EventSignal::is_released));
    }
}
