use std::sync::Arc;

use dashmap::DashMap;
use log::*;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<i64, Arc<Mutex<()>>>;

/// In-process locks keyed by order id.
///
/// Holding the lock for an order serializes every read-compute-write on that order within this process. Locks for
/// different orders are independent. Entries are dropped from the map once nobody holds or waits for them.
#[derive(Debug, Clone, Default)]
pub struct OrderLocks {
    locks: Arc<LockMap>,
}

impl OrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no one else holds the lock for `order_id`, then takes it.
    pub async fn lock(&self, order_id: i64) -> OrderLockGuard {
        let mutex = self.locks.entry(order_id).or_default().value().clone();
        if mutex.try_lock().is_err() {
            trace!("🔒️ Order #{order_id} is busy. Waiting for the lock");
        }
        let guard = mutex.lock_owned().await;
        OrderLockGuard { order_id, guard: Some(guard), locks: Arc::clone(&self.locks) }
    }

    /// The number of orders with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Releases the order's lock when dropped.
pub struct OrderLockGuard {
    order_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
}

impl OrderLockGuard {
    pub fn order_id(&self) -> i64 {
        self.order_id
    }
}

impl Drop for OrderLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map itself still refers to the mutex, so no one is waiting on it
        self.locks.remove_if(&self.order_id, |_, m| Arc::strong_count(m) == 1);
    }
}
