//! Listener registry
//!
//! Holds the callbacks observing one selection store, in registration order.
//!
//! Delivery guarantees:
//! - callbacks run in the order they were registered
//! - each callback registered when a broadcast starts is invoked at most once
//!   by it, and a callback deregistered before its turn is skipped
//! - a callback that panics is logged and skipped; the remaining callbacks
//!   still receive the broadcast
//!
//! The entry list is only locked to take a snapshot, so callbacks may
//! register or deregister listeners while a broadcast is running.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, trace};

use super::Subscription;

pub type SubscriberId = u64;

/// Change callback, invoked with the full member list.
pub type Callback = dyn Fn(&[u64]) + Send + Sync;

struct Entry {
    id: SubscriberId,
    active: AtomicBool,
    callback: Box<Callback>,
}

#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    entries: Mutex<Vec<Arc<Entry>>>,
}

impl ListenerRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Append `callback` to the registry and hand back its deregistration handle.
    pub fn register(self: &Arc<Self>, callback: Box<Callback>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = Arc::new(Entry {
            id,
            active: AtomicBool::new(true),
            callback,
        });
        self.lock_entries().push(entry);
        trace!(subscriber = id, "registered listener");
        Subscription::new(Arc::downgrade(self), id)
    }

    /// Remove the listener with `id`. Returns `false` if it was not registered.
    pub fn deregister(&self, id: SubscriberId) -> bool {
        let mut entries = self.lock_entries();
        let Some(pos) = entries.iter().position(|e| e.id == id) else {
            return false;
        };
        let entry = entries.remove(pos);
        entry.active.store(false, Ordering::Release);
        trace!(subscriber = id, "deregistered listener");
        true
    }

    /// Deliver `members` to every registered listener. Returns how many
    /// callbacks completed without panicking.
    pub fn broadcast(&self, members: &[u64]) -> usize {
        let snapshot: Vec<Arc<Entry>> = self.lock_entries().clone();
        let mut delivered = 0;

        for entry in snapshot {
            if !entry.active.load(Ordering::Acquire) {
                continue;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (entry.callback)(members)));
            match outcome {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    error!(
                        subscriber = entry.id,
                        reason = panic_message(payload.as_ref()),
                        "listener panicked during broadcast"
                    );
                }
            }
        }

        delivered
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, Vec<Arc<Entry>>> {
        // Callbacks never run under this lock, so a poisoned guard still holds a valid list.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
