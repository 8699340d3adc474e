//! Selection store
//!
//! The authoritative, shared copy of a [`SelectionSet`]. Every mutation that
//! changes the set is:
//! 1. applied to the in-memory set
//! 2. written through to the backing store
//! 3. broadcast to every registered listener, in registration order
//!
//! Concurrency notes:
//! - One mutation at a time owns the writer slot. Mutations from other
//!   threads wait for it, so changes and their broadcasts are totally ordered.
//! - While a broadcast is running, any mutation (from a listener, or from a
//!   thread a listener is waiting on) is applied to memory at once and
//!   queued. The writer persists and broadcasts queued changes in order
//!   before giving up the slot, so nested changes are neither lost nor
//!   deadlocked. Such a call returns before its own broadcast has run.
//! - The member list sits behind its own `RwLock`, never held while
//!   listeners run, so listeners can read the store while being notified.
//!
//! Failures never reach the caller. Unreadable stored data starts the store
//! empty, a rejected write keeps the in-memory change, and a panicking
//! listener is skipped.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{debug, info, warn};

use super::set::SelectionSet;
use crate::persistence::Backing;
use crate::subscription::{ListenerRegistry, Subscription};

/// Storage key used when none is configured.
pub const DEFAULT_KEY: &str = "wishlist";

/// A committed in-memory change still owed a write and a broadcast.
struct Change {
    op: &'static str,
    id: u64,
    members: Vec<u64>,
    encoded: Result<String, serde_json::Error>,
}

#[derive(Default)]
struct Control {
    busy: bool,
    delivering: bool,
    pending: VecDeque<Change>,
}

pub struct SelectionStore {
    key: String,
    backing: Box<dyn Backing>,
    state: RwLock<SelectionSet>,
    control: Mutex<Control>,
    idle: Condvar,
    listeners: Arc<ListenerRegistry>,
}

impl SelectionStore {
    /// Load the set stored under `key` and build the store around it.
    ///
    /// Never fails: a missing, unreadable or corrupt value yields an empty set.
    pub fn init(backing: impl Backing + 'static, key: &str) -> Self {
        let raw = match backing.read(key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "could not read stored selection, starting empty");
                None
            }
        };
        let set = SelectionSet::decode_or_empty(raw.as_deref());
        info!(key, members = set.len(), "selection store initialized");

        Self {
            key: key.to_string(),
            backing: Box::new(backing),
            state: RwLock::new(set),
            control: Mutex::new(Control::default()),
            idle: Condvar::new(),
            listeners: ListenerRegistry::new(),
        }
    }

    /// [`init`](Self::init) with [`DEFAULT_KEY`], wrapped for sharing.
    pub fn shared(backing: impl Backing + 'static) -> Arc<Self> {
        Arc::new(Self::init(backing, DEFAULT_KEY))
    }

    /// Add `id` at the front. Returns `false` if it was already a member.
    pub fn add(&self, id: u64) -> bool {
        self.mutate("add", id, |set| set.insert_front(id)).is_some()
    }

    /// Remove `id`. Returns `false` if it was not a member.
    pub fn remove(&self, id: u64) -> bool {
        self.mutate("remove", id, |set| set.remove(id)).is_some()
    }

    /// Remove `id` if present, add it otherwise. Returns whether `id` is a
    /// member afterwards.
    pub fn toggle(&self, id: u64) -> bool {
        let outcome = self.mutate("toggle", id, |set| {
            if set.contains(id) {
                set.remove(id)
            } else {
                set.insert_front(id)
            }
        });
        match outcome {
            Some(members) => members.contains(&id),
            None => self.is_member(id),
        }
    }

    pub fn is_member(&self, id: u64) -> bool {
        self.read_state().contains(id)
    }

    /// Snapshot of the members, most recently added first.
    pub fn current_members(&self) -> Vec<u64> {
        self.read_state().members().to_vec()
    }

    pub fn len(&self) -> usize {
        self.read_state().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_state().is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Register `on_change` to receive the full member list after every change.
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(&[u64]) + Send + Sync + 'static,
    {
        self.listeners.register(Box::new(on_change))
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Apply `change`; on an effective change return the new members.
    fn mutate<F>(&self, op: &'static str, id: u64, change: F) -> Option<Vec<u64>>
    where
        F: FnOnce(&mut SelectionSet) -> bool,
    {
        let mut control = self.lock_control();

        loop {
            if control.delivering {
                let committed = self.apply(op, id, change)?;
                let members = committed.members.clone();
                debug!(op, id, "queued change raised during broadcast");
                control.pending.push_back(committed);
                return Some(members);
            }
            if !control.busy {
                break;
            }
            control = self.idle.wait(control).unwrap_or_else(PoisonError::into_inner);
        }

        let committed = self.apply(op, id, change)?;
        let members = committed.members.clone();
        control.busy = true;
        drop(control);

        self.publish(committed);
        Some(members)
    }

    /// Commit `change` to memory. Returns `None` when the set is unchanged.
    fn apply<F>(&self, op: &'static str, id: u64, change: F) -> Option<Change>
    where
        F: FnOnce(&mut SelectionSet) -> bool,
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !change(&mut state) {
            debug!(op, id, "selection unchanged");
            return None;
        }
        Some(Change {
            op,
            id,
            members: state.members().to_vec(),
            encoded: state.encode(),
        })
    }

    /// Persist and broadcast `first`, then every change queued meanwhile, then
    /// release the writer slot.
    fn publish(&self, first: Change) {
        let mut next = Some(first);

        while let Some(change) = next {
            match &change.encoded {
                Ok(value) => self.persist(value),
                Err(e) => warn!(op = change.op, error = %e, "could not encode selection for storage"),
            }

            self.lock_control().delivering = true;
            let delivered = self.listeners.broadcast(&change.members);
            debug!(
                op = change.op,
                id = change.id,
                members = change.members.len(),
                delivered,
                "selection changed"
            );

            let mut control = self.lock_control();
            control.delivering = false;
            next = control.pending.pop_front();
            if next.is_none() {
                control.busy = false;
                self.idle.notify_all();
            }
        }
    }

    fn persist(&self, value: &str) {
        if let Err(e) = self.backing.write(&self.key, value) {
            // The session keeps the change; it just won't survive a restart.
            warn!(key = %self.key, error = %e, "failed to persist selection");
        }
    }

    fn lock_control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, SelectionSet> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("key", &self.key)
            .field("members", &self.current_members())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
