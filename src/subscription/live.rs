//! Per-consumer view of a shared selection store.
//!
//! A `LiveSelection` keeps its own copy of the member list, refreshed by a
//! subscription on every change, and forwards mutations to the store. An
//! optional render hook runs after each refresh so a consumer can redraw.
//! Dropping the view deregisters it.

use std::sync::{Arc, PoisonError, RwLock};

use super::Subscription;
use crate::selection::SelectionStore;

pub struct LiveSelection {
    store: Arc<SelectionStore>,
    members: Arc<RwLock<Vec<u64>>>,
    subscription: Subscription,
}

impl LiveSelection {
    pub fn new(store: Arc<SelectionStore>) -> Self {
        Self::with_render(store, |_| {})
    }

    /// Build a view that calls `render` with the new members after every change.
    pub fn with_render<F>(store: Arc<SelectionStore>, render: F) -> Self
    where
        F: Fn(&[u64]) + Send + Sync + 'static,
    {
        let members = Arc::new(RwLock::new(Vec::new()));

        let view = Arc::clone(&members);
        let subscription = store.subscribe(move |ids| {
            *view.write().unwrap_or_else(PoisonError::into_inner) = ids.to_vec();
            render(ids);
        });

        // Subscribed first and seeded under the view lock: a broadcast racing
        // with construction either lands after the seed or blocks until it is done.
        {
            let mut seed = members.write().unwrap_or_else(PoisonError::into_inner);
            *seed = store.current_members();
        }

        Self {
            store,
            members,
            subscription,
        }
    }

    /// The members as of the last change this view was told about.
    pub fn members(&self) -> Vec<u64> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn add(&self, id: u64) -> bool {
        self.store.add(id)
    }

    pub fn remove(&self, id: u64) -> bool {
        self.store.remove(id)
    }

    pub fn toggle(&self, id: u64) -> bool {
        self.store.toggle(id)
    }

    pub fn is_member(&self, id: u64) -> bool {
        self.store.is_member(id)
    }

    pub fn store(&self) -> &Arc<SelectionStore> {
        &self.store
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl std::fmt::Debug for LiveSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSelection")
            .field("members", &self.members())
            .field("subscription", &self.subscription)
            .finish()
    }
}
