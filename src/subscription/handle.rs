use std::sync::Weak;
use std::sync::atomic::{AtomicBool, Ordering};

use super::registry::{ListenerRegistry, SubscriberId};

/// Deregistration handle returned by [`SelectionStore::subscribe`](crate::SelectionStore::subscribe).
///
/// The callback stays registered until [`unsubscribe`](Self::unsubscribe) is
/// called or the handle is dropped. The handle only weakly references the
/// registry, so it may outlive the store.
#[must_use = "dropping a Subscription deregisters its callback"]
pub struct Subscription {
    registry: Weak<ListenerRegistry>,
    id: SubscriberId,
    released: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(registry: Weak<ListenerRegistry>, id: SubscriberId) -> Self {
        Self {
            registry,
            id,
            released: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Stop receiving change notifications. Further calls do nothing.
    pub fn unsubscribe(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.deregister(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        !self.released.load(Ordering::Acquire) && self.registry.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
