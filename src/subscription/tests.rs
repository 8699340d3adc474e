use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{ListenerRegistry, LiveSelection};
use crate::persistence::MemoryBacking;
use crate::selection::SelectionStore;

fn counting(counter: &Arc<AtomicUsize>) -> Box<dyn Fn(&[u64]) + Send + Sync> {
    let counter = Arc::clone(counter);
    Box::new(move |_: &[u64]| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn test_registry_new_is_empty() {
    let registry = ListenerRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.broadcast(&[1]), 0);
}

#[test]
fn test_registry_delivers_in_registration_order() {
    let registry = ListenerRegistry::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    let subs: Vec<_> = ["first", "second", "third"]
        .into_iter()
        .map(|name| {
            let order = Arc::clone(&order);
            registry.register(Box::new(move |ids: &[u64]| {
                order.lock().unwrap().push((name, ids.to_vec()))
            }))
        })
        .collect();

    assert_eq!(registry.broadcast(&[9, 4]), 3);
    assert_eq!(
        *order.lock().unwrap(),
        vec![
            ("first", vec![9, 4]),
            ("second", vec![9, 4]),
            ("third", vec![9, 4]),
        ]
    );
    assert_eq!(subs.len(), 3);
}

#[test]
fn test_panicking_listener_does_not_block_others() {
    let registry = ListenerRegistry::new();
    let before = Arc::new(AtomicUsize::new(0));
    let after = Arc::new(AtomicUsize::new(0));

    let _a = registry.register(counting(&before));
    let _bad = registry.register(Box::new(|_: &[u64]| panic!("render failed")));
    let _b = registry.register(counting(&after));

    assert_eq!(registry.broadcast(&[1]), 2);
    assert_eq!(registry.broadcast(&[1, 2]), 2);

    assert_eq!(before.load(Ordering::SeqCst), 2);
    assert_eq!(after.load(Ordering::SeqCst), 2);
    // the failing listener stays registered
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_unsubscribe_twice_is_safe() {
    let registry = ListenerRegistry::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let sub = registry.register(counting(&hits));
    let _other = registry.register(counting(&Arc::new(AtomicUsize::new(0))));

    assert!(sub.is_active());
    sub.unsubscribe();
    sub.unsubscribe();
    assert!(!sub.is_active());
    assert_eq!(registry.len(), 1);

    registry.broadcast(&[3]);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_dropping_subscription_deregisters() {
    let registry = ListenerRegistry::new();
    let hits = Arc::new(AtomicUsize::new(0));
    {
        let _sub = registry.register(counting(&hits));
        registry.broadcast(&[1]);
    }
    registry.broadcast(&[2]);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(registry.is_empty());
}

#[test]
fn test_subscription_outliving_registry() {
    let registry = ListenerRegistry::new();
    let sub = registry.register(Box::new(|_: &[u64]| {}));
    drop(registry);

    assert!(!sub.is_active());
    sub.unsubscribe();
}

#[test]
fn test_deregister_during_broadcast_skips_later_listener() {
    let registry = ListenerRegistry::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let victim = Arc::new(Mutex::new(None));

    let slot = Arc::clone(&victim);
    let _killer = registry.register(Box::new(move |_: &[u64]| {
        if let Some(sub) = slot.lock().unwrap().take() {
            drop(sub);
        }
    }));
    let target = registry.register(counting(&hits));
    *victim.lock().unwrap() = Some(target);

    assert_eq!(registry.broadcast(&[5]), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_register_during_broadcast_starts_next_time() {
    let registry = ListenerRegistry::new();
    let late_hits = Arc::new(AtomicUsize::new(0));
    let held = Arc::new(Mutex::new(Vec::new()));

    let weak = Arc::downgrade(&registry);
    let late = Arc::clone(&late_hits);
    let keep = Arc::clone(&held);
    let _spawner = registry.register(Box::new(move |_: &[u64]| {
        let mut keep = keep.lock().unwrap();
        if keep.is_empty() {
            if let Some(registry) = weak.upgrade() {
                keep.push(registry.register(counting(&late)));
            }
        }
    }));

    registry.broadcast(&[1]);
    assert_eq!(late_hits.load(Ordering::SeqCst), 0);

    registry.broadcast(&[1, 2]);
    assert_eq!(late_hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_live_selection_tracks_store() {
    let store = SelectionStore::shared(MemoryBacking::new());
    store.add(10);

    let view = LiveSelection::new(Arc::clone(&store));
    assert_eq!(view.members(), vec![10]);

    view.add(11);
    assert_eq!(view.members(), vec![11, 10]);

    // changes made through the store directly reach the view too
    store.remove(10);
    assert_eq!(view.members(), vec![11]);
    assert!(view.is_member(11));
    assert!(!view.toggle(11));
    assert!(view.members().is_empty());
}

#[test]
fn test_two_views_stay_in_sync() {
    let store = SelectionStore::shared(MemoryBacking::new());
    let card = LiveSelection::new(Arc::clone(&store));
    let dashboard = LiveSelection::new(Arc::clone(&store));

    card.toggle(3);
    dashboard.toggle(4);

    assert_eq!(card.members(), vec![4, 3]);
    assert_eq!(dashboard.members(), vec![4, 3]);

    dashboard.remove(3);
    assert_eq!(card.members(), vec![4]);
}

#[test]
fn test_live_selection_render_hook() {
    let store = SelectionStore::shared(MemoryBacking::new());
    let renders = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&renders);
    let view = LiveSelection::with_render(Arc::clone(&store), move |ids| {
        sink.lock().unwrap().push(ids.len());
    });

    view.add(1);
    view.add(2);
    view.add(2);
    view.remove(1);

    assert_eq!(*renders.lock().unwrap(), vec![1, 2, 1]);
}

#[test]
fn test_dropping_view_deregisters() {
    let store = SelectionStore::shared(MemoryBacking::new());
    let view = LiveSelection::new(Arc::clone(&store));
    assert_eq!(store.subscriber_count(), 1);

    drop(view);
    assert_eq!(store.subscriber_count(), 0);
    store.add(1);
}

#[test]
fn test_subscription_ids_are_unique() {
    let registry = ListenerRegistry::new();
    let first = registry.register(Box::new(|_: &[u64]| {}));
    let second = registry.register(Box::new(|_: &[u64]| {}));
    assert_ne!(first.id(), second.id());

    // ids are not reused after deregistration
    let first_id = first.id();
    drop(first);
    let third = registry.register(Box::new(|_: &[u64]| {}));
    assert_ne!(third.id(), first_id);
    assert_ne!(third.id(), second.id());
}

#[test]
fn test_live_selection_exposes_store_and_subscription() {
    let store = SelectionStore::shared(MemoryBacking::new());
    let view = LiveSelection::new(Arc::clone(&store));

    assert!(Arc::ptr_eq(view.store(), &store));
    assert!(view.subscription().is_active());

    // unsubscribing through the view freezes its snapshot
    view.subscription().unsubscribe();
    assert!(!view.subscription().is_active());
    store.add(6);
    assert!(view.members().is_empty());
    assert!(view.is_member(6));
}
