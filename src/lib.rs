//! # wishlist-sync
//!
//! `wishlist-sync` keeps a shopper's wishlist: a shared, observable set of
//! product ids that is written through to durable storage on every change
//! and pushed to every view watching it.
//!
//! ## Core Modules
//!
//! - `selection`: the ordered id set and the store that owns it.
//! - `subscription`: listener registry, subscription handles and live views.
//! - `persistence`: the key-value backings the store writes through to.
//! - `config`: loading settings from files and the environment.
//! - `utils`: error types and logging setup.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use wishlist_sync::{LiveSelection, MemoryBacking, SelectionStore};
//!
//! let store = SelectionStore::shared(MemoryBacking::new());
//! let view = LiveSelection::new(Arc::clone(&store));
//!
//! store.add(5);
//! store.add(3);
//! store.toggle(5);
//! assert_eq!(view.members(), vec![3]);
//! ```

pub mod config;
pub mod persistence;
pub mod selection;
pub mod subscription;
pub mod utils;

pub use persistence::{Backing, MemoryBacking, SledBacking};
pub use selection::{DEFAULT_KEY, SelectionSet, SelectionStore};
pub use subscription::{LiveSelection, Subscription};
