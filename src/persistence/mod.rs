//! The `persistence` module provides the durable key-value backing behind a
//! selection store.
//!
//! A backing is a synchronous string store addressed by key. The store keeps
//! exactly one entry in it (a JSON array of ids) and rewrites that entry after
//! every mutation.
//!
//! Two backings ship with the crate:
//! - [`SledBacking`]: on-disk, using `sled` as an embedded key-value store.
//! - [`MemoryBacking`]: in-process, with an optional byte quota that rejects
//!   oversized writes the way browser local storage does.

pub mod memory;
pub mod sled_store;

use std::sync::Arc;

use crate::utils::StorageError;

pub use memory::MemoryBacking;
pub use sled_store::SledBacking;

/// Synchronous string storage keyed by name.
pub trait Backing: Send + Sync {
    /// Read the value stored under `key`, `Ok(None)` when absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<B: Backing + ?Sized> Backing for Arc<B> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

impl<B: Backing + ?Sized> Backing for Box<B> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}
