//! In-process backing store.
//!
//! Mirrors the behaviour of browser local storage closely enough for tests and
//! ephemeral sessions: values are strings, and an optional quota caps the total
//! number of bytes (keys plus values) the store will hold.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::Backing;
use crate::utils::StorageError;

#[derive(Debug, Default)]
pub struct MemoryBacking {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryBacking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backing that rejects writes pushing its size past `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: Some(limit),
        }
    }

    /// Store `value` under `key` bypassing the quota.
    ///
    /// Useful to seed a backing with data written by an earlier session,
    /// including data that no longer parses.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    /// Total bytes currently held.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Backing for MemoryBacking {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;

        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
