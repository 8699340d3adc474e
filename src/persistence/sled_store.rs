//! Backing store on top of `sled`
//!
//! Each key maps to a single UTF-8 value in the default tree. Writes are
//! flushed before returning so a mutation that reports success survives a
//! crash of the process.

use std::path::Path;

use sled::Db;
use tracing::debug;

use super::Backing;
use crate::utils::StorageError;

#[derive(Clone)]
pub struct SledBacking {
    db: Db,
}

impl SledBacking {
    /// Open or create a sled database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let db = sled::open(path)?;
        debug!(path = %path.display(), "opened sled backing");
        Ok(Self { db })
    }

    /// Open a database that is deleted when the last handle is dropped.
    pub fn temporary() -> Result<Self, StorageError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }
}

impl Backing for SledBacking {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let Some(raw) = self.db.get(key.as_bytes())? else {
            return Ok(None);
        };
        // Invalid UTF-8 is passed through lossily and rejected by the JSON decoder.
        Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for SledBacking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledBacking")
            .field("db", &"sled::Db")
            .finish()
    }
}
