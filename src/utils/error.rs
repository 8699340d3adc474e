//! The `error` module defines the error types used within `wishlist-sync`.
//!
//! Store operations never surface errors to their callers; these types only
//! travel across the backing-store seam and out of the command-line front end.

use thiserror::Error;

/// Failure reported by a [`Backing`](crate::persistence::Backing) implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] sled::Error),

    #[error("value of {needed} bytes exceeds storage quota of {limit} bytes")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Top-level error for the `wishlist` binary.
#[derive(Debug, Error)]
pub enum WishlistError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("could not write output: {0}")]
    Io(#[from] std::io::Error),
}
