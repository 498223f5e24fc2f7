//! Storage
//!
//! A minimal key-value store holding serialized values under fixed keys, in
//! the manner of a browser's local storage. The cart and the order log each
//! live under their own key.

use std::{
    io,
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
};

use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Key holding the serialized order log.
pub const ORDERS_KEY: &str = "orders";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key is not usable by this backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// IO error reading or writing a stored value
    #[error("Storage IO error at {path}: {source}")]
    Io {
        /// Path of the file being accessed
        path: PathBuf,

        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// A value could not be serialized for storage.
    #[error("Failed to serialize value for {key:?}: {source}")]
    Serialize {
        /// Key being written
        key: String,

        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Serializes read-modify-write cycles over one storage.
#[derive(Debug, Default)]
pub struct StorageLock(Mutex<()>);

impl StorageLock {
    /// Block until the lock is held. A poisoned lock is recovered.
    pub fn acquire(&self) -> MutexGuard<'_, ()> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A string key-value store.
///
/// Implementations must be safe to share between threads. Single calls are
/// atomic; a caller spanning several calls holds [`Storage::lock`] for the
/// whole sequence, and every caller over the same backing data must see the
/// same lock.
pub trait Storage: Send + Sync {
    /// The lock guarding read-modify-write sequences on this storage.
    fn lock(&self) -> &StorageLock;

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn lock(&self) -> &StorageLock {
        (**self).lock()
    }
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Serialize `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns a [`StorageError`] if serialization or the write fails.
pub fn write_json<S, T>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: Storage + ?Sized,
    T: serde::Serialize + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;

    storage.set(key, &json)
}
