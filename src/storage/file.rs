//! File-backed storage

use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use rustc_hash::FxHashMap;
use tempfile::NamedTempFile;

use super::{Storage, StorageError, StorageLock};

/// One lock per storage directory, shared by every handle opened on it.
static DIRECTORY_LOCKS: OnceLock<Mutex<FxHashMap<PathBuf, Arc<StorageLock>>>> = OnceLock::new();

fn directory_lock(root: &Path) -> Arc<StorageLock> {
    let mut locks = DIRECTORY_LOCKS
        .get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    Arc::clone(locks.entry(root.to_path_buf()).or_default())
}

/// Storage keeping each key in its own `<key>.json` file inside a directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers never observe a half-written value. Handles
/// opened on the same directory within a process share one [`StorageLock`].
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    lock: Arc<StorageLock>,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError::Io`] if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();

        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            path: root.clone(),
            source,
        })?;

        let root = fs::canonicalize(&root).map_err(|source| StorageError::Io {
            path: root.clone(),
            source,
        })?;

        let lock = directory_lock(&root);

        Ok(Self { root, lock })
    }

    /// Directory holding the stored files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(self.root.join(format!("{key}.json")))
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }
}

impl Storage for FileStorage {
    fn lock(&self) -> &StorageLock {
        &self.lock
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        let io_err = |source| StorageError::Io {
            path: path.clone(),
            source,
        };

        let mut file = NamedTempFile::new_in(&self.root).map_err(io_err)?;

        file.write_all(value.as_bytes()).map_err(io_err)?;
        file.as_file().sync_all().map_err(io_err)?;
        file.persist(&path).map_err(|err| io_err(err.error))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn values_persist_across_instances() -> TestResult {
        let dir = TempDir::new()?;

        FileStorage::open(dir.path())?.set("cart", "[1]")?;

        let reopened = FileStorage::open(dir.path())?;

        assert_eq!(reopened.get("cart")?.as_deref(), Some("[1]"));
        assert!(dir.path().join("cart.json").exists());

        Ok(())
    }

    #[test]
    fn missing_key_is_none() -> TestResult {
        let dir = TempDir::new()?;
        let storage = FileStorage::open(dir.path())?;

        assert_eq!(storage.get("orders")?, None);

        Ok(())
    }

    #[test]
    fn set_overwrites_previous_value() -> TestResult {
        let dir = TempDir::new()?;
        let storage = FileStorage::open(dir.path())?;

        storage.set("cart", "[1]")?;
        storage.set("cart", "[]")?;

        assert_eq!(storage.get("cart")?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn remove_deletes_file_and_tolerates_absence() -> TestResult {
        let dir = TempDir::new()?;
        let storage = FileStorage::open(dir.path())?;

        storage.set("cart", "[]")?;
        storage.remove("cart")?;
        storage.remove("cart")?;

        assert!(!dir.path().join("cart.json").exists());

        Ok(())
    }

    #[test]
    fn handles_on_one_directory_share_a_lock() -> TestResult {
        let dir = TempDir::new()?;
        let first = FileStorage::open(dir.path())?;
        let second = FileStorage::open(dir.path().join("."))?;
        let other = TempDir::new()?;

        assert!(
            std::ptr::eq(first.lock(), second.lock()),
            "expected both handles to share a lock"
        );
        assert!(
            !std::ptr::eq(first.lock(), FileStorage::open(other.path())?.lock()),
            "expected separate directories to have separate locks"
        );

        Ok(())
    }

    #[test]
    fn path_like_keys_are_rejected() -> TestResult {
        let dir = TempDir::new()?;
        let storage = FileStorage::open(dir.path())?;

        assert!(matches!(
            storage.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));

        Ok(())
    }
}
