//! Local key-value blob persistence. Each key holds one JSON document.
//!
//! - Web: `window.localStorage`.
//! - Desktop / mobile: one `<key>.json` file per key under the platform data
//!   directory.
//! - Tests: [`MemoryStore`].
//!
//! Reads are lenient ([`load_or_default`] swallows missing and malformed
//! blobs); writes are best effort ([`save_best_effort`] logs and moves on).

use std::cell::RefCell;
use std::collections::HashMap;

use dioxus::logger::tracing::{debug, warn};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub const USER_KEY: &str = "user";
pub const ACTIVE_CARDS_KEY: &str = "activeCards";
pub const FEATURE_FLAGS_KEY: &str = "featureFlags";
pub const RECORDS_KEY: &str = "records";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode blob: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Load `key` and parse it, falling back to `default` when the blob is
/// missing, unreadable or malformed.
pub fn load_or_default<T, F>(store: &dyn BlobStore, key: &str, default: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!("ignoring malformed `{key}` blob: {err}");
                default()
            }
        },
        Ok(None) => default(),
        Err(err) => {
            warn!("could not read `{key}` blob: {err}");
            default()
        }
    }
}

pub fn save<T: Serialize + ?Sized>(
    store: &dyn BlobStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Write `value` under `key`; failures are logged and otherwise ignored
/// because the blob store is a convenience cache, not a system of record.
pub fn save_best_effort<T: Serialize + ?Sized>(store: &dyn BlobStore, key: &str, value: &T) {
    match save(store, key, value) {
        Ok(()) => debug!("saved `{key}` blob"),
        Err(err) => warn!("could not save `{key}` blob: {err}"),
    }
}

/// In-memory store used by tests and as a last resort when no platform
/// storage exists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl BlobStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::PathBuf;

    use directories::ProjectDirs;

    use super::{BlobStore, StorageError};

    /// One JSON file per key inside `root`.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        root: PathBuf,
    }

    impl FileStore {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        /// Store rooted at the platform data directory.
        pub fn platform() -> Result<Self, StorageError> {
            ProjectDirs::from("org", "vitalcard", "Vitalcard")
                .map(|dirs| Self::new(dirs.data_dir()))
                .ok_or_else(|| StorageError::Unavailable("no home directory".into()))
        }

        fn path(&self, key: &str) -> PathBuf {
            let file: String = key
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
                .collect();
            self.root.join(format!("{file}.json"))
        }
    }

    impl BlobStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            match fs::read_to_string(self.path(key)) {
                Ok(raw) => Ok(Some(raw)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            fs::create_dir_all(&self.root)?;
            fs::write(self.path(key), value)?;
            Ok(())
        }
    }
}

/// The blob store for the current platform.
pub fn platform_store() -> Box<dyn BlobStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStorage)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        match FileStore::platform() {
            Ok(store) => Box::new(store),
            Err(err) => {
                warn!("falling back to in-memory storage: {err}");
                Box::new(MemoryStore::new())
            }
        }
    }
}
