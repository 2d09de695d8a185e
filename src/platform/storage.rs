//! Storage backends
//!
//! - `LocalStorage` on web (`window.localStorage`)
//! - `FileStore` natively: one JSON object of string values

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use crate::persistence::{KeyValueStore, StorageError};

    /// Key-value store persisted to a JSON file
    ///
    /// Every `set` rewrites the file.
    #[derive(Debug)]
    pub struct FileStore {
        path: PathBuf,
        entries: BTreeMap<String, String>,
    }

    impl FileStore {
        /// Open `path`, starting empty if the file does not exist
        pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
            let path = path.as_ref().to_path_buf();
            let entries = match fs::read_to_string(&path) {
                Ok(json) => serde_json::from_str(&json).map_err(|_| StorageError::Corrupt {
                    key: "*",
                    value: json,
                })?,
                Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
                Err(e) => return Err(e.into()),
            };
            Ok(Self { path, entries })
        }

        fn flush(&self) -> Result<(), StorageError> {
            let json = serde_json::to_string_pretty(&self.entries)?;
            fs::write(&self.path, json)?;
            Ok(())
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.entries.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.entries.insert(key.to_string(), value.to_string());
            self.flush()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::persistence::{self, keys};

        fn temp_path(name: &str) -> PathBuf {
            std::env::temp_dir().join(format!("future-ball-{}-{name}.json", std::process::id()))
        }

        #[test]
        fn test_missing_file_starts_empty() {
            let path = temp_path("missing");
            let _ = fs::remove_file(&path);
            let store = FileStore::open(&path).unwrap();
            assert_eq!(store.get(keys::LIVES).unwrap(), None);
        }

        #[test]
        fn test_values_survive_reopen() {
            let path = temp_path("reopen");
            let mut store = FileStore::open(&path).unwrap();
            persistence::save(&mut store, keys::STORY_LEVEL, 7u32);
            drop(store);

            let store = FileStore::open(&path).unwrap();
            assert_eq!(persistence::load_or(&store, keys::STORY_LEVEL, 1u32), 7);
            let _ = fs::remove_file(&path);
        }

        #[test]
        fn test_corrupt_file_is_an_error() {
            let path = temp_path("corrupt");
            fs::write(&path, "not json").unwrap();
            assert!(matches!(FileStore::open(&path), Err(StorageError::Corrupt { .. })));
            let _ = fs::remove_file(&path);
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::Storage;

    use crate::persistence::{KeyValueStore, StorageError};

    /// `window.localStorage`
    ///
    /// Private browsing and sandboxed iframes may deny access; every call
    /// then fails with `Unavailable`.
    #[derive(Debug, Clone, Default)]
    pub struct LocalStorage {
        storage: Option<Storage>,
    }

    impl LocalStorage {
        pub fn new() -> Self {
            let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();
            if storage.is_none() {
                log::warn!("LocalStorage unavailable, progress will not be saved");
            }
            Self { storage }
        }
    }

    impl KeyValueStore for LocalStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
            storage.get_item(key).map_err(|_| StorageError::Unavailable)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
            storage.set_item(key, value).map_err(|_| StorageError::Unavailable)
        }
    }
}
