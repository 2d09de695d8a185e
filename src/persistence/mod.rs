//! Best-effort local persistence
//!
//! Everything the game remembers between sessions goes through a small
//! string key-value port:
//! - `KeyValueStore` trait (LocalStorage on web, JSON file natively)
//! - `MemoryStore` for tests and storage-less hosts
//! - Typed read helpers that treat missing or corrupt values as absent
//!
//! Writes are fire-and-forget: callers log failures and carry on.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Storage keys shared with the web build
pub mod keys {
    pub const LOCALE: &str = "locale";
    pub const LIVES: &str = "lives";
    pub const LAST_USED_TIMESTAMP: &str = "lastUsedTimestamp";
    /// Story mode level (legacy key name kept for existing saves)
    pub const STORY_LEVEL: &str = "classicLevel";
    pub const SETTINGS: &str = "settings";
}

/// Errors from a storage backend
#[derive(Debug)]
pub enum StorageError {
    /// Backend not available (private browsing, no window, ...)
    Unavailable,
    /// Filesystem error from the native store
    Io(std::io::Error),
    /// Value could not be encoded
    Serialize(serde_json::Error),
    /// Stored value could not be parsed
    Corrupt { key: &'static str, value: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "Storage unavailable"),
            StorageError::Io(e) => write!(f, "Storage I/O error: {e}"),
            StorageError::Serialize(e) => write!(f, "Serialization failed: {e}"),
            StorageError::Corrupt { key, value } => {
                write!(f, "Corrupt value for {key:?}: {value:?}")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialize(e)
    }
}

/// String-keyed local store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, like a locked-down browser
    pub fn unavailable() -> Self {
        Self {
            entries: HashMap::new(),
            unavailable: true,
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read and parse a value; `Ok(None)` when the key is missing
pub fn read_parsed<T, S>(store: &S, key: &'static str) -> Result<Option<T>, StorageError>
where
    T: FromStr,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| StorageError::Corrupt { key, value: raw }),
        None => Ok(None),
    }
}

/// Read and parse a value, substituting `default` for anything unusable
pub fn load_or<T, S>(store: &S, key: &'static str, default: T) -> T
where
    T: FromStr,
    S: KeyValueStore + ?Sized,
{
    match read_parsed(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            log::warn!("{e}, using default");
            default
        }
    }
}

/// Write a value, logging instead of failing
pub fn save<T, S>(store: &mut S, key: &'static str, value: T)
where
    T: fmt::Display,
    S: KeyValueStore + ?Sized,
{
    if let Err(e) = store.set(key, &value.to_string()) {
        log::warn!("Could not save {key}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_uses_default() {
        let store = MemoryStore::new();
        assert_eq!(load_or(&store, keys::LIVES, 5u32), 5);
    }

    #[test]
    fn test_corrupt_value_uses_default() {
        let mut store = MemoryStore::new();
        store.set(keys::LIVES, "five").unwrap();
        assert_eq!(load_or(&store, keys::LIVES, 5u32), 5);
        assert!(matches!(
            read_parsed::<u32, _>(&store, keys::LIVES),
            Err(StorageError::Corrupt { key: "lives", .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        save(&mut store, keys::STORY_LEVEL, 12u32);
        assert_eq!(store.get(keys::STORY_LEVEL).unwrap().as_deref(), Some("12"));
        assert_eq!(load_or(&store, keys::STORY_LEVEL, 1u32), 12);
    }

    #[test]
    fn test_unavailable_store_is_swallowed() {
        let mut store = MemoryStore::unavailable();
        save(&mut store, keys::LIVES, 3u32);
        assert_eq!(load_or(&store, keys::LIVES, 5u32), 5);
    }
}
