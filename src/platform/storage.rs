//! Key-value storage
//!
//! Scores and preferences are small strings under fixed keys. The browser
//! build uses LocalStorage; native builds and tests use [`MemoryStore`].

use std::collections::HashMap;
use std::fmt;

/// Storage write failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage backend (private mode, sandboxed iframe, ...)
    Unavailable,
    /// The backend rejected the write
    Quota(String),
    /// The value could not be encoded
    Serialize(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "storage unavailable"),
            StorageError::Quota(msg) => write!(f, "storage write rejected: {}", msg),
            StorageError::Serialize(msg) => write!(f, "could not encode value: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialize(e.to_string())
    }
}

/// String key-value store
pub trait KeyValueStore {
    /// Read a value; missing keys and read failures are `None`
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, scores will not persist");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Quota(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::default();
        assert_eq!(store.get("k"), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v2"));
    }

    #[test]
    fn test_storage_error_display() {
        assert_eq!(StorageError::Unavailable.to_string(), "storage unavailable");
        assert!(StorageError::Quota("full".into()).to_string().contains("full"));
        assert!(
            StorageError::Serialize("bad float".into())
                .to_string()
                .starts_with("could not encode value")
        );
    }

    #[test]
    fn test_json_errors_convert_to_serialize() {
        let err = serde_json::from_str::<u64>("nope").unwrap_err();
        assert!(matches!(StorageError::from(err), StorageError::Serialize(_)));
    }
}
