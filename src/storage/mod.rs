//! Persistent key-value storage used by components to survive page reloads
//!
//! Values are stored as JSON text. Every key is namespaced with
//! [`KEY_PREFIX`] so SDK entries never collide with application data living
//! in the same store.

mod sled_store;

use crate::error::StorageError;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tracing::trace;

pub use sled_store::SledStorage;

/// Namespace prepended to every SDK storage key
pub const KEY_PREFIX: &str = "tapps/";

/// Raw string storage backend
pub trait Storage: Send + Sync {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write the raw value under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`, if any
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Full backend key for an SDK key
pub fn namespaced(key: &str) -> String {
    format!("{}{}", KEY_PREFIX, key)
}

/// Read and decode an SDK value
pub fn get_value<T>(storage: &dyn Storage, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
{
    let Some(raw) = storage.get(&namespaced(key))? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Serialization {
            key: key.to_string(),
            source,
        })
}

/// Encode and write an SDK value
pub fn set_value<T>(storage: &dyn Storage, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
        key: key.to_string(),
        source,
    })?;

    trace!(key, bytes = raw.len(), "Writing storage value");
    storage.set(&namespaced(key), &raw)
}

/// Volatile storage, the equivalent of a per-tab session store
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.data.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.data.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        is_visible: bool,
        text: String,
    }

    #[test]
    fn test_typed_round_trip_uses_prefix() {
        let storage = MemoryStorage::new();
        let value = Sample {
            is_visible: true,
            text: "Buy".to_string(),
        };

        set_value(&storage, "mainButton", &value).unwrap();

        let raw = storage.get("tapps/mainButton").unwrap().unwrap();
        assert_eq!(raw, r#"{"isVisible":true,"text":"Buy"}"#);

        let loaded: Option<Sample> = get_value(&storage, "mainButton").unwrap();
        assert_eq!(loaded, Some(value));
    }

    #[test]
    fn test_missing_key_is_none() {
        let storage = MemoryStorage::new();
        let loaded: Option<Sample> = get_value(&storage, "mainButton").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_corrupt_value_is_error() {
        let storage = MemoryStorage::new();
        storage.set("tapps/mainButton", "{not json").unwrap();

        let err = get_value::<Sample>(&storage, "mainButton").unwrap_err();
        assert!(matches!(err, StorageError::Serialization { ref key, .. } if key == "mainButton"));
    }

    #[test]
    fn test_remove() {
        let storage = MemoryStorage::new();
        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();
        assert!(storage.is_empty());
    }
}
