//! Sled-backed storage for state that must survive process restarts

use super::Storage;
use crate::error::StorageError;
use std::path::Path;
use tracing::{debug, info};

/// [`Storage`] backed by an embedded sled database
///
/// Writes are flushed on every `set` so a crashed playground session can be
/// restored as a page reload.
#[derive(Clone)]
pub struct SledStorage {
    db: sled::Db,
}

impl SledStorage {
    /// Open (or create) a database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let db = sled::open(path)?;
        info!("Opened sled storage at {}", path.display());
        Ok(Self { db })
    }

    /// Wrap an already opened database
    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }
}

impl Storage for SledStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let Some(bytes) = self.db.get(key.as_bytes())? else {
            return Ok(None);
        };

        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|e| StorageError::Backend(format!("value for '{}' is not UTF-8: {}", key, e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        self.db.flush()?;
        debug!("Persisted {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.db.remove(key.as_bytes())?;
        Ok(())
    }
}
