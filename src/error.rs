//! Error types for the SDK core
//!
//! Collaborator failures (bridge, storage) keep their own enums so callers can
//! match on the source; `SdkError` is what public component methods return.

use thiserror::Error;

/// Failures reported by a [`Bridge`](crate::bridge::Bridge) implementation
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The transport to the host is gone (window closed, channel dropped)
    #[error("bridge transport is closed")]
    Closed,

    /// The host refused the method call
    #[error("host rejected method '{method}': {reason}")]
    Rejected { method: String, reason: String },

    /// Payload could not be encoded for the wire
    #[error("failed to encode payload for '{method}': {source}")]
    Payload {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures reported by a [`Storage`](crate::storage::Storage) implementation
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store failed to read or write
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored value could not be encoded or decoded
    #[error("failed to (de)serialize value for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// Errors returned by SDK components
#[derive(Debug, Error)]
pub enum SdkError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T, E = SdkError> = std::result::Result<T, E>;
