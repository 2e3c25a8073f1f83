// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Storage port shared by every persistence adapter.

use std::sync::Arc;

use nebulyn_grid::GridError;
use thiserror::Error;

/// Storage port for raw blobs keyed by logical name.
///
/// Keys are flat strings; adapters map them to whatever their backend uses
/// (file names, KV keys).
pub trait KeyValueStore {
    /// Load a raw blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError>;
    /// Persist a raw blob, replacing any previous value.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError>;
    /// Remove a blob. Returns whether it existed.
    fn delete_raw(&self, key: &str) -> Result<bool, StoreError>;
    /// Keys starting with `prefix`, sorted.
    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key not present in store.
    #[error("not found: {0}")]
    NotFound(String),
    /// Backend not configured or not reachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Input rejected before it reached the backend.
    #[error("validation error: {0}")]
    Validation(String),
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

impl From<GridError> for StoreError {
    fn from(err: GridError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).load_raw(key)
    }
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).save_raw(key, data)
    }
    fn delete_raw(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete_raw(key)
    }
    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        (**self).keys(prefix)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).load_raw(key)
    }
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).save_raw(key, data)
    }
    fn delete_raw(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete_raw(key)
    }
    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        (**self).keys(prefix)
    }
}
