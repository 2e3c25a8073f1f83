// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed JSON values (editor prefs and the like) kept in a [`KeyValueStore`].

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::store::{KeyValueStore, StoreError};

/// Reads and writes JSON-encoded settings by key.
///
/// An absent key and a zero-length value both read as `None`; anything else
/// that fails to decode is [`StoreError::Serde`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wrap `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> ConfigService<S> {
    /// Decode the value under `key`, or `None` when nothing is stored there.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound(missing)) => {
                debug!(key = %missing, "no stored value");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        if bytes.is_empty() {
            debug!(key, "stored value is empty");
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Encode `value` as pretty JSON under `key`.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)?;
        debug!(key, bytes = data.len(), "value stored");
        Ok(())
    }

    /// Drop the value under `key`; `false` if there was none.
    pub fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let removed = self.store.delete_raw(key)?;
        debug!(key, removed, "value removed");
        Ok(removed)
    }
}
