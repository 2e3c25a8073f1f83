// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory key-value store fake for testing without filesystem I/O.

use nebulyn_app_core::{KeyValueStore, StoreError};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory implementation of [`KeyValueStore`] for testing.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and inspect another. Call counts are tracked for verification.
///
/// # Example
///
/// ```
/// use nebulyn_dry_tests::InMemoryStore;
/// use nebulyn_app_core::{ConfigService, KeyValueStore};
///
/// let store = InMemoryStore::new();
/// let service = ConfigService::new(store.clone());
///
/// service.save("prefs", &serde_json::json!({"cell_size": 24})).unwrap();
/// assert_eq!(store.load_count(), 0);
/// assert_eq!(store.save_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<InMemoryStoreInner>>,
}

#[derive(Default)]
struct InMemoryStoreInner {
    data: BTreeMap<String, Vec<u8>>,
    load_count: usize,
    save_count: usize,
    delete_count: usize,
    fail_on_load: bool,
    fail_on_save: bool,
    unavailable: bool,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given key-value pairs.
    pub fn with_data(data: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryStoreInner {
                data: data.into_iter().collect(),
                ..Default::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, InMemoryStoreInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Configure the store to fail on load operations.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_on_load = fail;
    }

    /// Configure the store to fail on save operations.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_on_save = fail;
    }

    /// Make every operation report [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Number of `load_raw` calls attempted, including failed ones.
    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    /// Number of `save_raw` calls attempted, including failed ones.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// Number of `delete_raw` calls attempted.
    pub fn delete_count(&self) -> usize {
        self.lock().delete_count
    }

    /// Check if a key exists in the store.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }

    /// Raw bytes stored under `key`, bypassing counters and failure flags.
    pub fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().data.get(key).cloned()
    }

    /// Reset the store to its initial empty state: data, counters and flags.
    pub fn reset(&self) {
        *self.lock() = InMemoryStoreInner::default();
    }
}

fn unavailable() -> StoreError {
    StoreError::Unavailable("simulated outage".into())
}

impl KeyValueStore for InMemoryStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let mut inner = self.lock();
        inner.load_count += 1;

        if inner.unavailable {
            return Err(unavailable());
        }
        if inner.fail_on_load {
            return Err(StoreError::Other("simulated load failure".into()));
        }

        inner
            .data
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.save_count += 1;

        if inner.unavailable {
            return Err(unavailable());
        }
        if inner.fail_on_save {
            return Err(StoreError::Other("simulated save failure".into()));
        }

        inner.data.insert(key.to_owned(), data.to_vec());
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        inner.delete_count += 1;
        if inner.unavailable {
            return Err(unavailable());
        }
        Ok(inner.data.remove(key).is_some())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let inner = self.lock();
        if inner.unavailable {
            return Err(unavailable());
        }
        Ok(inner
            .data
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_save_load() {
        let store = InMemoryStore::new();
        store.save_raw("test", b"hello").unwrap();
        let loaded = store.load_raw("test").unwrap();
        assert_eq!(loaded, b"hello");
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn load_missing_key_returns_not_found() {
        let store = InMemoryStore::new();
        let result = store.load_raw("missing");
        assert!(matches!(result, Err(StoreError::NotFound(k)) if k == "missing"));
    }

    #[test]
    fn fail_flags_return_errors_and_still_count() {
        let store = InMemoryStore::new();
        store.save_raw("test", b"data").unwrap();
        store.set_fail_on_load(true);
        store.set_fail_on_save(true);
        assert!(matches!(store.load_raw("test"), Err(StoreError::Other(_))));
        assert!(matches!(
            store.save_raw("other", b"x"),
            Err(StoreError::Other(_))
        ));
        assert!(!store.contains_key("other"));
        assert_eq!(store.load_count(), 1);
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn unavailable_fails_every_operation() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(store.load_raw("k"), Err(StoreError::Unavailable(_))));
        assert!(matches!(
            store.save_raw("k", b"v"),
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(store.delete_raw("k"), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.keys(""), Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn keys_filter_by_prefix_in_sorted_order() {
        let store = InMemoryStore::with_data([
            ("grid-b".to_owned(), b"2".to_vec()),
            ("prefs".to_owned(), b"{}".to_vec()),
            ("grid-a".to_owned(), b"1".to_vec()),
        ]);
        assert_eq!(store.keys("grid-").unwrap(), ["grid-a", "grid-b"]);
        assert_eq!(store.keys("").unwrap().len(), 3);
    }

    #[test]
    fn delete_reports_presence() {
        let store = InMemoryStore::new();
        store.save_raw("k", b"v").unwrap();
        assert!(store.delete_raw("k").unwrap());
        assert!(!store.delete_raw("k").unwrap());
        assert_eq!(store.delete_count(), 2);
    }

    #[test]
    fn clone_shares_state_and_reset() {
        let store1 = InMemoryStore::new();
        let store2 = store1.clone();

        store1.save_raw("shared_key", b"shared_value").unwrap();
        assert_eq!(store2.load_raw("shared_key").unwrap(), b"shared_value");
        assert_eq!(store2.save_count(), 1);

        store1.set_fail_on_save(true);
        store2.reset();
        assert!(!store1.contains_key("shared_key"));
        assert_eq!(store1.save_count(), 0);
        store1.save_raw("new_key", b"new_value").unwrap();
        assert_eq!(store2.peek("new_key").as_deref(), Some(&b"new_value"[..]));
    }
}
