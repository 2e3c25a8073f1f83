// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! ConfigService and ConfigPort against the in-memory store fake.

use nebulyn_app_core::prefs::PREFS_KEY;
use nebulyn_app_core::{ConfigPort, ConfigService, EditorPrefs, KeyValueStore, StoreError};
use nebulyn_dry_tests::InMemoryStore;

#[test]
fn missing_and_empty_values_load_as_none() {
    let store = InMemoryStore::new();
    store.save_raw("empty", b"").unwrap();
    let service = ConfigService::new(store);
    assert!(service.load::<u32>("absent").unwrap().is_none());
    assert!(service.load::<u32>("empty").unwrap().is_none());
    assert_eq!(service.store().load_count(), 2);
}

#[test]
fn unavailable_store_is_not_mistaken_for_a_missing_key() {
    let store = InMemoryStore::new();
    store.set_unavailable(true);
    let service = ConfigService::new(store);
    assert!(matches!(
        service.load::<u32>("absent"),
        Err(StoreError::Unavailable(_))
    ));
}

#[test]
fn remove_reports_whether_a_value_was_dropped() {
    let service = ConfigService::new(InMemoryStore::new());
    service.save("answer", &42_u32).unwrap();
    assert!(service.remove("answer").unwrap());
    assert!(!service.remove("answer").unwrap());
    assert!(service.load::<u32>("answer").unwrap().is_none());
    assert_eq!(service.store().delete_count(), 2);
}

#[test]
fn save_then_load_round_trips() {
    let service = ConfigService::new(InMemoryStore::new());
    service.save("answer", &42_u32).unwrap();
    assert_eq!(service.load::<u32>("answer").unwrap(), Some(42));
    assert_eq!(service.store().save_count(), 1);
}

#[test]
fn backend_failures_propagate() {
    let store = InMemoryStore::new();
    store.set_fail_on_load(true);
    let service = ConfigService::new(store);
    assert!(matches!(
        service.load::<u32>("answer"),
        Err(StoreError::Other(_))
    ));
}

#[test]
fn corrupt_value_is_a_serde_error() {
    let store = InMemoryStore::new();
    store.save_raw("answer", b"{not json").unwrap();
    let service = ConfigService::new(store);
    assert!(matches!(
        service.load::<u32>("answer"),
        Err(StoreError::Serde(_))
    ));
}

#[test]
fn prefs_round_trip_under_prefs_key() {
    let store = InMemoryStore::new();
    let service = ConfigService::new(store.clone());
    assert!(service.load_prefs().is_none());

    let prefs = EditorPrefs {
        cell_size: 40,
        ..EditorPrefs::default()
    };
    service.save_prefs(&prefs);
    assert!(store.contains_key(PREFS_KEY));
    assert_eq!(service.load_prefs(), Some(prefs));
}

#[test]
fn prefs_failures_degrade_to_none() {
    let store = InMemoryStore::new();
    let service = ConfigService::new(store.clone());
    store.set_fail_on_save(true);
    service.save_prefs(&EditorPrefs::default());
    assert!(!store.contains_key(PREFS_KEY));
    store.set_fail_on_save(false);
    service.save_prefs(&EditorPrefs::default());
    store.set_fail_on_load(true);
    assert!(service.load_prefs().is_none());
}
