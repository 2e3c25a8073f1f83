// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Keyed grid library: named snapshots kept in a [`KeyValueStore`].
//!
//! Each grid is stored under `grid-<name>` as its snapshot JSON with an extra
//! top-level `savedAt` field. Entries written by older tools in the v1 schema
//! are upgraded on load.

use nebulyn_grid::snapshot::LEGACY_VERSION;
use nebulyn_grid::{AnySnapshot, GridSnapshot, UpgradeOptions};
use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::store::{KeyValueStore, StoreError};

/// Prefix of every library key.
pub const GRID_KEY_PREFIX: &str = "grid-";
const SAVED_AT: &str = "savedAt";
const MAX_NAME_LEN: usize = 128;

/// One row of [`GridLibrary::list`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSummary {
    /// Library name.
    pub name: String,
    /// When it was last saved; absent for entries written without one.
    #[serde(with = "time::serde::rfc3339::option")]
    pub saved_at: Option<OffsetDateTime>,
    /// Number of port records.
    pub port_count: usize,
    /// Schema version of the stored document.
    pub version: String,
}

struct Entry {
    saved_at: Option<OffsetDateTime>,
    snapshot: AnySnapshot,
}

/// Reject names that cannot be used as a storage key on every backend.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let problem = if name.trim().is_empty() {
        Some("name is empty")
    } else if name.len() > MAX_NAME_LEN {
        Some("name is longer than 128 bytes")
    } else if name.starts_with('.') {
        Some("name starts with '.'")
    } else if name
        .chars()
        .any(|c| c.is_control() || matches!(c, '/' | '\\' | ':'))
    {
        Some("name contains a path separator or control character")
    } else {
        None
    };
    match problem {
        Some(msg) => Err(StoreError::Validation(format!("{msg}: {name:?}"))),
        None => Ok(()),
    }
}

fn key_for(name: &str) -> Result<String, StoreError> {
    validate_name(name)?;
    Ok(format!("{GRID_KEY_PREFIX}{name}"))
}

/// Named snapshot storage over any [`KeyValueStore`].
pub struct GridLibrary<S> {
    store: S,
    upgrade: UpgradeOptions,
}

impl<S> GridLibrary<S> {
    /// Library over `store`, upgrading v1 entries with default options.
    pub fn new(store: S) -> Self {
        Self {
            store,
            upgrade: UpgradeOptions::default(),
        }
    }

    /// Use `upgrade` when loading v1 entries.
    pub fn with_upgrade_options(mut self, upgrade: UpgradeOptions) -> Self {
        self.upgrade = upgrade;
        self
    }

    /// Borrow the inner store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> GridLibrary<S> {
    /// Save `snapshot` as `name`, replacing any previous entry. Returns the
    /// `savedAt` stamp written.
    pub fn save(&self, name: &str, snapshot: &GridSnapshot) -> Result<OffsetDateTime, StoreError> {
        let key = key_for(name)?;
        let saved_at = OffsetDateTime::now_utc();
        let stamp = saved_at
            .format(&Rfc3339)
            .map_err(|e| StoreError::Other(e.to_string()))?;

        let mut doc = serde_json::to_value(snapshot)?;
        if let Value::Object(map) = &mut doc {
            map.insert(SAVED_AT.to_owned(), Value::String(stamp));
        }
        self.store.save_raw(&key, &serde_json::to_vec_pretty(&doc)?)?;
        info!(name, ports = snapshot.port_count(), "grid saved");
        Ok(saved_at)
    }

    /// Load `name` as a v2 snapshot. `Ok(None)` if there is no such entry.
    pub fn load(&self, name: &str) -> Result<Option<GridSnapshot>, StoreError> {
        let key = key_for(name)?;
        Ok(self
            .read(&key)?
            .map(|entry| entry.snapshot.into_current(&self.upgrade)))
    }

    /// Summaries of every entry, sorted by name. Unreadable entries are
    /// skipped with a warning.
    pub fn list(&self) -> Result<Vec<GridSummary>, StoreError> {
        let mut out = Vec::new();
        for key in self.store.keys(GRID_KEY_PREFIX)? {
            let Some(name) = key.strip_prefix(GRID_KEY_PREFIX) else {
                continue;
            };
            match self.read(&key) {
                Ok(Some(entry)) => out.push(GridSummary {
                    name: name.to_owned(),
                    saved_at: entry.saved_at,
                    port_count: entry.snapshot.port_count(),
                    version: match &entry.snapshot {
                        AnySnapshot::Legacy(s) => s
                            .version
                            .clone()
                            .unwrap_or_else(|| LEGACY_VERSION.to_owned()),
                        AnySnapshot::Current(s) => s.version.clone(),
                    },
                }),
                Ok(None) => {}
                Err(err) => warn!(%key, %err, "skipping unreadable library entry"),
            }
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    /// Remove `name`. Returns whether it existed.
    pub fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let existed = self.store.delete_raw(&key_for(name)?)?;
        info!(name, existed, "grid deleted");
        Ok(existed)
    }

    fn read(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        let mut doc: Value = serde_json::from_slice(&bytes)?;
        let saved_at = doc
            .as_object_mut()
            .and_then(|map| map.remove(SAVED_AT))
            .and_then(|v| v.as_str().and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok()));
        let snapshot = AnySnapshot::from_value(doc)?;
        Ok(Some(Entry { saved_at, snapshot }))
    }
}
