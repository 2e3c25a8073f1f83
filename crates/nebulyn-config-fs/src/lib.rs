// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `KeyValueStore` for Nebulyn tools (uses platform config dir),
//! plus grid file export/import.

use directories::ProjectDirs;
use nebulyn_app_core::transfer;
use nebulyn_app_core::{KeyValueStore, StoreError};
use nebulyn_grid::{AnySnapshot, GridSnapshot};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const EXTENSION: &str = ".json";

/// Store blobs as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    base: PathBuf,
}

impl FsStore {
    /// Create a store rooted at the user config directory (e.g., `~/.config/Nebulyn`).
    pub fn new() -> Result<Self, StoreError> {
        let proj = ProjectDirs::from("dev", "nebulyn", "Nebulyn")
            .ok_or_else(|| StoreError::Unavailable("could not resolve config dir".into()))?;
        Self::at(proj.config_dir())
    }

    /// Create a store rooted at `base`, creating the directory if needed.
    pub fn at(base: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base = base.into();
        fs::create_dir_all(&base)?;
        debug!(base = %base.display(), "fs store opened");
        Ok(Self { base })
    }

    /// Directory holding the files.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let filename = format!("{key}{EXTENSION}");
        self.base.join(filename)
    }
}

impl KeyValueStore for FsStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key);
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(key.into())),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<bool, StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.base)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(key) = name.to_str().and_then(|n| n.strip_suffix(EXTENSION)) else {
                continue;
            };
            if key.starts_with(prefix) {
                keys.push(key.to_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Write `snapshot` to `path` as pretty JSON.
pub fn export_to_file(snapshot: &GridSnapshot, path: &Path) -> Result<(), StoreError> {
    let json = transfer::export(snapshot)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    info!(path = %path.display(), ports = snapshot.port_count(), "grid exported");
    Ok(())
}

/// Read a grid file. The path must end in `.json` and hold a snapshot of
/// either schema.
pub fn import_from_file(path: &Path) -> Result<AnySnapshot, StoreError> {
    transfer::check_json_path(path)?;
    let bytes = fs::read(path)?;
    let snapshot = transfer::import(&bytes)?;
    info!(path = %path.display(), ports = snapshot.port_count(), "grid imported");
    Ok(snapshot)
}
