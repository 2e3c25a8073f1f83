// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Export/import codec for grid files.
//!
//! The filesystem side lives in the adapter crates; this module only decides
//! what a grid file looks like and what counts as a valid one.

use std::path::Path;

use nebulyn_grid::{AnySnapshot, GridSnapshot};

use crate::store::StoreError;

/// File name offered when the caller does not choose one.
pub const DEFAULT_EXPORT_FILENAME: &str = "nebulyn-grid.json";

/// Pretty-printed JSON (two-space indent) for `snapshot`.
pub fn export(snapshot: &GridSnapshot) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Require a `.json` extension (case-insensitive).
pub fn check_json_path(path: &Path) -> Result<(), StoreError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "not a JSON file: {}",
            path.display()
        )))
    }
}

/// Decode file contents as a snapshot of either schema.
///
/// Content that is not JSON, or JSON that is not a snapshot, is a
/// `Validation` error.
pub fn import(bytes: &[u8]) -> Result<AnySnapshot, StoreError> {
    if serde_json::from_slice::<serde::de::IgnoredAny>(bytes).is_err() {
        return Err(StoreError::Validation("invalid JSON file format".into()));
    }
    Ok(AnySnapshot::from_slice(bytes)?)
}
