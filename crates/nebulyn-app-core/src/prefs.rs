// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Editor preferences shared by Nebulyn tools.

use nebulyn_grid::presentation::DEFAULT_CELL_SIZE;
use nebulyn_grid::snapshot::DEFAULT_GRID_NAME;
use serde::{Deserialize, Serialize};

/// Key the preferences are stored under.
pub const PREFS_KEY: &str = "prefs";
/// Texture prefix used until the user picks one.
pub const DEFAULT_TEXTURE_BASE_PATH: &str = "textures/";
/// Grid service endpoint used until the user picks one.
pub const DEFAULT_REMOTE_URL: &str = "http://127.0.0.1:8788/api";

/// Saved preferences for the grid editor.
///
/// Missing fields in a stored document take their defaults, so older prefs
/// files keep loading as fields are added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPrefs {
    /// Cell edge length in pixels.
    pub cell_size: u32,
    /// Prefix for derived texture paths.
    pub texture_base_path: String,
    /// Name given to new grids.
    pub grid_name: String,
    /// Base URL of the remote grid service.
    pub remote_url: String,
}

impl Default for EditorPrefs {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            texture_base_path: DEFAULT_TEXTURE_BASE_PATH.to_owned(),
            grid_name: DEFAULT_GRID_NAME.to_owned(),
            remote_url: DEFAULT_REMOTE_URL.to_owned(),
        }
    }
}
