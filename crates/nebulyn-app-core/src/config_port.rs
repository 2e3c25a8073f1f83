// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config port shared across Nebulyn tools (CLI, service).

use tracing::warn;

use crate::config::ConfigService;
use crate::prefs::{EditorPrefs, PREFS_KEY};
use crate::store::KeyValueStore;

/// Config-facing port for loading/saving editor preferences.
pub trait ConfigPort {
    /// Load editor preferences (returns None if missing or unreadable).
    fn load_prefs(&self) -> Option<EditorPrefs>;
    /// Persist editor preferences (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &EditorPrefs);
}

impl<S: KeyValueStore> ConfigPort for ConfigService<S> {
    fn load_prefs(&self) -> Option<EditorPrefs> {
        match self.load(PREFS_KEY) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(%err, "could not load prefs; using defaults");
                None
            }
        }
    }

    fn save_prefs(&self, prefs: &EditorPrefs) {
        if let Err(err) = self.save(PREFS_KEY, prefs) {
            warn!(%err, "could not save prefs");
        }
    }
}

