// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for Nebulyn tools: storage port, prefs,
//! grid library, file transfer and the remote service wire types.
//! Keeps CLI/service adapters thin and backend-agnostic.

pub mod config;
pub mod config_port;
pub mod library;
pub mod prefs;
pub mod remote;
pub mod store;
pub mod transfer;

pub use config::ConfigService;
pub use config_port::ConfigPort;
pub use library::{GridLibrary, GridSummary};
pub use prefs::EditorPrefs;
pub use store::{KeyValueStore, StoreError};
