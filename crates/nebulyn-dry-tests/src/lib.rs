// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Nebulyn crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`store`] - In-memory key-value store fake for testing without filesystem
//! - [`frames`] - Grid snapshot builder

pub mod frames;
pub mod store;

pub use frames::SnapshotBuilder;
pub use store::InMemoryStore;
