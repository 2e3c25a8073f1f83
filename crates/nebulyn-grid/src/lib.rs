// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port grid model for Nebulyn.
//!
//! A [`PortGrid`] maps each cell of a fixed 16×16 grid to at most one [`Port`]
//! (block, colour, input/output arrow sets). Everything else in this crate is
//! derived from that mapping:
//!
//! - [`snapshot`]: the persisted document (schema v1 and v2) plus the
//!   flatten/unflatten adapters and the v1→v2 upgrade path.
//! - [`partition`]: per-colour split of a snapshot and the inverse merge.
//! - [`stats`]: aggregate counts over a snapshot.
//! - [`presentation`]: one-time stylesheet bootstrap and per-cell view data.
//!
//! The store is single-threaded and synchronous. Observers registered with
//! [`PortGrid::subscribe`] are called in registration order, after the mutation,
//! with a read-only view of the change.

use thiserror::Error;

mod coord;
mod direction;
pub mod palette;
pub mod partition;
mod port;
pub mod presentation;
pub mod snapshot;
pub mod stats;
mod store;

pub use coord::{Coord, GRID_SIZE};
pub use direction::{ArrowSet, Direction};
pub use partition::ColorPartition;
pub use port::{Port, PortAttrs, DEFAULT_BLOCK};
pub use snapshot::{
    AnySnapshot, GridSnapshot, LegacyPortRecord, LegacySnapshot, PortRecord, SchemaVersion,
    UpgradeOptions,
};
pub use stats::GridStats;
pub use store::{PortChange, PortEvent, PortGrid, SubscriptionId};

/// Errors raised by the grid model.
///
/// Every variant is a validation failure: the caller handed the model input it
/// refuses to coerce.
#[derive(Debug, Error)]
pub enum GridError {
    /// Coordinate component outside `1..=16`.
    #[error("coordinate {x},{y} is outside the 16x16 grid")]
    CoordinateOutOfRange {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
    },
    /// Coordinate string that is not `"<x>,<y>"` with decimal components.
    #[error("malformed coordinate: {0:?}")]
    MalformedCoordinate(String),
    /// Arrow label outside the 8-direction set.
    #[error("unknown arrow direction: {0:?}")]
    UnknownDirection(String),
    /// Snapshot `version` this crate cannot read.
    #[error("unsupported snapshot version: {0:?}")]
    UnsupportedVersion(String),
    /// Document is not valid JSON or does not match the snapshot schema.
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),
}
