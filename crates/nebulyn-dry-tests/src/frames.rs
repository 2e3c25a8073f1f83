// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! GridSnapshot builder for tests.

use nebulyn_grid::snapshot::DEFAULT_GRID_NAME;
use nebulyn_grid::{GridSnapshot, PortAttrs, PortGrid};
use time::{Duration, OffsetDateTime};

/// Timestamp stamped on built snapshots: 2024-01-15T10:30:00Z.
pub const FIXTURE_TIMESTAMP_SECS: i64 = 1_705_314_600;

/// Builder for creating [`GridSnapshot`] instances in tests.
///
/// Ports go through a real [`PortGrid`], so defaults and palette resolution
/// match what the store produces.
///
/// # Example
///
/// ```
/// use nebulyn_dry_tests::SnapshotBuilder;
///
/// let snap = SnapshotBuilder::new()
///     .name("main")
///     .port(5, 10, |p| p.color("red"))
///     .build();
///
/// assert_eq!(snap.name, "main");
/// assert_eq!(snap.ports[0].port.color_hex, "#B02E26");
/// ```
pub struct SnapshotBuilder {
    grid: PortGrid,
    timestamp: OffsetDateTime,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self {
            grid: PortGrid::with_metadata(DEFAULT_GRID_NAME, ""),
            timestamp: OffsetDateTime::UNIX_EPOCH + Duration::seconds(FIXTURE_TIMESTAMP_SECS),
        }
    }
}

impl SnapshotBuilder {
    /// Create a new builder (default name, no texture prefix, no ports).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.grid.set_name(name);
        self
    }

    /// Set the texture prefix.
    pub fn texture_base_path(mut self, base: impl Into<String>) -> Self {
        self.grid.set_texture_base_path(base);
        self
    }

    /// Override the snapshot timestamp.
    pub fn timestamp(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Add a port at `(x, y)` with attributes shaped by `attrs`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    #[allow(clippy::expect_used)]
    pub fn port(mut self, x: u32, y: u32, attrs: impl FnOnce(PortAttrs) -> PortAttrs) -> Self {
        self.grid
            .add_port(x, y, attrs(PortAttrs::new()))
            .expect("fixture coordinate inside the grid");
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> GridSnapshot {
        let mut snap = self.grid.snapshot();
        snap.timestamp = self.timestamp;
        snap
    }

    /// Build and return the populated store instead of a snapshot.
    pub fn into_grid(self) -> PortGrid {
        self.grid
    }
}
