// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The port grid store and its observer registry.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::snapshot::{self, GridSnapshot, UpgradeOptions, CURRENT_VERSION, DEFAULT_GRID_NAME};
use crate::{Coord, Direction, GridError, Port, PortAttrs, GRID_SIZE};

/// Handle returned by the `subscribe*` methods.
pub type SubscriptionId = u64;

/// Kind of port mutation being reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortChange {
    /// A port was written (new or overwritten).
    Add,
    /// A port was removed.
    Remove,
    /// An arrow set of an existing port changed.
    Update,
}

impl PortChange {
    /// `"add"`, `"remove"` or `"update"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Update => "update",
        }
    }
}

/// Notification passed to port subscribers.
#[derive(Clone, Copy, Debug)]
pub struct PortEvent<'a> {
    /// What happened.
    pub change: PortChange,
    /// Where.
    pub coord: Coord,
    /// Port after the change; for `Remove`, the port that was removed.
    pub port: &'a Port,
}

type PortCallback = dyn FnMut(&PortEvent<'_>);
type FocusCallback = dyn FnMut(Coord);

struct Subscribers<F: ?Sized> {
    entries: Vec<(SubscriptionId, Box<F>)>,
}

impl<F: ?Sized> Default for Subscribers<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> Subscribers<F> {
    fn push(&mut self, id: SubscriptionId, callback: Box<F>) {
        self.entries.push((id, callback));
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sid, _)| *sid != id);
        self.entries.len() != before
    }
}

fn notify(subscribers: &mut Subscribers<PortCallback>, event: &PortEvent<'_>) {
    for (_, callback) in &mut subscribers.entries {
        callback(event);
    }
}

#[derive(Clone, Copy)]
enum Side {
    Input,
    Output,
}

/// Fixed 16×16 mapping from [`Coord`] to [`Port`].
///
/// # Invariants
///
/// - At most one port per coordinate; iteration follows insertion order and
///   overwriting a port keeps its position.
/// - Every port mutation goes through `&mut self` and is reported to port
///   subscribers synchronously, in subscription order, after the mutation.
///   Callbacks only see `&PortEvent`, so they cannot mutate the store.
/// - [`PortGrid::clear`] is silent.
///
/// Focus (`hover`/`leave_*`) and selection are cursor state kept alongside
/// the ports; they never touch port data.
pub struct PortGrid {
    name: String,
    texture_base_path: String,
    ports: IndexMap<Coord, Port>,
    current: Coord,
    last: Coord,
    selected: Option<Coord>,
    next_subscription: SubscriptionId,
    port_subscribers: Subscribers<PortCallback>,
    focus_subscribers: Subscribers<FocusCallback>,
}

impl Default for PortGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PortGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortGrid")
            .field("name", &self.name)
            .field("texture_base_path", &self.texture_base_path)
            .field("ports", &self.ports.len())
            .field("current", &self.current)
            .field("selected", &self.selected)
            .field(
                "subscribers",
                &(self.port_subscribers.entries.len() + self.focus_subscribers.entries.len()),
            )
            .finish()
    }
}

impl PortGrid {
    /// Empty grid named [`DEFAULT_GRID_NAME`] with no texture prefix.
    pub fn new() -> Self {
        Self {
            name: DEFAULT_GRID_NAME.to_owned(),
            texture_base_path: String::new(),
            ports: IndexMap::new(),
            current: Coord::ORIGIN,
            last: Coord::ORIGIN,
            selected: None,
            next_subscription: 1,
            port_subscribers: Subscribers::default(),
            focus_subscribers: Subscribers::default(),
        }
    }

    /// Empty grid with the given name and texture prefix.
    pub fn with_metadata(name: impl Into<String>, texture_base_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture_base_path: texture_base_path.into(),
            ..Self::new()
        }
    }

    /// Grid display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the grid.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Prefix for derived texture paths.
    pub fn texture_base_path(&self) -> &str {
        &self.texture_base_path
    }

    /// Change the texture prefix.
    pub fn set_texture_base_path(&mut self, base: impl Into<String>) {
        self.texture_base_path = base.into();
    }

    // ---------------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------------

    fn next_id(&mut self) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        id
    }

    /// Register a port-change callback.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&PortEvent<'_>) + 'static,
    {
        let id = self.next_id();
        self.port_subscribers.push(id, Box::new(callback));
        id
    }

    /// Register a focus-change callback.
    pub fn subscribe_focus<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(Coord) + 'static,
    {
        let id = self.next_id();
        self.focus_subscribers.push(id, Box::new(callback));
        id
    }

    /// Drop a subscription of either kind. Returns `false` for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.port_subscribers.remove(id) || self.focus_subscribers.remove(id)
    }

    // ---------------------------------------------------------------------
    // Port mutation
    // ---------------------------------------------------------------------

    /// Write a port at `(x, y)`, replacing any existing one wholesale.
    pub fn add_port(&mut self, x: u32, y: u32, attrs: PortAttrs) -> Result<&Port, GridError> {
        let coord = Coord::new(x, y)?;
        Ok(self.add_port_at(coord, attrs))
    }

    /// [`add_port`](Self::add_port) for an already-validated coordinate.
    pub fn add_port_at(&mut self, coord: Coord, attrs: PortAttrs) -> &Port {
        let port = attrs.into_port();
        debug!(%coord, block = %port.block, color = %port.color, "port added");
        let (index, _) = self.ports.insert_full(coord, port);
        let port = &self.ports[index];
        notify(
            &mut self.port_subscribers,
            &PortEvent {
                change: PortChange::Add,
                coord,
                port,
            },
        );
        port
    }

    /// Remove the port at `(x, y)`. Returns whether one was there; no
    /// notification fires when it was not.
    pub fn remove_port(&mut self, x: u32, y: u32) -> Result<bool, GridError> {
        let coord = Coord::new(x, y)?;
        Ok(self.remove_port_at(coord).is_some())
    }

    /// Remove and return the port at `coord`.
    pub fn remove_port_at(&mut self, coord: Coord) -> Option<Port> {
        let port = self.ports.shift_remove(&coord)?;
        debug!(%coord, "port removed");
        notify(
            &mut self.port_subscribers,
            &PortEvent {
                change: PortChange::Remove,
                coord,
                port: &port,
            },
        );
        Some(port)
    }

    fn edit_arrows(
        &mut self,
        x: u32,
        y: u32,
        side: Side,
        dir: Direction,
        add: bool,
    ) -> Result<bool, GridError> {
        let coord = Coord::new(x, y)?;
        let Some(port) = self.ports.get_mut(&coord) else {
            return Ok(false);
        };
        let set = match side {
            Side::Input => &mut port.input_arrows,
            Side::Output => &mut port.output_arrows,
        };
        let changed = if add { set.insert(dir) } else { set.remove(dir) };
        if changed {
            debug!(%coord, %dir, add, "arrows updated");
            notify(
                &mut self.port_subscribers,
                &PortEvent {
                    change: PortChange::Update,
                    coord,
                    port: &*port,
                },
            );
        }
        Ok(changed)
    }

    /// Add an incoming arrow. `Ok(false)` if there is no port or the
    /// direction is already present.
    pub fn add_input_arrow(&mut self, x: u32, y: u32, dir: Direction) -> Result<bool, GridError> {
        self.edit_arrows(x, y, Side::Input, dir, true)
    }

    /// Add an outgoing arrow. `Ok(false)` if there is no port or the
    /// direction is already present.
    pub fn add_output_arrow(&mut self, x: u32, y: u32, dir: Direction) -> Result<bool, GridError> {
        self.edit_arrows(x, y, Side::Output, dir, true)
    }

    /// Remove an incoming arrow. `Ok(false)` if there is no port or the
    /// direction is absent.
    pub fn remove_input_arrow(
        &mut self,
        x: u32,
        y: u32,
        dir: Direction,
    ) -> Result<bool, GridError> {
        self.edit_arrows(x, y, Side::Input, dir, false)
    }

    /// Remove an outgoing arrow. `Ok(false)` if there is no port or the
    /// direction is absent.
    pub fn remove_output_arrow(
        &mut self,
        x: u32,
        y: u32,
        dir: Direction,
    ) -> Result<bool, GridError> {
        self.edit_arrows(x, y, Side::Output, dir, false)
    }

    /// Drop every port without notifying subscribers.
    pub fn clear(&mut self) {
        debug!(count = self.ports.len(), "ports cleared");
        self.ports.clear();
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Port at `(x, y)`, if any.
    pub fn get_port_at(&self, x: u32, y: u32) -> Result<Option<&Port>, GridError> {
        Ok(self.port(Coord::new(x, y)?))
    }

    /// Port at `coord`, if any.
    pub fn port(&self, coord: Coord) -> Option<&Port> {
        self.ports.get(&coord)
    }

    /// All ports in insertion order.
    pub fn ports(&self) -> impl Iterator<Item = (Coord, &Port)> + '_ {
        self.ports.iter().map(|(c, p)| (*c, p))
    }

    /// Ports whose colour name is exactly `color`.
    pub fn ports_by_color<'a>(&'a self, color: &'a str) -> impl Iterator<Item = (Coord, &'a Port)> + 'a {
        self.ports().filter(move |(_, p)| p.color == color)
    }

    /// Distinct colour names in use, in first-seen order.
    pub fn available_colors(&self) -> IndexSet<&str> {
        self.ports.values().map(|p| p.color.as_str()).collect()
    }

    /// Number of ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// True when the grid holds no ports.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    // ---------------------------------------------------------------------
    // Snapshots
    // ---------------------------------------------------------------------

    /// Serialize to a v2 snapshot stamped with the current time.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            name: self.name.clone(),
            version: CURRENT_VERSION.to_owned(),
            timestamp: OffsetDateTime::now_utc(),
            grid_size: GRID_SIZE,
            texture_base_path: self.texture_base_path.clone(),
            color: None,
            ports: snapshot::flatten(&self.ports),
        }
    }

    /// Replace all ports with those in `snapshot`, adopting its name and
    /// texture prefix. Clearing is silent; each restored port then fires one
    /// `Add` notification, in list order.
    pub fn restore(&mut self, snapshot: &GridSnapshot) {
        self.clear();
        self.name.clone_from(&snapshot.name);
        self.texture_base_path
            .clone_from(&snapshot.texture_base_path);
        for record in &snapshot.ports {
            if self.ports.contains_key(&record.coordinate) {
                warn!(coord = %record.coordinate, "duplicate coordinate in snapshot; later record wins");
            }
            self.add_port_at(record.coordinate, PortAttrs::from(record.port.clone()));
        }
    }

    /// Parse `json` (either schema) and restore from it. The grid is left
    /// untouched if parsing fails.
    pub fn restore_json(&mut self, json: &str, opts: &UpgradeOptions) -> Result<(), GridError> {
        let snapshot = GridSnapshot::from_json(json, opts)?;
        self.restore(&snapshot);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Focus and selection
    // ---------------------------------------------------------------------

    fn set_focus(&mut self, coord: Coord) {
        self.current = coord;
        for (_, callback) in &mut self.focus_subscribers.entries {
            callback(coord);
        }
    }

    /// Move focus to `(x, y)` and notify focus subscribers.
    pub fn hover(&mut self, x: u32, y: u32) -> Result<(), GridError> {
        let coord = Coord::new(x, y)?;
        self.set_focus(coord);
        Ok(())
    }

    /// Remember the current focus as the last one.
    pub fn leave_cell(&mut self) {
        self.last = self.current;
    }

    /// Restore focus to the last remembered cell and notify.
    pub fn leave_grid(&mut self) {
        self.set_focus(self.last);
    }

    /// Cell that currently has focus.
    pub fn current_coordinate(&self) -> Coord {
        self.current
    }

    /// Last remembered focus.
    pub fn last_coordinate(&self) -> Coord {
        self.last
    }

    /// Mark `(x, y)` as the selected cell.
    pub fn select(&mut self, x: u32, y: u32) -> Result<(), GridError> {
        self.selected = Some(Coord::new(x, y)?);
        Ok(())
    }

    /// Selected cell, if any.
    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}
