// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port attributes and the builder used to create them.

use serde::{Deserialize, Serialize};

use crate::palette::{self, DEFAULT_COLOR};
use crate::{ArrowSet, Direction};

/// Block identifier used when a port does not specify one.
pub const DEFAULT_BLOCK: &str = "stone";

fn default_block() -> String {
    DEFAULT_BLOCK.to_owned()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_owned()
}

/// Attributes stored at one grid cell.
///
/// `color_hex` is derived from `color` by the store; it is carried here so
/// snapshots are self-describing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    /// Free-text block identifier.
    #[serde(default = "default_block")]
    pub block: String,
    /// Free-text colour name.
    #[serde(default = "default_color")]
    pub color: String,
    /// Palette hex for `color`.
    #[serde(default)]
    pub color_hex: String,
    /// Directions of incoming arrows.
    #[serde(default)]
    pub input_arrows: ArrowSet,
    /// Directions of outgoing arrows.
    #[serde(default)]
    pub output_arrows: ArrowSet,
    /// Render as a flat colour swatch instead of arrows.
    #[serde(default)]
    pub color_only: bool,
    /// Texture path override.
    #[serde(default)]
    pub texture: Option<String>,
}

impl Port {
    /// Texture path: the override if set, else `{base}{block}.png`.
    pub fn texture_path(&self, base: &str) -> String {
        match &self.texture {
            Some(path) => path.clone(),
            None => format!("{base}{}.png", self.block),
        }
    }

    /// Number of arrows on both sides.
    pub fn complexity(&self) -> usize {
        self.input_arrows.len() + self.output_arrows.len()
    }

    /// Equality that ignores arrow insertion order.
    pub fn same_attributes(&self, other: &Self) -> bool {
        self.block == other.block
            && self.color == other.color
            && self.color_hex == other.color_hex
            && self.color_only == other.color_only
            && self.texture == other.texture
            && self.input_arrows.same_directions(&other.input_arrows)
            && self.output_arrows.same_directions(&other.output_arrows)
    }
}

/// Caller-supplied attributes for [`PortGrid::add_port`](crate::PortGrid::add_port).
///
/// Unset or empty `block`/`color` fall back to `"stone"`/`"white"`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortAttrs {
    /// Block identifier.
    pub block: Option<String>,
    /// Colour name.
    pub color: Option<String>,
    /// Incoming arrows.
    pub input_arrows: ArrowSet,
    /// Outgoing arrows.
    pub output_arrows: ArrowSet,
    /// Colour-only display flag.
    pub color_only: bool,
    /// Texture path override.
    pub texture: Option<String>,
}

impl PortAttrs {
    /// Attributes with every field defaulted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block identifier.
    pub fn block(mut self, block: impl Into<String>) -> Self {
        self.block = Some(block.into());
        self
    }

    /// Set the colour name.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Add an incoming arrow.
    pub fn input(mut self, dir: Direction) -> Self {
        self.input_arrows.insert(dir);
        self
    }

    /// Add an outgoing arrow.
    pub fn output(mut self, dir: Direction) -> Self {
        self.output_arrows.insert(dir);
        self
    }

    /// Set the colour-only flag.
    pub fn color_only(mut self, on: bool) -> Self {
        self.color_only = on;
        self
    }

    /// Set the texture override.
    pub fn texture(mut self, path: impl Into<String>) -> Self {
        self.texture = Some(path.into());
        self
    }

    pub(crate) fn into_port(self) -> Port {
        let block = self
            .block
            .filter(|b| !b.is_empty())
            .unwrap_or_else(default_block);
        let color = self
            .color
            .filter(|c| !c.is_empty())
            .unwrap_or_else(default_color);
        Port {
            color_hex: palette::resolve(&color).to_owned(),
            block,
            color,
            input_arrows: self.input_arrows,
            output_arrows: self.output_arrows,
            color_only: self.color_only,
            texture: self.texture,
        }
    }
}

impl From<Port> for PortAttrs {
    fn from(port: Port) -> Self {
        Self {
            block: Some(port.block),
            color: Some(port.color),
            input_arrows: port.input_arrows,
            output_arrows: port.output_arrows,
            color_only: port.color_only,
            texture: port.texture,
        }
    }
}
