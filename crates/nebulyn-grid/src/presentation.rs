// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Presentation bootstrap and per-cell view data.
//!
//! Rendering lives outside this crate. What a renderer needs from here is a
//! stylesheet, built once per process by [`initialize_presentation`], and a
//! [`CellView`] describing how a single port should be drawn.

use std::sync::OnceLock;

use tracing::debug;

use crate::{ArrowSet, Port, GRID_SIZE};

/// Identifier the stylesheet is registered under.
pub const STYLESHEET_ID: &str = "nebulyn-grid-styles";
/// Cell edge length in pixels when the caller has no preference.
pub const DEFAULT_CELL_SIZE: u32 = 30;

/// Process-wide grid stylesheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stylesheet {
    /// Always [`STYLESHEET_ID`].
    pub id: &'static str,
    /// Cell size the CSS was generated for.
    pub cell_size: u32,
    /// CSS text.
    pub css: String,
}

static STYLESHEET: OnceLock<Stylesheet> = OnceLock::new();

fn render_css(cell: u32) -> String {
    let n = GRID_SIZE;
    format!(
        "\
.nebulyn-grid {{ display: grid; grid-template-columns: repeat({n}, {cell}px); \
grid-template-rows: repeat({n}, {cell}px); gap: 1px; background-color: #1a1a1a; \
padding: 10px; border-radius: 8px; width: fit-content; }}
.nebulyn-cell {{ width: {cell}px; height: {cell}px; background-color: #4a4a4a; \
border: 1px solid #666; cursor: pointer; position: relative; display: flex; \
align-items: center; justify-content: center; font-size: 10px; }}
.nebulyn-cell:hover {{ background-color: #5a5a5a; border-color: #4caf50; }}
.nebulyn-cell.has-port {{ background-color: #2196f3; }}
.nebulyn-cell.selected {{ background-color: #ff9800; border-color: #ff5722; }}
.nebulyn-arrow {{ position: absolute; font-size: 12px; font-weight: bold; }}
.nebulyn-arrow.input {{ color: #4caf50; top: 2px; left: 2px; }}
.nebulyn-arrow.output {{ color: #f44336; top: 2px; right: 2px; }}
.nebulyn-color-indicator {{ position: absolute; bottom: 2px; left: 2px; width: 8px; \
height: 8px; border-radius: 2px; }}
.nebulyn-color-only {{ width: 100%; height: 100%; border-radius: 2px; }}
"
    )
}

/// Build the stylesheet on first call and return it.
///
/// Idempotent: later calls return the same instance and ignore `cell_size`.
/// Safe to call from any thread.
pub fn initialize_presentation(cell_size: u32) -> &'static Stylesheet {
    STYLESHEET.get_or_init(|| {
        debug!(id = STYLESHEET_ID, cell_size, "presentation initialized");
        Stylesheet {
            id: STYLESHEET_ID,
            cell_size,
            css: render_css(cell_size),
        }
    })
}

/// The stylesheet, if [`initialize_presentation`] has run.
pub fn presentation() -> Option<&'static Stylesheet> {
    STYLESHEET.get()
}

/// How one port is drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellView {
    /// Solid swatch of the port colour.
    ColorOnly {
        /// Fill colour hex.
        fill: String,
        /// Hover text.
        tooltip: String,
    },
    /// Arrow glyphs plus a small colour indicator.
    Full {
        /// Glyphs for incoming arrows, in set order.
        input_arrows: String,
        /// Glyphs for outgoing arrows, in set order.
        output_arrows: String,
        /// Indicator colour hex.
        indicator: String,
        /// Hover text.
        tooltip: String,
    },
}

fn glyphs(set: &ArrowSet) -> String {
    set.iter().map(crate::Direction::glyph).collect()
}

impl CellView {
    /// View for `port`.
    pub fn of(port: &Port) -> Self {
        if port.color_only {
            Self::ColorOnly {
                fill: port.color_hex.clone(),
                tooltip: format!("Color: {}, Block: {}", port.color, port.block),
            }
        } else {
            Self::Full {
                input_arrows: glyphs(&port.input_arrows),
                output_arrows: glyphs(&port.output_arrows),
                indicator: port.color_hex.clone(),
                tooltip: format!("Block: {}, Color: {}", port.block, port.color),
            }
        }
    }

    /// Hover text for either variant.
    pub fn tooltip(&self) -> &str {
        match self {
            Self::ColorOnly { tooltip, .. } | Self::Full { tooltip, .. } => tooltip,
        }
    }
}
