// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Text rendering for grids, statistics and listings.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use nebulyn_app_core::remote::GridListing;
use nebulyn_app_core::{EditorPrefs, GridSummary};
use nebulyn_grid::presentation::CellView;
use nebulyn_grid::{ArrowSet, Coord, Direction, GridStats, PortGrid, GRID_SIZE};

const EMPTY_CELL: char = '·';
const SWATCH: char = '■';
const BARE_PORT: char = '●';

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(|h| Cell::new(*h)));
    table
}

fn arrow_list(set: &ArrowSet) -> String {
    set.iter().map(Direction::as_str).collect::<Vec<_>>().join(",")
}

fn cell_char(view: &CellView) -> char {
    match view {
        CellView::ColorOnly { .. } => SWATCH,
        CellView::Full {
            input_arrows,
            output_arrows,
            ..
        } => output_arrows
            .chars()
            .next()
            .or_else(|| input_arrows.chars().next())
            .unwrap_or(BARE_PORT),
    }
}

/// 16×16 character map, top row y=16, with axis labels.
pub fn grid_map(grid: &PortGrid) -> String {
    let mut out = String::new();
    let mut column = 0;
    for coord in Coord::display_order() {
        if column == 0 {
            out.push_str(&format!("{:>2} ", coord.y()));
        }
        let ch = grid
            .port(coord)
            .map_or(EMPTY_CELL, |port| cell_char(&CellView::of(port)));
        out.push(' ');
        out.push(ch);
        column += 1;
        if column == GRID_SIZE {
            out.push('\n');
            column = 0;
        }
    }
    out.push_str("   ");
    for x in 1..=GRID_SIZE {
        out.push(' ');
        out.push(char::from_digit(u32::from(x % 10), 10).unwrap_or(' '));
    }
    out.push('\n');
    out
}

/// One row per port, in store order.
pub fn port_table(grid: &PortGrid) -> Table {
    let mut t = table(&["Coord", "Block", "Color", "Hex", "In", "Out", "Texture", "Tooltip"]);
    for (coord, port) in grid.ports() {
        let view = CellView::of(port);
        t.add_row(vec![
            coord.to_string(),
            port.block.clone(),
            port.color.clone(),
            port.color_hex.clone(),
            arrow_list(&port.input_arrows),
            arrow_list(&port.output_arrows),
            port.texture_path(grid.texture_base_path()),
            view.tooltip().to_owned(),
        ]);
    }
    t
}

/// Totals and frequency tables.
pub fn stats_tables(stats: &GridStats) -> Vec<Table> {
    let avg = |v: Option<f64>| v.map_or_else(|| "n/a".to_owned(), |v| format!("{v:.2}"));
    let mut totals = table(&["Metric", "Value"]);
    totals.add_row(vec!["Total ports".to_owned(), stats.total_ports.to_string()]);
    totals.add_row(vec!["Total inputs".to_owned(), stats.total_inputs.to_string()]);
    totals.add_row(vec!["Total outputs".to_owned(), stats.total_outputs.to_string()]);
    totals.add_row(vec!["Average inputs".to_owned(), avg(stats.average_inputs)]);
    totals.add_row(vec!["Average outputs".to_owned(), avg(stats.average_outputs)]);
    let best = stats.most_complex_port.as_ref().map_or_else(
        || "n/a".to_owned(),
        |p| format!("{} ({} {}, {} arrows)", p.coordinate, p.color, p.block, p.complexity),
    );
    totals.add_row(vec!["Most complex port".to_owned(), best]);

    let mut colors = table(&["Color", "Ports"]);
    for (color, n) in &stats.color_distribution {
        colors.add_row(vec![color.clone(), n.to_string()]);
    }
    let mut blocks = table(&["Block", "Ports"]);
    for (block, n) in &stats.block_distribution {
        blocks.add_row(vec![block.clone(), n.to_string()]);
    }
    vec![totals, colors, blocks]
}

/// Local library listing.
pub fn library_table(rows: &[GridSummary]) -> Table {
    let mut t = table(&["Name", "Saved at", "Ports", "Version"]);
    for row in rows {
        t.add_row(vec![
            row.name.clone(),
            row.saved_at.map_or_else(String::new, |s| s.to_string()),
            row.port_count.to_string(),
            row.version.clone(),
        ]);
    }
    t
}

/// Remote service listing.
pub fn remote_table(rows: &[GridListing]) -> Table {
    let mut t = table(&["Id", "Created", "Updated", "Ports"]);
    for row in rows {
        t.add_row(vec![
            row.id.clone(),
            row.created_at.to_string(),
            row.updated_at.to_string(),
            row.port_count.to_string(),
        ]);
    }
    t
}

/// Preferences as key/value rows.
pub fn prefs_table(prefs: &EditorPrefs) -> Table {
    let mut t = table(&["Pref", "Value"]);
    t.add_row(vec!["cell_size".to_owned(), prefs.cell_size.to_string()]);
    t.add_row(vec![
        "texture_base_path".to_owned(),
        prefs.texture_base_path.clone(),
    ]);
    t.add_row(vec!["grid_name".to_owned(), prefs.grid_name.clone()]);
    t.add_row(vec!["remote_url".to_owned(), prefs.remote_url.clone()]);
    t
}
