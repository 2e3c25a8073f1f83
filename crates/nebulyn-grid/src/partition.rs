// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Colour partitions: one derived snapshot per colour in use.
//!
//! [`generate`] splits a snapshot by port colour and stamps every port
//! `color_only = true`. [`merge`] concatenates partitions back into one
//! snapshot with `color_only = false`. The merged `texture_base_path` is the
//! last non-empty one seen while iterating partitions.

use indexmap::IndexMap;
use time::OffsetDateTime;

use crate::snapshot::{GridSnapshot, PortRecord, CURRENT_VERSION};
use crate::GRID_SIZE;

/// Colour name → snapshot holding only that colour's ports, in the order
/// colours first appear in the source.
pub type ColorPartition = IndexMap<String, GridSnapshot>;

/// Name of the snapshot produced by [`merge`].
pub const MERGED_GRID_NAME: &str = "Nebulyn Merged Grid";

/// `"Nebulyn Red Grid"` for `"red"`.
pub fn partition_name(color: &str) -> String {
    let mut chars = color.chars();
    match chars.next() {
        Some(first) => format!("Nebulyn {}{} Grid", first.to_uppercase(), chars.as_str()),
        None => "Nebulyn  Grid".to_owned(),
    }
}

/// Split `source` by port colour.
pub fn generate(source: &GridSnapshot) -> ColorPartition {
    let mut out = ColorPartition::new();
    for record in &source.ports {
        let color = &record.port.color;
        let part = out.entry(color.clone()).or_insert_with(|| GridSnapshot {
            name: partition_name(color),
            version: source.version.clone(),
            timestamp: OffsetDateTime::now_utc(),
            grid_size: source.grid_size,
            texture_base_path: source.texture_base_path.clone(),
            color: Some(color.clone()),
            ports: Vec::new(),
        });
        let mut record = record.clone();
        record.port.color_only = true;
        part.ports.push(record);
    }
    out
}

/// Concatenate partitions in key order, then per-partition list order.
pub fn merge(partitions: &ColorPartition) -> GridSnapshot {
    let mut texture_base_path = String::new();
    let mut ports: Vec<PortRecord> = Vec::new();
    for part in partitions.values() {
        if !part.texture_base_path.is_empty() {
            texture_base_path.clone_from(&part.texture_base_path);
        }
        ports.extend(part.ports.iter().cloned().map(|mut record| {
            record.port.color_only = false;
            record
        }));
    }
    GridSnapshot {
        name: MERGED_GRID_NAME.to_owned(),
        version: CURRENT_VERSION.to_owned(),
        timestamp: OffsetDateTime::now_utc(),
        grid_size: GRID_SIZE,
        texture_base_path,
        color: None,
        ports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coord, Direction, PortAttrs};

    fn record(x: u32, y: u32, attrs: PortAttrs) -> PortRecord {
        PortRecord {
            coordinate: Coord::new(x, y).unwrap(),
            port: attrs.into_port(),
        }
    }

    fn sample() -> GridSnapshot {
        let mut snap = GridSnapshot::new("main", "tex/");
        snap.ports = vec![
            record(5, 10, PortAttrs::new().color("red").input(Direction::Top)),
            record(8, 12, PortAttrs::new().color("blue").block("iron")),
            record(3, 7, PortAttrs::new().color("red").block("gold")),
        ];
        snap
    }

    #[test]
    fn partition_name_capitalises_first_letter() {
        assert_eq!(partition_name("red"), "Nebulyn Red Grid");
        assert_eq!(partition_name("lightblue"), "Nebulyn Lightblue Grid");
    }

    #[test]
    fn generate_groups_by_first_seen_colour() {
        let parts = generate(&sample());
        let colors: Vec<&str> = parts.keys().map(String::as_str).collect();
        assert_eq!(colors, ["red", "blue"]);

        let red = &parts["red"];
        assert_eq!(red.name, "Nebulyn Red Grid");
        assert_eq!(red.color.as_deref(), Some("red"));
        assert_eq!(red.texture_base_path, "tex/");
        assert_eq!(red.ports.len(), 2);
        assert!(red.ports.iter().all(|r| r.port.color_only));
        assert_eq!(red.ports[1].coordinate.to_string(), "3,7");
    }

    #[test]
    fn generate_of_empty_snapshot_is_empty() {
        assert!(generate(&GridSnapshot::new("empty", "")).is_empty());
    }

    #[test]
    fn merge_clears_colour_only_and_concatenates_in_key_order() {
        let merged = merge(&generate(&sample()));
        assert_eq!(merged.name, MERGED_GRID_NAME);
        let coords: Vec<String> = merged
            .ports
            .iter()
            .map(|r| r.coordinate.to_string())
            .collect();
        assert_eq!(coords, ["5,10", "3,7", "8,12"]);
        assert!(merged.ports.iter().all(|r| !r.port.color_only));
        assert!(merged.same_ports(&sample()));
    }

    #[test]
    fn merge_takes_last_non_empty_texture_base_path() {
        let mut parts = generate(&sample());
        if let Some(red) = parts.get_mut("red") {
            red.texture_base_path = "first/".into();
        }
        if let Some(blue) = parts.get_mut("blue") {
            blue.texture_base_path = String::new();
        }
        assert_eq!(merge(&parts).texture_base_path, "first/");

        if let Some(blue) = parts.get_mut("blue") {
            blue.texture_base_path = "second/".into();
        }
        assert_eq!(merge(&parts).texture_base_path, "second/");
    }
}
