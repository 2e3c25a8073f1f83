// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Snapshot documents: the persisted/exchanged form of a grid.
//!
//! Two schema versions exist on the wire:
//!
//! - **v1** (`"1.0.0"`): one boolean `inputArrow` / `outputArrow` per port.
//!   The earliest exports carried only `{ports}`, so every top-level field
//!   except `ports` is optional and a missing `version` means v1.
//! - **v2** (`"2.0.0"`): direction sets, `colorOnly`, `texture`, and a
//!   snapshot-level `textureBasePath`.
//!
//! [`AnySnapshot`] reads either; [`AnySnapshot::into_current`] upgrades v1 to
//! v2 using caller-chosen arrow directions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::palette::{self, DEFAULT_COLOR};
use crate::port::DEFAULT_BLOCK;
use crate::{ArrowSet, Coord, Direction, GridError, Port, GRID_SIZE};

/// Version string written by this crate.
pub const CURRENT_VERSION: &str = "2.0.0";
/// Version string of the boolean-arrow schema.
pub const LEGACY_VERSION: &str = "1.0.0";
/// Name given to grids that never had one.
pub const DEFAULT_GRID_NAME: &str = "Nebulyn Grid";

/// Schema generation of a snapshot document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaVersion {
    /// Boolean arrows.
    V1,
    /// Direction-set arrows.
    V2,
}

impl SchemaVersion {
    /// Classify a document by its `version` field (major component only).
    pub fn detect(version: Option<&str>) -> Result<Self, GridError> {
        let Some(version) = version else {
            return Ok(Self::V1);
        };
        match version.split('.').next() {
            Some("1") => Ok(Self::V1),
            Some("2") => Ok(Self::V2),
            _ => Err(GridError::UnsupportedVersion(version.to_owned())),
        }
    }

    /// Canonical version string for this generation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => LEGACY_VERSION,
            Self::V2 => CURRENT_VERSION,
        }
    }
}

/// One flattened port: its coordinate plus the port attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    /// Cell the port sits on.
    pub coordinate: Coord,
    /// Port attributes, spread into the record.
    #[serde(flatten)]
    pub port: Port,
}

/// Current (v2) snapshot document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    /// Display name.
    pub name: String,
    /// Schema version string.
    pub version: String,
    /// When the snapshot was taken.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Cells per axis; always 16 for documents written here.
    pub grid_size: u8,
    /// Prefix for derived texture paths.
    #[serde(default)]
    pub texture_base_path: String,
    /// Set on colour partitions: the single colour they contain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Ports in store iteration order.
    pub ports: Vec<PortRecord>,
}

impl GridSnapshot {
    /// Empty v2 snapshot stamped with the current time.
    pub fn new(name: impl Into<String>, texture_base_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: CURRENT_VERSION.to_owned(),
            timestamp: OffsetDateTime::now_utc(),
            grid_size: GRID_SIZE,
            texture_base_path: texture_base_path.into(),
            color: None,
            ports: Vec::new(),
        }
    }

    /// Parse a document of either schema and upgrade it to v2.
    pub fn from_json(json: &str, opts: &UpgradeOptions) -> Result<Self, GridError> {
        Ok(AnySnapshot::from_json(json)?.into_current(opts))
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, GridError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of port records.
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Ports keyed by coordinate; later duplicates replace earlier ones.
    pub fn port_map(&self) -> IndexMap<Coord, Port> {
        unflatten(self.ports.iter().cloned())
    }

    /// True if both snapshots hold the same ports at the same coordinates,
    /// ignoring record order and arrow insertion order.
    pub fn same_ports(&self, other: &Self) -> bool {
        let ours = self.port_map();
        let theirs = other.port_map();
        ours.len() == theirs.len()
            && ours.iter().all(|(coord, port)| {
                theirs
                    .get(coord)
                    .is_some_and(|other| port.same_attributes(other))
            })
    }

    /// Down-convert to the boolean-arrow schema. Any non-empty direction set
    /// becomes `true`; textures and direction detail are lost.
    pub fn to_legacy(&self) -> LegacySnapshot {
        LegacySnapshot {
            name: Some(self.name.clone()),
            version: Some(LEGACY_VERSION.to_owned()),
            timestamp: Some(self.timestamp),
            grid_size: Some(self.grid_size),
            color: self.color.clone(),
            ports: self
                .ports
                .iter()
                .map(|r| LegacyPortRecord {
                    coordinate: r.coordinate,
                    input_arrow: !r.port.input_arrows.is_empty(),
                    output_arrow: !r.port.output_arrows.is_empty(),
                    block: r.port.block.clone(),
                    color: r.port.color.clone(),
                    color_hex: r.port.color_hex.clone(),
                    color_only: r.port.color_only,
                })
                .collect(),
        }
    }
}

fn legacy_block() -> String {
    DEFAULT_BLOCK.to_owned()
}

fn legacy_color() -> String {
    DEFAULT_COLOR.to_owned()
}

/// Port record in the boolean-arrow schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPortRecord {
    /// Cell the port sits on.
    pub coordinate: Coord,
    /// Has an incoming arrow.
    #[serde(default)]
    pub input_arrow: bool,
    /// Has an outgoing arrow.
    #[serde(default)]
    pub output_arrow: bool,
    /// Block identifier.
    #[serde(default = "legacy_block")]
    pub block: String,
    /// Colour name.
    #[serde(default = "legacy_color")]
    pub color: String,
    /// Palette hex as written by the exporter.
    #[serde(default)]
    pub color_hex: String,
    /// Colour-only display flag (present on colour-partition exports).
    #[serde(default)]
    pub color_only: bool,
}

impl LegacyPortRecord {
    /// Convert to a v2 record. `true` arrows become a single direction taken
    /// from `opts`; the hex is re-resolved from the colour name.
    pub fn upgrade(self, opts: &UpgradeOptions) -> PortRecord {
        let mut input_arrows = ArrowSet::new();
        if self.input_arrow {
            input_arrows.insert(opts.input_direction);
        }
        let mut output_arrows = ArrowSet::new();
        if self.output_arrow {
            output_arrows.insert(opts.output_direction);
        }
        PortRecord {
            coordinate: self.coordinate,
            port: Port {
                color_hex: palette::resolve(&self.color).to_owned(),
                block: self.block,
                color: self.color,
                input_arrows,
                output_arrows,
                color_only: self.color_only,
                texture: None,
            },
        }
    }
}

/// Snapshot document in the boolean-arrow schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySnapshot {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Schema version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// When the snapshot was taken.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<OffsetDateTime>,
    /// Cells per axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<u8>,
    /// Set on colour partitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Ports in export order.
    #[serde(default)]
    pub ports: Vec<LegacyPortRecord>,
}

impl LegacySnapshot {
    /// Upgrade to v2, bumping the version and filling missing metadata.
    pub fn upgrade(self, opts: &UpgradeOptions) -> GridSnapshot {
        GridSnapshot {
            name: self.name.unwrap_or_else(|| DEFAULT_GRID_NAME.to_owned()),
            version: CURRENT_VERSION.to_owned(),
            timestamp: self.timestamp.unwrap_or_else(OffsetDateTime::now_utc),
            grid_size: self.grid_size.unwrap_or(GRID_SIZE),
            texture_base_path: opts.texture_base_path.clone(),
            color: self.color,
            ports: self.ports.into_iter().map(|p| p.upgrade(opts)).collect(),
        }
    }
}

/// Choices the v1→v2 upgrade cannot infer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeOptions {
    /// Direction given to `inputArrow: true`.
    pub input_direction: Direction,
    /// Direction given to `outputArrow: true`.
    pub output_direction: Direction,
    /// `textureBasePath` for the upgraded snapshot.
    pub texture_base_path: String,
}

impl Default for UpgradeOptions {
    fn default() -> Self {
        Self {
            input_direction: Direction::Top,
            output_direction: Direction::Top,
            texture_base_path: String::new(),
        }
    }
}

/// A snapshot of either schema version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnySnapshot {
    /// v1 document.
    Legacy(LegacySnapshot),
    /// v2 document.
    Current(GridSnapshot),
}

impl AnySnapshot {
    /// Parse JSON text, dispatching on the `version` field.
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse JSON bytes, dispatching on the `version` field.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, GridError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Decode an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, GridError> {
        let version = value.get("version").and_then(Value::as_str);
        match SchemaVersion::detect(version)? {
            SchemaVersion::V1 => Ok(Self::Legacy(serde_json::from_value(value)?)),
            SchemaVersion::V2 => Ok(Self::Current(serde_json::from_value(value)?)),
        }
    }

    /// Which schema this document uses.
    pub fn schema(&self) -> SchemaVersion {
        match self {
            Self::Legacy(_) => SchemaVersion::V1,
            Self::Current(_) => SchemaVersion::V2,
        }
    }

    /// Number of port records.
    pub fn port_count(&self) -> usize {
        match self {
            Self::Legacy(s) => s.ports.len(),
            Self::Current(s) => s.ports.len(),
        }
    }

    /// The v2 form, upgrading if needed.
    pub fn into_current(self, opts: &UpgradeOptions) -> GridSnapshot {
        match self {
            Self::Legacy(s) => s.upgrade(opts),
            Self::Current(s) => s,
        }
    }
}

/// Mapping → ordered record list, in mapping iteration order.
pub fn flatten<'a>(ports: impl IntoIterator<Item = (&'a Coord, &'a Port)>) -> Vec<PortRecord> {
    ports
        .into_iter()
        .map(|(coord, port)| PortRecord {
            coordinate: *coord,
            port: port.clone(),
        })
        .collect()
}

/// Record list → mapping. Coordinates were validated when the records were
/// decoded; a repeated coordinate keeps its first position and its last value.
pub fn unflatten(records: impl IntoIterator<Item = PortRecord>) -> IndexMap<Coord, Port> {
    let mut map = IndexMap::new();
    for record in records {
        map.insert(record.coordinate, record.port);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_DOC: &str = r##"{
        "name": "Nebulyn Main Grid",
        "version": "1.0.0",
        "timestamp": "2024-01-15T10:30:00.000Z",
        "gridSize": 16,
        "ports": [
            {"coordinate": "5,10", "inputArrow": true, "outputArrow": false,
             "block": "stone", "color": "red", "colorHex": "#B02E26"},
            {"coordinate": "8,12", "inputArrow": false, "outputArrow": true,
             "block": "iron", "color": "blue", "colorHex": "#3C44AA"}
        ]
    }"##;

    #[test]
    fn detect_version_by_major() {
        assert_eq!(SchemaVersion::detect(None).unwrap(), SchemaVersion::V1);
        assert_eq!(
            SchemaVersion::detect(Some("1.0.0")).unwrap(),
            SchemaVersion::V1
        );
        assert_eq!(
            SchemaVersion::detect(Some("2.1.0")).unwrap(),
            SchemaVersion::V2
        );
        assert!(matches!(
            SchemaVersion::detect(Some("3.0.0")),
            Err(GridError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn legacy_document_parses_and_upgrades() {
        let any = AnySnapshot::from_json(LEGACY_DOC).unwrap();
        assert_eq!(any.schema(), SchemaVersion::V1);
        assert_eq!(any.port_count(), 2);

        let opts = UpgradeOptions {
            input_direction: Direction::Left,
            output_direction: Direction::Right,
            texture_base_path: "tex/".into(),
        };
        let snap = any.into_current(&opts);
        assert_eq!(snap.version, CURRENT_VERSION);
        assert_eq!(snap.name, "Nebulyn Main Grid");
        assert_eq!(snap.texture_base_path, "tex/");
        let first = &snap.ports[0];
        assert_eq!(first.coordinate.to_string(), "5,10");
        assert!(first.port.input_arrows.contains(Direction::Left));
        assert!(first.port.output_arrows.is_empty());
        assert!(snap.ports[1].port.output_arrows.contains(Direction::Right));
    }

    #[test]
    fn bare_ports_document_is_v1() {
        let any = AnySnapshot::from_json(r#"{"ports":[{"coordinate":"1,1","inputArrow":true}]}"#)
            .unwrap();
        let snap = any.into_current(&UpgradeOptions::default());
        assert_eq!(snap.name, DEFAULT_GRID_NAME);
        assert_eq!(snap.grid_size, 16);
        assert_eq!(snap.ports[0].port.block, "stone");
        assert!(snap.ports[0].port.input_arrows.contains(Direction::Top));
    }

    #[test]
    fn malformed_coordinate_is_rejected() {
        let err = AnySnapshot::from_json(
            r#"{"version":"2.0.0","name":"g","timestamp":"2024-01-15T10:30:00Z","gridSize":16,
                "ports":[{"coordinate":"x,3"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("malformed coordinate"), "{err}");
    }

    #[test]
    fn out_of_range_coordinate_is_rejected() {
        let err = AnySnapshot::from_json(r#"{"ports":[{"coordinate":"17,3"}]}"#).unwrap_err();
        assert!(err.to_string().contains("outside the 16x16 grid"), "{err}");
    }

    #[test]
    fn non_json_is_an_error() {
        assert!(matches!(
            AnySnapshot::from_json("not json at all"),
            Err(GridError::Json(_))
        ));
    }

    #[test]
    fn v2_document_round_trips_through_json() {
        let mut snap = GridSnapshot::new("g", "tex/");
        snap.ports.push(PortRecord {
            coordinate: Coord::new(2, 3).unwrap(),
            port: crate::PortAttrs::new()
                .color("lime")
                .input(Direction::Top)
                .output(Direction::BottomLeft)
                .into_port(),
        });
        let json = snap.to_json_pretty().unwrap();
        assert!(json.contains("\"textureBasePath\": \"tex/\""));
        assert!(!json.contains("\"color\": null"));
        let back = GridSnapshot::from_json(&json, &UpgradeOptions::default()).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn to_legacy_collapses_direction_sets() {
        let mut snap = GridSnapshot::new("g", "");
        snap.ports.push(PortRecord {
            coordinate: Coord::ORIGIN,
            port: crate::PortAttrs::new()
                .input(Direction::Top)
                .input(Direction::Left)
                .into_port(),
        });
        let legacy = snap.to_legacy();
        assert_eq!(legacy.version.as_deref(), Some(LEGACY_VERSION));
        assert!(legacy.ports[0].input_arrow);
        assert!(!legacy.ports[0].output_arrow);
        let v = serde_json::to_value(&legacy).unwrap();
        assert_eq!(v["ports"][0]["inputArrow"], true);
        assert!(v["ports"][0].get("inputArrows").is_none());
    }

    #[test]
    fn unflatten_keeps_first_position_and_last_value() {
        let a = Coord::new(1, 1).unwrap();
        let b = Coord::new(2, 2).unwrap();
        let records = vec![
            PortRecord {
                coordinate: a,
                port: crate::PortAttrs::new().block("one").into_port(),
            },
            PortRecord {
                coordinate: b,
                port: crate::PortAttrs::new().into_port(),
            },
            PortRecord {
                coordinate: a,
                port: crate::PortAttrs::new().block("two").into_port(),
            },
        ];
        let map = unflatten(records);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_index(0).map(|(c, p)| (*c, p.block.as_str())), Some((a, "two")));
    }
}
