// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Arrow directions and the insertion-ordered arrow set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GridError;

/// One of the eight compass directions an arrow can point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// `top`
    Top,
    /// `top-right`
    TopRight,
    /// `right`
    Right,
    /// `bottom-right`
    BottomRight,
    /// `bottom`
    Bottom,
    /// `bottom-left`
    BottomLeft,
    /// `left`
    Left,
    /// `top-left`
    TopLeft,
}

impl Direction {
    /// All directions, clockwise from `top`.
    pub const ALL: [Self; 8] = [
        Self::Top,
        Self::TopRight,
        Self::Right,
        Self::BottomRight,
        Self::Bottom,
        Self::BottomLeft,
        Self::Left,
        Self::TopLeft,
    ];

    /// Wire label (`"top-right"` etc).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::TopRight => "top-right",
            Self::Right => "right",
            Self::BottomRight => "bottom-right",
            Self::Bottom => "bottom",
            Self::BottomLeft => "bottom-left",
            Self::Left => "left",
            Self::TopLeft => "top-left",
        }
    }

    /// Single-character arrow glyph for text rendering.
    pub fn glyph(self) -> char {
        match self {
            Self::Top => '↑',
            Self::TopRight => '↗',
            Self::Right => '→',
            Self::BottomRight => '↘',
            Self::Bottom => '↓',
            Self::BottomLeft => '↙',
            Self::Left => '←',
            Self::TopLeft => '↖',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| GridError::UnknownDirection(s.to_owned()))
    }
}

/// Set of directions that remembers insertion order.
///
/// Duplicates are never stored. Order is kept so documents round-trip
/// byte-for-byte, but equality of two ports does not depend on it; see
/// [`ArrowSet::same_directions`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Direction>", into = "Vec<Direction>")]
pub struct ArrowSet(Vec<Direction>);

impl ArrowSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dir`. Returns `false` if it was already present.
    pub fn insert(&mut self, dir: Direction) -> bool {
        if self.0.contains(&dir) {
            return false;
        }
        self.0.push(dir);
        true
    }

    /// Remove `dir`. Returns `false` if it was absent.
    pub fn remove(&mut self, dir: Direction) -> bool {
        let before = self.0.len();
        self.0.retain(|d| *d != dir);
        self.0.len() != before
    }

    /// Whether `dir` is in the set.
    pub fn contains(&self, dir: Direction) -> bool {
        self.0.contains(&dir)
    }

    /// Number of directions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no direction is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Directions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.0.iter().copied()
    }

    /// Order-insensitive comparison.
    pub fn same_directions(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|d| other.contains(d))
    }
}

impl From<Vec<Direction>> for ArrowSet {
    fn from(value: Vec<Direction>) -> Self {
        value.into_iter().collect()
    }
}

impl From<ArrowSet> for Vec<Direction> {
    fn from(value: ArrowSet) -> Self {
        value.0
    }
}

impl FromIterator<Direction> for ArrowSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = Self::new();
        for dir in iter {
            set.insert(dir);
        }
        set
    }
}
