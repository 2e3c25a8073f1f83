// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Grid coordinates and their `"x,y"` string form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GridError;

/// Number of cells along each axis.
pub const GRID_SIZE: u8 = 16;

/// A validated, 1-indexed cell position.
///
/// Both components lie in `1..=GRID_SIZE`. The serialized form is `"x,y"`
/// with no padding or whitespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coord {
    x: u8,
    y: u8,
}

fn axis(v: u32) -> Option<u8> {
    u8::try_from(v)
        .ok()
        .filter(|v| (1..=GRID_SIZE).contains(v))
}

impl Coord {
    /// Top-left origin used for the initial focus.
    pub const ORIGIN: Self = Self { x: 1, y: 1 };

    /// Build a coordinate, rejecting components outside the grid.
    pub fn new(x: u32, y: u32) -> Result<Self, GridError> {
        match (axis(x), axis(y)) {
            (Some(x), Some(y)) => Ok(Self { x, y }),
            _ => Err(GridError::CoordinateOutOfRange { x, y }),
        }
    }

    /// Column, `1..=16`.
    pub fn x(self) -> u8 {
        self.x
    }

    /// Row, `1..=16`.
    pub fn y(self) -> u8 {
        self.y
    }

    /// Every cell in presentation order: rows from 16 down to 1, columns
    /// left to right.
    pub fn display_order() -> impl Iterator<Item = Self> {
        (1..=GRID_SIZE)
            .rev()
            .flat_map(|y| (1..=GRID_SIZE).map(move |x| Self { x, y }))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

fn component(raw: &str, whole: &str) -> Result<u32, GridError> {
    // Canonical form only: no sign, no padding, no leading zeros.
    let canonical = !raw.is_empty()
        && raw.bytes().all(|b| b.is_ascii_digit())
        && !(raw.len() > 1 && raw.starts_with('0'));
    if !canonical {
        return Err(GridError::MalformedCoordinate(whole.to_owned()));
    }
    raw.parse::<u32>()
        .map_err(|_| GridError::MalformedCoordinate(whole.to_owned()))
}

impl FromStr for Coord {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| GridError::MalformedCoordinate(s.to_owned()))?;
        Self::new(component(x, s)?, component(y, s)?)
    }
}

impl TryFrom<String> for Coord {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Coord> for String {
    fn from(value: Coord) -> Self {
        value.to_string()
    }
}
