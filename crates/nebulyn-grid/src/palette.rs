// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The fixed 16-entry colour palette.
//!
//! Port colours are free text. Lookups are exact (case-sensitive) and any name
//! not in the table resolves to the white entry.

/// Colour name used when a port does not specify one.
pub const DEFAULT_COLOR: &str = "white";

/// Hex code of the white entry, the fallback for unknown names.
pub const WHITE_HEX: &str = "#F9FFFE";

const PALETTE: [(&str, &str); 16] = [
    ("white", WHITE_HEX),
    ("orange", "#F9801D"),
    ("magenta", "#C74EBD"),
    ("lightblue", "#3AB3DA"),
    ("yellow", "#FED83D"),
    ("lime", "#80C71F"),
    ("pink", "#F38BAA"),
    ("gray", "#474F52"),
    ("lightgray", "#9D9D97"),
    ("cyan", "#169C9C"),
    ("purple", "#8932B8"),
    ("blue", "#3C44AA"),
    ("brown", "#835432"),
    ("green", "#5E7C16"),
    ("red", "#B02E26"),
    ("black", "#1D1D21"),
];

/// All `(name, hex)` entries in canonical order.
pub fn entries() -> &'static [(&'static str, &'static str)] {
    &PALETTE
}

/// Hex code for `name`, or `None` if it is not a palette colour.
pub fn lookup(name: &str) -> Option<&'static str> {
    PALETTE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, hex)| *hex)
}

/// Hex code for `name`, falling back to [`WHITE_HEX`].
pub fn resolve(name: &str) -> &'static str {
    lookup(name).unwrap_or(WHITE_HEX)
}
