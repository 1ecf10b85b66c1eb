#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street name decomposition.
//!
//! Splits a full street name into its base name ("Victoria") and street
//! type ("Street") using an ordered suffix table, and provides the
//! capitalization fixes and category word tables used when browsing names.

pub mod capitalization;
pub mod categories;

use std::sync::LazyLock;

use regex::Regex;

/// Road-type suffixes, most specific first so that "Road North" is tried
/// before "Road".
pub const STREET_SUFFIXES: &[&str] = &[
    "Road South",
    "Road North",
    "Road West",
    "Road East",
    "Road S",
    "Road N",
    "Road W",
    "Road E",
    "Street",
    "Road",
    "Avenue",
    "Drive",
    "Lane",
    "Way",
    "Place",
    "Circuit",
    "Crescent",
    "Court",
    "Parade",
    "Boulevard",
    "Terrace",
    "Close",
    "Grove",
    "Walk",
    "Path",
    "Mews",
    "Square",
    "Esplanade",
    "Promenade",
    "Highway",
    "Motorway",
    "Freeway",
    "Parkway",
    "Plaza",
    "Loop",
    "Row",
    "Gateway",
    "Tunnel",
    "Corso",
];

/// One anchored, case-insensitive pattern per entry of [`STREET_SUFFIXES`].
/// The suffix must be preceded by whitespace, so a bare "Parade" is never
/// treated as a type.
static SUFFIX_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    STREET_SUFFIXES
        .iter()
        .map(|suffix| {
            Regex::new(&format!(r"(?i)\s+({})$", regex::escape(suffix))).expect("valid regex")
        })
        .collect()
});

/// Returns the name with trailing street-type suffixes removed.
///
/// Suffixes are stripped repeatedly until none remains, so
/// "Foo Road Street" becomes "Foo". Names without a recognized suffix are
/// returned trimmed but otherwise unchanged.
#[must_use]
pub fn get_base_name(name: &str) -> String {
    let mut base = name.trim();

    'strip: loop {
        for pattern in SUFFIX_PATTERNS.iter() {
            if let Some(m) = pattern.find(base) {
                base = base[..m.start()].trim_end();
                continue 'strip;
            }
        }
        break;
    }

    base.to_string()
}

/// Returns the street-type suffix of a name, with the casing it has in
/// `name`, or an empty string if the name has no recognized suffix.
#[must_use]
pub fn get_street_type(name: &str) -> String {
    let name = name.trim();

    SUFFIX_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(name))
        .and_then(|caps| caps.get(1))
        .map_or_else(String::new, |m| m.as_str().to_string())
}
