#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City registry entry types.
//!
//! Defines the TOML schema for the capital cities whose street segments
//! are loaded and counted.

use serde::{Deserialize, Serialize};

/// A capital city and where its street data lives, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityConfig {
    /// Unique city identifier (e.g., `"sydney"`).
    pub id: String,
    /// Human-readable name (e.g., "Sydney").
    pub name: String,
    /// Two- or three-letter state or territory abbreviation.
    pub state: String,
    /// Street segment `GeoJSON`, relative to the data directory.
    pub data_file: String,
    /// Precomputed counts JSON, relative to the data directory.
    pub counts_file: String,
    /// Local government areas inside the city's official boundary.
    /// Empty means segments are not scoped by area.
    #[serde(default)]
    pub lgas: Vec<String>,
}

impl CityConfig {
    /// Returns the city identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable city name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if segments should be scoped to [`Self::lgas`].
    #[must_use]
    pub fn scopes_by_area(&self) -> bool {
        !self.lgas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(lgas: &[&str]) -> CityConfig {
        CityConfig {
            id: "hobart".to_string(),
            name: "Hobart".to_string(),
            state: "TAS".to_string(),
            data_file: "cities/hobart/streets.geojson".to_string(),
            counts_file: "cities/hobart/counts.json".to_string(),
            lgas: lgas.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn scoping_follows_lga_list() {
        assert!(!city(&[]).scopes_by_area());
        assert!(city(&["hobart", "glenorchy"]).scopes_by_area());
    }

    #[test]
    fn accessors_return_fields() {
        let city = city(&[]);
        assert_eq!(city.id(), "hobart");
        assert_eq!(city.name(), "Hobart");
    }
}
