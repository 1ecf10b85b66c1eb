//! City registry. Loads all capital city definitions from embedded TOML.
//!
//! Each `.toml` file in `packages/source/cities/` is baked into the binary
//! at compile time via [`include_str!`]. Adding a city means creating a TOML
//! file and adding it to the list below.

use street_names_source_models::CityConfig;

/// Number of registered cities. Enforced by a test.
#[cfg(test)]
const EXPECTED_CITY_COUNT: usize = 8;

/// Embedded TOML city definitions.
const CITY_TOMLS: &[(&str, &str)] = &[
    ("sydney", include_str!("../cities/sydney.toml")),
    ("melbourne", include_str!("../cities/melbourne.toml")),
    ("brisbane", include_str!("../cities/brisbane.toml")),
    ("perth", include_str!("../cities/perth.toml")),
    ("adelaide", include_str!("../cities/adelaide.toml")),
    ("canberra", include_str!("../cities/canberra.toml")),
    ("hobart", include_str!("../cities/hobart.toml")),
    ("darwin", include_str!("../cities/darwin.toml")),
];

/// Returns all registered cities.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_cities() -> Vec<CityConfig> {
    CITY_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse city '{name}': {e}"))
        })
        .collect()
}

/// Looks up a city by ID (case-insensitive).
#[must_use]
pub fn find_city(id: &str) -> Option<CityConfig> {
    all_cities()
        .into_iter()
        .find(|city| city.id.eq_ignore_ascii_case(id.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_cities() {
        let cities = all_cities();
        assert_eq!(
            cities.len(),
            EXPECTED_CITY_COUNT,
            "Expected {EXPECTED_CITY_COUNT} cities, found {}. \
             Update EXPECTED_CITY_COUNT after adding/removing cities.",
            cities.len()
        );
    }

    #[test]
    fn city_ids_are_unique_and_match_file_keys() {
        let mut seen = BTreeSet::new();
        for ((key, _), city) in CITY_TOMLS.iter().zip(all_cities()) {
            assert_eq!(*key, city.id, "File key and id differ");
            assert!(seen.insert(city.id.clone()), "Duplicate city ID: {}", city.id);
        }
    }

    #[test]
    fn all_cities_have_required_fields() {
        for city in &all_cities() {
            assert!(!city.name.is_empty(), "City {} has empty name", city.id);
            assert!(
                (2..=3).contains(&city.state.len()),
                "City {} has invalid state: {}",
                city.id,
                city.state
            );
            assert!(
                city.data_file.ends_with(".geojson"),
                "City {} data file is not GeoJSON",
                city.id
            );
            for lga in &city.lgas {
                assert_eq!(
                    *lga,
                    lga.to_lowercase(),
                    "City {} LGA {lga} should be lower case",
                    city.id
                );
            }
        }
    }

    #[test]
    fn finds_city_case_insensitively() {
        let sydney = find_city("Sydney").unwrap();
        assert!(sydney.scopes_by_area());
        assert!(sydney.lgas.iter().any(|lga| lga == "parramatta"));
        assert!(find_city("auckland").is_none());
    }
}
