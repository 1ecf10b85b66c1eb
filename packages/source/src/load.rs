//! `GeoJSON` street segment loading.
//!
//! Features are converted one at a time so a single malformed feature
//! (bad coordinates, unsupported geometry) is skipped with a warning
//! instead of failing the whole city.

use std::path::Path;

use geo::MultiLineString;
use geojson::Feature;
use serde_json::Value;
use street_names_street_models::RoadSegment;

use crate::SourceError;

/// Reads and parses a `GeoJSON` `FeatureCollection` of street segments.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or is not a
/// `FeatureCollection`.
pub fn load_segments(path: &Path) -> Result<Vec<RoadSegment>, SourceError> {
    let text = std::fs::read_to_string(path)?;
    let segments = parse_segments(&text)?;
    log::info!("Loaded {} segments from {}", segments.len(), path.display());
    Ok(segments)
}

/// Parses a `GeoJSON` `FeatureCollection` string into segments.
///
/// # Errors
///
/// Returns [`SourceError`] if the text is not JSON or not a
/// `FeatureCollection`. Individual bad features are skipped, not errors.
pub fn parse_segments(text: &str) -> Result<Vec<RoadSegment>, SourceError> {
    let mut document: Value = serde_json::from_str(text)?;

    let doc_type = document.get("type").and_then(Value::as_str);
    if doc_type != Some("FeatureCollection") {
        return Err(SourceError::InvalidDocument {
            message: format!("expected a FeatureCollection, found {doc_type:?}"),
        });
    }

    let features = document
        .get_mut("features")
        .and_then(Value::as_array_mut)
        .map(std::mem::take)
        .ok_or_else(|| SourceError::InvalidDocument {
            message: "missing features array".to_string(),
        })?;

    let total = features.len();
    let segments: Vec<RoadSegment> = features
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| segment_from_value(index, value))
        .collect();

    let skipped = total - segments.len();
    if skipped > 0 {
        log::warn!("Skipped {skipped} of {total} features with unusable geometry");
    }

    Ok(segments)
}

fn segment_from_value(index: usize, value: Value) -> Option<RoadSegment> {
    let feature: Feature = match serde_json::from_value(value) {
        Ok(feature) => feature,
        Err(e) => {
            log::warn!("Skipping malformed feature #{index}: {e}");
            return None;
        }
    };

    let segment = segment_from_feature(&feature);
    if segment.is_none() {
        log::debug!("Skipping feature #{index}: no line geometry");
    }
    segment
}

/// Converts one feature into a segment.
///
/// Reads `name`, `highway` and `lga`/`LGA` properties. A `type` property
/// is not a highway class and is ignored. Returns `None` unless the geometry is a `LineString` or
/// `MultiLineString`.
#[must_use]
pub fn segment_from_feature(feature: &Feature) -> Option<RoadSegment> {
    let geometry: geo::Geometry<f64> = feature.geometry.clone()?.try_into().ok()?;

    let geometry = match geometry {
        geo::Geometry::LineString(line) => MultiLineString(vec![line]),
        geo::Geometry::MultiLineString(lines) => lines,
        _ => return None,
    };

    Some(RoadSegment {
        name: string_property(feature, &["name"]).unwrap_or_default(),
        highway_class: string_property(feature, &["highway"]).unwrap_or_default(),
        geometry,
        administrative_area: string_property(feature, &["lga", "LGA"]),
    })
}

/// First non-blank string value among `keys`, trimmed.
fn string_property(feature: &Feature, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| feature.property(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Victoria Street", "highway": "residential", "lga": "City of Sydney" },
                "geometry": { "type": "LineString", "coordinates": [[151.2, -33.87], [151.201, -33.87]] }
            },
            {
                "type": "Feature",
                "properties": { "name": "Parramatta Road", "type": "primary", "LGA": "Inner West" },
                "geometry": {
                    "type": "MultiLineString",
                    "coordinates": [[[151.1, -33.88], [151.11, -33.88]], [[151.12, -33.88], [151.13, -33.88]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Town Hall" },
                "geometry": { "type": "Point", "coordinates": [151.2, -33.87] }
            },
            {
                "type": "Feature",
                "properties": { "name": "Ghost Lane" },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "name": "Broken Road" },
                "geometry": { "type": "LineString", "coordinates": [["a", "b"], [151.0, -33.0]] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "LineString", "coordinates": [[151.3, -33.9], [151.31, -33.9]] }
            }
        ]
    }"#;

    #[test]
    fn parses_line_features() {
        let segments = parse_segments(SAMPLE).unwrap();
        assert_eq!(segments.len(), 3);

        assert_eq!(segments[0].name, "Victoria Street");
        assert_eq!(segments[0].highway_class, "residential");
        assert_eq!(
            segments[0].administrative_area.as_deref(),
            Some("City of Sydney")
        );
        assert_eq!(segments[0].coords().count(), 2);
    }

    #[test]
    fn reads_uppercase_lga_tag() {
        let segments = parse_segments(SAMPLE).unwrap();

        assert_eq!(segments[1].administrative_area.as_deref(), Some("Inner West"));
        assert_eq!(segments[1].geometry.0.len(), 2);
    }

    #[test]
    fn type_property_is_not_a_highway_class() {
        let segments = parse_segments(SAMPLE).unwrap();
        assert_eq!(segments[1].highway_class, "");

        let segments = parse_segments(
            r#"{
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": { "name": "Bush Walk", "type": "path" },
                    "geometry": { "type": "LineString", "coordinates": [[151.0, -33.8], [151.001, -33.8]] }
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(segments[0].highway_class, "");
    }

    #[test]
    fn keeps_features_without_properties() {
        let segments = parse_segments(SAMPLE).unwrap();

        assert_eq!(segments[2].name, "");
        assert_eq!(segments[2].highway_class, "");
        assert!(segments[2].administrative_area.is_none());
    }

    #[test]
    fn rejects_non_collections() {
        let err = parse_segments(r#"{ "type": "Feature", "properties": {}, "geometry": null }"#)
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidDocument { .. }));

        let err = parse_segments(r#"{ "type": "FeatureCollection" }"#).unwrap_err();
        assert!(matches!(err, SourceError::InvalidDocument { .. }));

        assert!(matches!(
            parse_segments("not json").unwrap_err(),
            SourceError::Json(_)
        ));
    }
}
