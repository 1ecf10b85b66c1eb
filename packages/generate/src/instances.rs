//! Compact per-instance `GeoJSON`.
//!
//! All segments of one street instance are merged into a single
//! `MultiLineString` feature, with coordinates rounded to 3 decimal places
//! (about 100 m), which is plenty for a city-scale map.

use std::path::Path;

use geo::{Coord, MapCoords as _, MultiLineString};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde_json::Value;
use street_names_street_models::{ClusterOutput, RoadSegment, StreetInstance};

use crate::{GenerateError, write_json};

/// Decimal places kept in instance coordinates.
pub const COORDINATE_PRECISION: i32 = 3;

fn round_coordinate(value: f64) -> f64 {
    let scale = 10_f64.powi(COORDINATE_PRECISION);
    (value * scale).round() / scale
}

/// Every polyline of every member segment, rounded.
fn instance_geometry(instance: &StreetInstance, segments: &[RoadSegment]) -> MultiLineString<f64> {
    let lines = instance
        .segments
        .iter()
        .filter_map(|&idx| segments.get(idx))
        .flat_map(|segment| segment.geometry.0.iter().cloned())
        .collect::<Vec<_>>();

    MultiLineString(lines).map_coords(|c| Coord {
        x: round_coordinate(c.x),
        y: round_coordinate(c.y),
    })
}

/// Builds one feature per instance in `output`, in key then ID order.
///
/// `segments` must be the same slice `output` was clustered from.
#[must_use]
pub fn instance_collection(segments: &[RoadSegment], output: &ClusterOutput) -> FeatureCollection {
    let features = output
        .instances
        .iter()
        .map(|instance| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), Value::from(instance.key.as_str()));
            properties.insert("id".to_string(), Value::from(instance.id));
            properties.insert("segments".to_string(), Value::from(instance.segments.len()));

            let geometry = instance_geometry(instance, segments);

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&geometry))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Writes the instance collection to `path`.
///
/// # Errors
///
/// Returns [`GenerateError`] if the file cannot be written.
pub fn write_instances(
    path: &Path,
    segments: &[RoadSegment],
    output: &ClusterOutput,
) -> Result<(), GenerateError> {
    let collection = instance_collection(segments, output);
    log::info!(
        "Writing {} instance features (from {} segments)",
        collection.features.len(),
        segments.len()
    );
    write_json(path, &collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use street_names_cluster::{ClusterConfig, cluster};
    use street_names_street_models::GroupingMode;

    fn regent_street() -> Vec<RoadSegment> {
        vec![
            RoadSegment::from_line(
                "Regent Street",
                "residential",
                &[(151.200_04, -33.880_04), (151.200_6, -33.880_04)],
            ),
            RoadSegment::from_line(
                "Regent Street",
                "residential",
                &[(151.200_6, -33.880_04), (151.201_2, -33.880_04)],
            ),
            RoadSegment::from_line("Regent Street", "residential", &[(151.5, -33.8)]),
        ]
    }

    #[test]
    fn one_feature_per_instance() {
        let segments = regent_street();
        let output = cluster(&segments, GroupingMode::NameType, &ClusterConfig::default());
        let collection = instance_collection(&segments, &output);

        assert_eq!(collection.features.len(), 2);

        let first = &collection.features[0];
        assert_eq!(first.property("name"), Some(&Value::from("Regent Street")));
        assert_eq!(first.property("id"), Some(&Value::from(0)));
        assert_eq!(first.property("segments"), Some(&Value::from(2)));

        let second = &collection.features[1];
        assert_eq!(second.property("id"), Some(&Value::from(1)));
        assert_eq!(second.property("segments"), Some(&Value::from(1)));
    }

    #[test]
    fn coordinates_are_rounded() {
        let segments = regent_street();
        let output = cluster(&segments, GroupingMode::NameType, &ClusterConfig::default());
        let collection = instance_collection(&segments, &output);

        let Some(geojson::Value::MultiLineString(lines)) = collection.features[0]
            .geometry
            .as_ref()
            .map(|g| g.value.clone())
        else {
            panic!("expected MultiLineString geometry");
        };

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0], vec![151.2, -33.88]);
        assert_eq!(lines[1][1], vec![151.201, -33.88]);
    }

    #[test]
    fn rounding_keeps_three_decimals() {
        assert!((round_coordinate(151.2346) - 151.235).abs() < 1e-9);
        assert!((round_coordinate(-33.8704) - -33.870).abs() < 1e-9);
    }
}
