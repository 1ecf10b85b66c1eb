//! Segment `GeoJSON` annotated with instance assignments.
//!
//! Each input segment becomes one feature carrying its original `name`,
//! `highway` and `lga` properties. Counted segments also get
//! `_instanceId` and `_totalInstances`, which the map popup reads to show
//! "Instance #N of M".

use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde_json::Value;
use street_names_street_models::{ClusterOutput, RoadSegment};

use crate::{GenerateError, write_json};

/// Converts a segment's polylines to a `GeoJSON` geometry, using a plain
/// `LineString` when there is only one.
pub(crate) fn segment_geometry(segment: &RoadSegment) -> Geometry {
    match segment.geometry.0.as_slice() {
        [line] => Geometry::new(geojson::Value::from(line)),
        _ => Geometry::new(geojson::Value::from(&segment.geometry)),
    }
}

fn segment_properties(segment: &RoadSegment) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), Value::from(segment.name.as_str()));
    properties.insert(
        "highway".to_string(),
        Value::from(segment.highway_class.as_str()),
    );
    if let Some(area) = &segment.administrative_area {
        properties.insert("lga".to_string(), Value::from(area.as_str()));
    }
    properties
}

/// Builds the annotated feature collection.
///
/// `segments` must be the same slice `output` was clustered from.
#[must_use]
pub fn annotated_collection(segments: &[RoadSegment], output: &ClusterOutput) -> FeatureCollection {
    let features = segments
        .iter()
        .enumerate()
        .map(|(idx, segment)| {
            let mut properties = segment_properties(segment);

            if let Some(Some(assignment)) = output.assignments.get(idx) {
                properties.insert(
                    "_instanceId".to_string(),
                    Value::from(assignment.instance_id),
                );
                properties.insert(
                    "_totalInstances".to_string(),
                    Value::from(assignment.total_instances),
                );
            }

            Feature {
                bbox: None,
                geometry: Some(segment_geometry(segment)),
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

/// Writes the annotated segments to `path`.
///
/// # Errors
///
/// Returns [`GenerateError`] if the file cannot be written.
pub fn write_annotated(
    path: &Path,
    segments: &[RoadSegment],
    output: &ClusterOutput,
) -> Result<(), GenerateError> {
    let collection = annotated_collection(segments, output);
    log::info!("Writing {} annotated segments", collection.features.len());
    write_json(path, &collection)
}
