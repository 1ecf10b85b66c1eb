//! Counts JSON document.

use std::path::Path;

use serde::{Deserialize, Serialize};
use street_names_cluster::ClusterConfig;
use street_names_street_models::{ClusterOutput, GroupingMode, NameCount};

use crate::{GenerateError, write_json};

/// Serialized form of one mode's counts for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountsDocument {
    pub mode: GroupingMode,
    pub cell_size_degrees: f64,
    pub counts: NameCount,
}

impl CountsDocument {
    #[must_use]
    pub fn new(output: &ClusterOutput, config: &ClusterConfig) -> Self {
        Self {
            mode: output.mode,
            cell_size_degrees: config.effective_cell_size(),
            counts: output.counts.clone(),
        }
    }
}

/// Writes the counts document for `output` to `path`.
///
/// # Errors
///
/// Returns [`GenerateError`] if the file cannot be written.
pub fn write_counts(
    path: &Path,
    output: &ClusterOutput,
    config: &ClusterConfig,
) -> Result<(), GenerateError> {
    let document = CountsDocument::new(output, config);
    log::info!(
        "Writing {} {} counts",
        document.counts.len(),
        document.mode
    );
    write_json(path, &document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use street_names_cluster::cluster;
    use street_names_street_models::RoadSegment;

    #[test]
    fn document_uses_camel_case_keys() {
        let segments = vec![
            RoadSegment::from_line("King Street", "residential", &[(151.2, -33.87)]),
            RoadSegment::from_line("King Street", "residential", &[(151.3, -33.87)]),
        ];
        let config = ClusterConfig::default();
        let output = cluster(&segments, GroupingMode::NameType, &config);

        let value = serde_json::to_value(CountsDocument::new(&output, &config)).unwrap();

        assert_eq!(value["mode"], "name-type");
        assert_eq!(value["cellSizeDegrees"], 0.002);
        assert_eq!(value["counts"]["King Street"], 2);
    }

    #[test]
    fn invalid_cell_size_is_reported_as_effective_value() {
        let output = cluster(&[], GroupingMode::Type, &ClusterConfig::default());
        let document = CountsDocument::new(&output, &ClusterConfig::with_cell_size(-1.0));

        assert!((document.cell_size_degrees - 0.002).abs() < f64::EPSILON);
        assert!(document.counts.is_empty());
    }
}
