#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Segment preprocessing.
//!
//! Produces the clean segment list every count is computed from: scopes
//! segments to a city's administrative areas, drops entities that are not
//! streets (ramps, cycleways, tunnels, footways, ...) and drops segments
//! without geometry. The same input always yields the same output.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use street_names_naming::capitalization::normalize_capitalization;
use street_names_street_models::RoadSegment;

/// `highway` tag values that never describe a street.
pub const EXCLUDED_HIGHWAY_CLASSES: &[&str] =
    &["cycleway", "footway", "path", "steps", "pedestrian", "track"];

/// Name patterns for segments that are parts of a road network but not
/// streets in their own right.
static EXCLUDED_NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(exit|offramp|onramp|on-ramp|off-ramp|on ramp|off ramp)\b",
        r"(?i)\bcycleway\b",
        r"(?i)\bshared path\b",
        r"(?i)\bpaid area\b",
        r"(?i)\bservice road\b",
        r"(?i)\bunderpass\b",
        r"(?i)\bcrossing\b",
        r"(?i)\btunnel\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Options controlling [`preprocess`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PreprocessOptions {
    /// Administrative areas (LGA names) that make up the city. Empty means
    /// no area scoping.
    pub valid_areas: Vec<String>,
    /// Fix capitalization of names before filtering and grouping.
    pub normalize_capitalization: bool,
}

/// How many segments each filter removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterReport {
    /// Segments received.
    pub input: usize,
    /// Segments kept.
    pub kept: usize,
    /// Dropped for lying outside the valid areas.
    pub outside_area: usize,
    /// Dropped because the name describes a non-street entity.
    pub excluded_name: usize,
    /// Dropped by `highway` class, tallied per class.
    pub excluded_highway_class: BTreeMap<String, usize>,
    /// Dropped for having no coordinates.
    pub empty_geometry: usize,
}

impl FilterReport {
    /// Total segments dropped by any filter.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.input - self.kept
    }
}

/// Output of [`preprocess`].
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Segments that survived every filter, in input order.
    pub segments: Vec<RoadSegment>,
    /// Drop counts per filter.
    pub report: FilterReport,
}

/// Returns `true` if the name describes a ramp, path, crossing or other
/// non-street entity.
#[must_use]
pub fn is_excluded_name(name: &str) -> bool {
    EXCLUDED_NAME_PATTERNS.iter().any(|p| p.is_match(name))
}

/// Returns `true` if the `highway` class is one that never describes a
/// street.
#[must_use]
pub fn is_excluded_highway_class(highway_class: &str) -> bool {
    let class = highway_class.trim();
    EXCLUDED_HIGHWAY_CLASSES
        .iter()
        .any(|excluded| excluded.eq_ignore_ascii_case(class))
}

/// Returns `true` if the segment's area tag contains one of `valid_areas`
/// (already lower-cased). Untagged segments never match.
fn in_valid_area(segment: &RoadSegment, valid_areas: &[String]) -> bool {
    segment
        .administrative_area
        .as_deref()
        .map(str::to_lowercase)
        .is_some_and(|area| valid_areas.iter().any(|valid| area.contains(valid.as_str())))
}

/// Filters raw segments down to the streets that should be counted.
///
/// Area scoping only applies when `options.valid_areas` is non-empty and
/// at least one segment carries an area tag; in that case untagged
/// segments are dropped too.
#[must_use]
pub fn preprocess(segments: Vec<RoadSegment>, options: &PreprocessOptions) -> Preprocessed {
    let mut report = FilterReport {
        input: segments.len(),
        ..FilterReport::default()
    };

    let valid_areas: Vec<String> = options
        .valid_areas
        .iter()
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect();
    let has_area_tags = segments.iter().any(|s| {
        s.administrative_area
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty())
    });
    let scope_by_area = !valid_areas.is_empty() && has_area_tags;

    let mut kept = Vec::with_capacity(segments.len());

    for mut segment in segments {
        if scope_by_area && !in_valid_area(&segment, &valid_areas) {
            report.outside_area += 1;
            continue;
        }

        if options.normalize_capitalization {
            segment.name = normalize_capitalization(&segment.name);
        }

        if is_excluded_name(&segment.name) {
            log::debug!("Excluding non-street entity '{}'", segment.name);
            report.excluded_name += 1;
            continue;
        }

        if is_excluded_highway_class(&segment.highway_class) {
            *report
                .excluded_highway_class
                .entry(segment.highway_class.trim().to_lowercase())
                .or_default() += 1;
            continue;
        }

        if segment.has_empty_geometry() {
            report.empty_geometry += 1;
            continue;
        }

        kept.push(segment);
    }

    report.kept = kept.len();

    log::info!(
        "Preprocessed {} segments: kept {}, outside area {}, excluded by name {}, \
         excluded by class {}, empty geometry {}",
        report.input,
        report.kept,
        report.outside_area,
        report.excluded_name,
        report.excluded_highway_class.values().sum::<usize>(),
        report.empty_geometry,
    );

    Preprocessed {
        segments: kept,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(name: &str, class: &str) -> RoadSegment {
        RoadSegment::from_line(name, class, &[(151.2, -33.8), (151.201, -33.8)])
    }

    #[test]
    fn excludes_non_street_names() {
        for name in [
            "Foo Street Cycleway",
            "M4 Exit",
            "Princes Highway Off-Ramp",
            "Bondi Shared Path",
            "Paid Area",
            "Airport Service Road",
            "Harbour Tunnel",
            "Railway Crossing",
            "Park Underpass",
        ] {
            assert!(is_excluded_name(name), "{name} should be excluded");
        }
    }

    #[test]
    fn exclusion_is_whole_word() {
        assert!(!is_excluded_name("Exeter Street"));
        assert!(!is_excluded_name("Tunnelview Road"));
        assert!(!is_excluded_name("Crossingham Avenue"));
        assert!(!is_excluded_name("Victoria Street"));
    }

    #[test]
    fn excludes_highway_classes_case_insensitively() {
        assert!(is_excluded_highway_class("footway"));
        assert!(is_excluded_highway_class(" Cycleway "));
        assert!(!is_excluded_highway_class("residential"));
        assert!(!is_excluded_highway_class("motorway"));
    }

    #[test]
    fn preprocess_reports_each_filter() {
        let segments = vec![
            segment("King Street", "residential"),
            segment("Foo Street Cycleway", "residential"),
            segment("Bar Lane", "footway"),
            segment("Baz Lane", "footway"),
            RoadSegment::from_line("Empty Street", "residential", &[]),
        ];

        let result = preprocess(segments, &PreprocessOptions::default());

        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].name, "King Street");
        assert_eq!(result.report.input, 5);
        assert_eq!(result.report.kept, 1);
        assert_eq!(result.report.excluded_name, 1);
        assert_eq!(result.report.excluded_highway_class.get("footway"), Some(&2));
        assert_eq!(result.report.empty_geometry, 1);
        assert_eq!(result.report.dropped(), 4);
    }

    #[test]
    fn scopes_by_area_substring() {
        let segments = vec![
            segment("King Street", "residential").with_area("City of Sydney"),
            segment("Queen Street", "residential").with_area("Wollongong"),
            segment("Untagged Street", "residential"),
        ];
        let options = PreprocessOptions {
            valid_areas: vec!["Sydney".to_string()],
            ..PreprocessOptions::default()
        };

        let result = preprocess(segments, &options);

        let names: Vec<&str> = result.segments.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["King Street"]);
        assert_eq!(result.report.outside_area, 2);
    }

    #[test]
    fn skips_area_scoping_without_tags() {
        let segments = vec![
            segment("King Street", "residential"),
            segment("Queen Street", "residential"),
        ];
        let options = PreprocessOptions {
            valid_areas: vec!["sydney".to_string()],
            ..PreprocessOptions::default()
        };

        let result = preprocess(segments, &options);
        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.report.outside_area, 0);
    }

    #[test]
    fn normalizes_capitalization_when_requested() {
        let options = PreprocessOptions {
            normalize_capitalization: true,
            ..PreprocessOptions::default()
        };

        let result = preprocess(vec![segment("KIng STREET", "residential")], &options);
        assert_eq!(result.segments[0].name, "King Street");
    }

    #[test]
    fn preprocess_is_deterministic() {
        let make = || {
            vec![
                segment("King Street", "residential").with_area("Sydney"),
                segment("Harbour Tunnel", "motorway").with_area("Sydney"),
                segment("George Street", "footway").with_area("Sydney"),
            ]
        };
        let options = PreprocessOptions {
            valid_areas: vec!["sydney".to_string()],
            normalize_capitalization: true,
        };

        let a = preprocess(make(), &options);
        let b = preprocess(make(), &options);
        assert_eq!(a.segments, b.segments);
        assert_eq!(a.report, b.report);
    }
}
