#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Road segment and street instance types.
//!
//! These types are shared by every stage of the street-name pipeline:
//! loading produces [`RoadSegment`]s, preprocessing filters them, and the
//! clusterer groups them into [`StreetInstance`]s and a [`NameCount`] per
//! [`GroupingMode`].

use std::collections::BTreeMap;

use geo::{Coord, LineString, MultiLineString};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Placeholder name used by the source data for roads without a name.
pub const UNNAMED: &str = "Unnamed";

/// One drawable piece of a street as delivered by the map data.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    /// Full display name (e.g. "Victoria Street"). May be empty or
    /// [`UNNAMED`].
    pub name: String,
    /// OSM `highway` tag (e.g. "residential", "motorway", "footway").
    pub highway_class: String,
    /// One or more polylines of `(lng, lat)` coordinates.
    pub geometry: MultiLineString<f64>,
    /// Locality or LGA tag used to scope segments to a city.
    pub administrative_area: Option<String>,
}

impl RoadSegment {
    /// Creates a segment from a single polyline of `(lng, lat)` pairs.
    #[must_use]
    pub fn from_line(
        name: impl Into<String>,
        highway_class: impl Into<String>,
        coords: &[(f64, f64)],
    ) -> Self {
        let line: LineString<f64> = coords
            .iter()
            .map(|&(x, y)| Coord { x, y })
            .collect::<Vec<_>>()
            .into();

        Self {
            name: name.into(),
            highway_class: highway_class.into(),
            geometry: MultiLineString(vec![line]),
            administrative_area: None,
        }
    }

    /// Sets the administrative area tag.
    #[must_use]
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.administrative_area = Some(area.into());
        self
    }

    /// Iterates over every vertex of every polyline in this segment.
    pub fn coords(&self) -> impl Iterator<Item = &Coord<f64>> {
        self.geometry.0.iter().flat_map(|line| line.0.iter())
    }

    /// Returns `true` if the segment has no coordinates at all.
    #[must_use]
    pub fn has_empty_geometry(&self) -> bool {
        self.coords().next().is_none()
    }

    /// Returns the name if it identifies a real street, i.e. it is neither
    /// blank nor the [`UNNAMED`] placeholder.
    #[must_use]
    pub fn street_name(&self) -> Option<&str> {
        let name = self.name.trim();
        if name.is_empty() || name == UNNAMED {
            None
        } else {
            Some(name)
        }
    }
}

/// Which key segments are pooled under before clustering.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GroupingMode {
    /// Group by base name ("Victoria"), across all street types.
    NameOnly,
    /// Group by the exact full name ("Victoria Street").
    #[default]
    NameType,
    /// Group by street type ("Street"), across all base names.
    Type,
}

impl GroupingMode {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::NameOnly, Self::NameType, Self::Type]
    }
}

/// Display key -> number of distinct street instances.
pub type NameCount = BTreeMap<String, usize>;

/// A maximal set of same-key segments forming one physical street.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetInstance {
    /// Display key the instance was clustered under.
    pub key: String,
    /// Zero-based ID, stable for a given input and configuration.
    pub id: usize,
    /// Indices of member segments in the clustered input, ascending.
    pub segments: Vec<usize>,
    /// Set when the highway rule collapsed the whole key into one instance.
    pub always_singular: bool,
}

/// Where a single segment landed after clustering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceAssignment {
    /// Display key of the segment's group.
    pub key: String,
    /// ID of the instance within its key.
    pub instance_id: usize,
    /// Number of instances sharing the key.
    pub total_instances: usize,
}

impl InstanceAssignment {
    /// Popup label, e.g. "Instance #2 of 5".
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "Instance #{} of {}",
            self.instance_id + 1,
            self.total_instances
        )
    }
}

/// Result of one clustering pass over a segment set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOutput {
    /// Grouping mode the pass ran under.
    pub mode: GroupingMode,
    /// Instance count per display key.
    pub counts: NameCount,
    /// Every instance, ordered by key and then ID.
    pub instances: Vec<StreetInstance>,
    /// One entry per input segment; `None` when the segment was not
    /// counted (no usable key or no usable geometry).
    pub assignments: Vec<Option<InstanceAssignment>>,
}

impl ClusterOutput {
    /// Number of instances for `key`, or 0 when the key is absent.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Iterates over the instances clustered under `key`.
    pub fn instances_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a StreetInstance> {
        self.instances.iter().filter(move |i| i.key == key)
    }
}
