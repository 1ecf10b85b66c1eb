#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street instance clustering.
//!
//! Groups road segments by a display key (full name, base name, or street
//! type), then splits each group into physically distinct street
//! instances by flood-filling a coordinate grid. Highways are never split.
//!
//! Clustering is total: malformed or empty geometry is skipped with a
//! warning, never reported as an error.

pub mod config;
pub mod grid;
pub mod progress;
pub mod session;

use std::collections::BTreeMap;

use street_names_naming::{get_base_name, get_street_type};
use street_names_street_models::{
    ClusterOutput, GroupingMode, InstanceAssignment, NameCount, RoadSegment, StreetInstance,
};

pub use config::{ClusterConfig, DEFAULT_CELL_SIZE_DEGREES};
use grid::CellGrid;
use progress::{NullProgress, ProgressCallback};

/// Returns `true` for names of roads that are counted as one instance no
/// matter how scattered their segments are.
#[must_use]
pub fn is_highway_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("highway") || lower.contains("hwy")
}

/// Returns the key a segment is grouped under in `mode`, or `None` when
/// the segment is not counted in that mode (unnamed, or no base name /
/// street type to group by).
#[must_use]
pub fn group_key(segment: &RoadSegment, mode: GroupingMode) -> Option<String> {
    let name = segment.street_name()?;

    let key = match mode {
        GroupingMode::NameType => name.to_string(),
        GroupingMode::NameOnly => get_base_name(name),
        GroupingMode::Type => get_street_type(name),
    };

    (!key.is_empty()).then_some(key)
}

/// Returns `true` if the segment has at least one coordinate and every
/// coordinate is finite.
fn has_usable_geometry(segment: &RoadSegment) -> bool {
    if segment.has_empty_geometry() {
        log::debug!("Skipping '{}': no coordinates", segment.name);
        return false;
    }

    if segment.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        log::warn!("Skipping '{}': non-finite coordinates", segment.name);
        return false;
    }

    true
}

/// Pools segment indices under their display key.
///
/// Full names group exactly. Base names and street types group
/// case-insensitively under their most common casing, ties going to the
/// lexicographically smallest, so the display key does not depend on input
/// order.
fn group_segments(segments: &[RoadSegment], mode: GroupingMode) -> BTreeMap<String, Vec<usize>> {
    let keyed: Vec<(usize, String, String)> = segments
        .iter()
        .enumerate()
        .filter_map(|(idx, segment)| {
            let key = group_key(segment, mode)?;
            let folded = match mode {
                GroupingMode::NameType => key.clone(),
                GroupingMode::NameOnly | GroupingMode::Type => key.to_lowercase(),
            };
            Some((idx, folded, key))
        })
        .collect();

    let mut casings: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for (_, folded, key) in &keyed {
        *casings
            .entry(folded.as_str())
            .or_default()
            .entry(key.as_str())
            .or_default() += 1;
    }

    // Casings iterate in ascending order and `max_by_key` keeps the last
    // maximum, so compare on reversed order to keep the smallest on ties.
    let display_keys: BTreeMap<&str, &str> = casings
        .into_iter()
        .filter_map(|(folded, seen)| {
            let display = seen
                .into_iter()
                .rev()
                .max_by_key(|&(_, count)| count)
                .map(|(key, _)| key)?;
            Some((folded, display))
        })
        .collect();

    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, folded, _) in &keyed {
        let display = display_keys[folded.as_str()];
        groups.entry(display.to_string()).or_default().push(*idx);
    }

    groups
}

/// Splits one group of same-key segments into street instances.
///
/// `members` pairs each segment with its index in the caller's segment
/// list; instance member lists refer to those indices. If any usable
/// member is a highway the whole group is a single instance.
#[must_use]
pub fn cluster_group(
    key: &str,
    members: &[(usize, &RoadSegment)],
    config: &ClusterConfig,
) -> Vec<StreetInstance> {
    let usable: Vec<(usize, &RoadSegment)> = members
        .iter()
        .copied()
        .filter(|(_, segment)| has_usable_geometry(segment))
        .collect();

    if usable.is_empty() {
        return Vec::new();
    }

    if usable.iter().any(|(_, segment)| is_highway_name(&segment.name)) {
        return vec![StreetInstance {
            key: key.to_string(),
            id: 0,
            segments: usable.iter().map(|(idx, _)| *idx).collect(),
            always_singular: true,
        }];
    }

    let mut grid = CellGrid::new(config.effective_cell_size());
    for (_, segment) in &usable {
        grid.register_polylines(&segment.geometry);
    }
    log::trace!(
        "'{key}': {} segments over {} cells",
        usable.len(),
        grid.cell_count()
    );

    grid.components()
        .into_iter()
        .enumerate()
        .map(|(id, component)| StreetInstance {
            key: key.to_string(),
            id,
            segments: component.into_iter().map(|m| usable[m].0).collect(),
            always_singular: false,
        })
        .collect()
}

/// Clusters every segment under `mode` and returns counts, instances and
/// per-segment assignments.
#[must_use]
pub fn cluster(
    segments: &[RoadSegment],
    mode: GroupingMode,
    config: &ClusterConfig,
) -> ClusterOutput {
    cluster_with_progress(segments, mode, config, &NullProgress)
}

/// Same as [`cluster`], reporting one unit of progress per display key.
#[must_use]
pub fn cluster_with_progress(
    segments: &[RoadSegment],
    mode: GroupingMode,
    config: &ClusterConfig,
    progress: &dyn ProgressCallback,
) -> ClusterOutput {
    let groups = group_segments(segments, mode);

    progress.set_total(groups.len() as u64);
    progress.set_message(format!("Clustering {mode} keys"));

    let mut counts = NameCount::new();
    let mut instances = Vec::new();
    let mut assignments: Vec<Option<InstanceAssignment>> = vec![None; segments.len()];

    for (key, indices) in &groups {
        let members: Vec<(usize, &RoadSegment)> =
            indices.iter().map(|&idx| (idx, &segments[idx])).collect();

        let found = cluster_group(key, &members, config);
        progress.inc(1);

        if found.is_empty() {
            continue;
        }

        let total = found.len();
        for instance in &found {
            for &idx in &instance.segments {
                assignments[idx] = Some(InstanceAssignment {
                    key: key.clone(),
                    instance_id: instance.id,
                    total_instances: total,
                });
            }
        }

        counts.insert(key.clone(), total);
        instances.extend(found);
    }

    log::info!(
        "Clustered {} segments into {} instances across {} {mode} keys",
        segments.len(),
        instances.len(),
        counts.len(),
    );
    progress.finish(format!(
        "{} {mode} keys, {} instances",
        counts.len(),
        instances.len()
    ));

    ClusterOutput {
        mode,
        counts,
        instances,
        assignments,
    }
}
