//! Load -> preprocess -> cluster pipeline shared by the subcommands and
//! the interactive flow.

use std::path::{Path, PathBuf};

use street_names_cli_utils::{IndicatifProgress, MultiProgress};
use street_names_cluster::{ClusterConfig, cluster_with_progress};
use street_names_preprocess::{FilterReport, PreprocessOptions, Preprocessed, preprocess};
use street_names_source::load::load_segments;
use street_names_source::registry::find_city;
use street_names_source_models::CityConfig;
use street_names_street_models::{ClusterOutput, GroupingMode, NameCount, RoadSegment};

/// Where a run reads its segments from.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    /// Registry entry when the input was chosen by city ID.
    pub city: Option<CityConfig>,
    /// Segment `GeoJSON` file.
    pub path: PathBuf,
    data_dir: PathBuf,
}

impl ResolvedInput {
    /// Input for a registered city, resolved against `data_dir`.
    #[must_use]
    pub fn for_city(city: CityConfig, data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(&city.data_file),
            city: Some(city),
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// Input for an arbitrary `GeoJSON` file.
    #[must_use]
    pub fn for_file(path: PathBuf) -> Self {
        let data_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            city: None,
            path,
            data_dir,
        }
    }

    /// Resolves `--city` or `--input`.
    ///
    /// # Errors
    ///
    /// Returns an error if the city ID is unknown or neither was given.
    pub fn resolve(
        city: Option<&str>,
        input: Option<&Path>,
        data_dir: &Path,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        match (city, input) {
            (Some(id), _) => {
                let city = find_city(id).ok_or_else(|| format!("Unknown city '{id}'"))?;
                Ok(Self::for_city(city, data_dir))
            }
            (None, Some(path)) => Ok(Self::for_file(path.to_path_buf())),
            (None, None) => Err("Either --city or --input is required".into()),
        }
    }

    /// Short label for log lines and prompts.
    #[must_use]
    pub fn label(&self) -> String {
        self.city.as_ref().map_or_else(
            || self.path.display().to_string(),
            |city| city.name().to_string(),
        )
    }

    /// Default location for an output of `kind` under `mode`.
    ///
    /// Counts for a registered city go next to the city's configured
    /// counts file; everything else goes next to the input file.
    #[must_use]
    pub fn default_output(&self, kind: OutputKind, mode: GroupingMode) -> PathBuf {
        if let (OutputKind::Counts, Some(city)) = (kind, &self.city) {
            return with_mode_tag(&self.data_dir.join(&city.counts_file), mode);
        }

        let stem = self
            .path
            .file_stem()
            .map_or_else(|| "streets".into(), |s| s.to_string_lossy());
        self.path.with_file_name(format!(
            "{stem}.{}.{mode}.{}",
            kind.suffix(),
            kind.extension()
        ))
    }
}

/// The artifacts a run can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Counts,
    Annotated,
    Instances,
}

impl OutputKind {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Counts => "counts",
            Self::Annotated => "annotated",
            Self::Instances => "instances",
        }
    }

    const fn extension(self) -> &'static str {
        match self {
            Self::Counts => "json",
            Self::Annotated | Self::Instances => "geojson",
        }
    }
}

/// `counts.json` -> `counts.name-type.json`.
fn with_mode_tag(path: &Path, mode: GroupingMode) -> PathBuf {
    let stem = path
        .file_stem()
        .map_or_else(|| "counts".into(), |s| s.to_string_lossy());
    let extension = path
        .extension()
        .map_or_else(|| "json".into(), |s| s.to_string_lossy());
    path.with_file_name(format!("{stem}.{mode}.{extension}"))
}

/// Segments ready for clustering.
pub struct Prepared {
    pub segments: Vec<RoadSegment>,
    pub report: FilterReport,
}

/// Loads the input and filters it down to countable streets.
///
/// A registered city's LGA list scopes the segments unless the options
/// already name valid areas.
///
/// # Errors
///
/// Returns an error if the input file cannot be loaded.
pub fn load_and_preprocess(
    input: &ResolvedInput,
    options: &PreprocessOptions,
) -> Result<Prepared, Box<dyn std::error::Error>> {
    log::info!("Loading {} from {}", input.label(), input.path.display());
    let raw = load_segments(&input.path)?;

    let mut options = options.clone();
    if options.valid_areas.is_empty()
        && let Some(city) = &input.city
    {
        options.valid_areas.clone_from(&city.lgas);
    }

    let Preprocessed { segments, report } = preprocess(raw, &options);
    log::info!(
        "{}: kept {} of {} segments",
        input.label(),
        report.kept,
        report.input
    );

    Ok(Prepared { segments, report })
}

/// Clusters with an `indicatif` progress bar.
#[must_use]
pub fn run_cluster(
    multi: &MultiProgress,
    segments: &[RoadSegment],
    mode: GroupingMode,
    config: &ClusterConfig,
) -> ClusterOutput {
    let progress = IndicatifProgress::keys_bar(multi, &format!("Grouping by {mode}"));
    cluster_with_progress(segments, mode, config, progress.as_ref())
}

/// The `n` largest counts, highest first, ties broken alphabetically.
#[must_use]
pub fn top_counts(counts: &NameCount, n: usize) -> Vec<(&str, usize)> {
    let mut entries: Vec<(&str, usize)> = counts
        .iter()
        .map(|(key, &count)| (key.as_str(), count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries.truncate(n);
    entries
}

/// Prints a ranked count table to stdout.
pub fn print_counts(entries: &[(&str, usize)]) {
    for (rank, (key, count)) in entries.iter().enumerate() {
        println!("{:>4}. {count:>5}  {key}", rank + 1);
    }
}
