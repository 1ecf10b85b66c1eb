#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street instance counter for Australian capital cities.
//!
//! Loads a city's named road segments, drops non-street entities, groups
//! same-named segments into distinct physical streets and writes the
//! per-name counts (plus optional annotated and per-instance `GeoJSON`).
//!
//! Run without a subcommand for an interactive menu.
//!
//! Uses `indicatif-log-bridge` (via [`street_names_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod config;
mod interactive;
mod pipeline;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use street_names_cli_utils::MultiProgress;
use street_names_generate::annotate::write_annotated;
use street_names_generate::counts::write_counts;
use street_names_generate::instances::write_instances;
use street_names_naming::categories::{Category, categorize};
use street_names_source::registry::all_cities;
use street_names_street_models::{ClusterOutput, GroupingMode};

use crate::config::FileConfig;
use crate::pipeline::{OutputKind, ResolvedInput, load_and_preprocess, run_cluster};

#[derive(Parser)]
#[command(
    name = "street_names",
    about = "Count distinct street instances by name"
)]
struct Cli {
    /// TOML config file with `[cluster]` and `[preprocess]` tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory registry data files are resolved against
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write per-name instance counts as JSON
    Count {
        #[command(flatten)]
        input: InputArgs,

        /// Output path (defaults to the city's counts file)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also print the N most repeated names
        #[arg(long)]
        top: Option<usize>,
    },
    /// Write the input segments annotated with instance IDs
    Annotate {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write one merged feature per street instance
    Instances {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print every counted name, optionally filtered by category
    Names {
        #[command(flatten)]
        input: InputArgs,

        /// trees, royalty, famous or suburbs
        #[arg(long)]
        category: Option<Category>,
    },
    /// List registered cities
    Cities,
}

#[derive(Args)]
struct InputArgs {
    /// City ID from the registry (see `cities`)
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    city: Option<String>,

    /// Street segment `GeoJSON` file
    #[arg(long)]
    input: Option<PathBuf>,

    /// Grouping mode: name-type, name-only or type
    #[arg(long, default_value_t = GroupingMode::NameType)]
    mode: GroupingMode,

    /// Grid cell size in degrees
    #[arg(long)]
    cell_size: Option<f64>,

    /// Fix name capitalization before counting
    #[arg(long)]
    normalize_names: bool,
}

/// Everything a subcommand needs after loading and clustering.
struct Run {
    input: ResolvedInput,
    config: FileConfig,
    segments: Vec<street_names_street_models::RoadSegment>,
    output: ClusterOutput,
}

impl Run {
    fn execute(
        args: &InputArgs,
        file_config: &FileConfig,
        data_dir: &Path,
        multi: &MultiProgress,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let input = ResolvedInput::resolve(args.city.as_deref(), args.input.as_deref(), data_dir)?;
        let config = file_config
            .clone()
            .with_overrides(args.cell_size, args.normalize_names);

        let prepared = load_and_preprocess(&input, &config.preprocess)?;
        let output = run_cluster(multi, &prepared.segments, args.mode, &config.cluster);

        Ok(Self {
            input,
            config,
            segments: prepared.segments,
            output,
        })
    }

    fn output_path(&self, explicit: Option<PathBuf>, kind: OutputKind) -> PathBuf {
        explicit.unwrap_or_else(|| self.input.default_output(kind, self.output.mode))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = street_names_cli_utils::init_logger();
    let cli = Cli::parse();

    let file_config = FileConfig::load(cli.config.as_deref())?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(street_names_generate::data_dir);

    let Some(command) = cli.command else {
        return interactive::run(&multi, &file_config, &data_dir);
    };

    match command {
        Commands::Count { input, output, top } => {
            let run = Run::execute(&input, &file_config, &data_dir, &multi)?;
            let path = run.output_path(output, OutputKind::Counts);
            write_counts(&path, &run.output, &run.config.cluster)?;

            if let Some(n) = top {
                pipeline::print_counts(&pipeline::top_counts(&run.output.counts, n));
            }
        }
        Commands::Annotate { input, output } => {
            let run = Run::execute(&input, &file_config, &data_dir, &multi)?;
            let path = run.output_path(output, OutputKind::Annotated);
            write_annotated(&path, &run.segments, &run.output)?;
        }
        Commands::Instances { input, output } => {
            let run = Run::execute(&input, &file_config, &data_dir, &multi)?;
            let path = run.output_path(output, OutputKind::Instances);
            write_instances(&path, &run.segments, &run.output)?;
        }
        Commands::Names { input, category } => {
            let run = Run::execute(&input, &file_config, &data_dir, &multi)?;
            print_names(&run.output, category);
        }
        Commands::Cities => print_cities(),
    }

    Ok(())
}

fn print_names(output: &ClusterOutput, category: Option<Category>) {
    let mut shown = 0_usize;
    for (key, count) in &output.counts {
        if category.is_some_and(|c| !c.matches(key)) {
            continue;
        }

        let tags = categorize(key)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        if tags.is_empty() {
            println!("{key} ({count})");
        } else {
            println!("{key} ({count}) [{tags}]");
        }
        shown += 1;
    }

    log::info!("{shown} of {} names shown", output.counts.len());
}

fn print_cities() {
    for city in all_cities() {
        let scope = if city.scopes_by_area() {
            format!("{} LGAs", city.lgas.len())
        } else {
            "unscoped".to_string()
        };
        println!(
            "{:<10} {:<10} {:<4} {scope}",
            city.id(),
            city.name(),
            city.state
        );
    }
}
