//! Interactive menu.
//!
//! Picks a city (or any `GeoJSON` file), loads it once into a
//! [`ClusterSession`] and then lets the user switch grouping modes, tune
//! the cell size, look up names and write outputs. Each mode is clustered
//! at most once per configuration.

use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input, Select};
use street_names_cli_utils::MultiProgress;
use street_names_cluster::ClusterConfig;
use street_names_cluster::session::ClusterSession;
use street_names_generate::annotate::write_annotated;
use street_names_generate::counts::write_counts;
use street_names_generate::instances::write_instances;
use street_names_source::registry::all_cities;
use street_names_street_models::{ClusterOutput, GroupingMode};

use crate::config::FileConfig;
use crate::pipeline::{self, OutputKind, ResolvedInput, load_and_preprocess, run_cluster};

/// Actions offered once a city is loaded.
enum Action {
    ShowTop,
    LookUp,
    ChangeMode,
    ChangeCellSize,
    WriteOutputs,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ShowTop,
        Self::LookUp,
        Self::ChangeMode,
        Self::ChangeCellSize,
        Self::WriteOutputs,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ShowTop => "Show most repeated names",
            Self::LookUp => "Look up a name",
            Self::ChangeMode => "Change grouping mode",
            Self::ChangeCellSize => "Change cell size",
            Self::WriteOutputs => "Write output files",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if user input, loading or writing fails.
pub fn run(
    multi: &MultiProgress,
    file_config: &FileConfig,
    data_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Street Names");
    println!();

    let input = select_input(data_dir)?;

    let mut options = file_config.preprocess.clone();
    options.normalize_capitalization = Confirm::new()
        .with_prompt("Normalize name capitalization?")
        .default(options.normalize_capitalization)
        .interact()?;

    let prepared = load_and_preprocess(&input, &options)?;
    println!(
        "{}: {} streets kept, {} segments dropped",
        input.label(),
        prepared.report.kept,
        prepared.report.dropped()
    );

    let mut session = ClusterSession::new(prepared.segments, file_config.cluster);
    let mut mode = GroupingMode::default();

    loop {
        let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
        let idx = Select::new()
            .with_prompt(format!(
                "{} [{mode}, cell {}]",
                input.label(),
                session.config().cell_size_degrees
            ))
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::ShowTop => {
                let n: usize = Input::new()
                    .with_prompt("How many?")
                    .default(20)
                    .interact_text()?;
                let output = clustered(&mut session, multi, mode);
                pipeline::print_counts(&pipeline::top_counts(&output.counts, n));
            }
            Action::LookUp => {
                let name: String = Input::new().with_prompt("Name").interact_text()?;
                let output = clustered(&mut session, multi, mode);
                print_lookup(output, name.trim());
            }
            Action::ChangeMode => {
                let modes = GroupingMode::all();
                let labels: Vec<String> = modes.iter().map(ToString::to_string).collect();
                let current = modes.iter().position(|m| *m == mode).unwrap_or(0);
                let idx = Select::new()
                    .with_prompt("Group segments by")
                    .items(&labels)
                    .default(current)
                    .interact()?;
                mode = modes[idx];
            }
            Action::ChangeCellSize => {
                let cell_size: f64 = Input::new()
                    .with_prompt("Cell size in degrees")
                    .default(session.config().cell_size_degrees)
                    .interact_text()?;
                session.set_config(ClusterConfig::with_cell_size(cell_size));
            }
            Action::WriteOutputs => {
                let output = clustered(&mut session, multi, mode).clone();
                let config = *session.config();

                write_counts(
                    &input.default_output(OutputKind::Counts, mode),
                    &output,
                    &config,
                )?;
                write_annotated(
                    &input.default_output(OutputKind::Annotated, mode),
                    session.segments(),
                    &output,
                )?;
                write_instances(
                    &input.default_output(OutputKind::Instances, mode),
                    session.segments(),
                    &output,
                )?;
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

fn select_input(data_dir: &Path) -> Result<ResolvedInput, Box<dyn std::error::Error>> {
    let cities = all_cities();
    let mut labels: Vec<String> = cities
        .iter()
        .map(|city| format!("{} ({})", city.name(), city.state))
        .collect();
    labels.push("Other GeoJSON file...".to_string());

    let idx = Select::new()
        .with_prompt("Which city?")
        .items(&labels)
        .default(0)
        .interact()?;

    if let Some(city) = cities.into_iter().nth(idx) {
        return Ok(ResolvedInput::for_city(city, data_dir));
    }

    let path: String = Input::new()
        .with_prompt("Path to street segment GeoJSON")
        .interact_text()?;
    Ok(ResolvedInput::for_file(PathBuf::from(path.trim())))
}

/// Returns the session's result for `mode`, clustering with a progress
/// bar on a cache miss.
fn clustered<'a>(
    session: &'a mut ClusterSession,
    multi: &MultiProgress,
    mode: GroupingMode,
) -> &'a ClusterOutput {
    if session.cached(mode).is_none() {
        let ticket = session.begin(mode);
        let output = run_cluster(multi, session.segments(), mode, session.config());
        if !session.complete(ticket, output) {
            log::warn!("Discarded stale {mode} result; clustering again");
        }
    }
    session.output(mode)
}

fn print_lookup(output: &ClusterOutput, name: &str) {
    let Some((key, count)) = output
        .counts
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
    else {
        println!("No {} key matches '{name}'", output.mode);
        return;
    };

    println!("{key}: {count} instance(s)");
    for instance in output.instances_for(key) {
        let suffix = if instance.always_singular {
            " (highway, counted once)"
        } else {
            ""
        };
        println!(
            "  #{} - {} segment(s){suffix}",
            instance.id + 1,
            instance.segments.len()
        );
    }
}
