#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output files derived from a clustering pass.
//!
//! Three artifacts are produced per city and grouping mode:
//!
//! - a counts JSON document mapping each display key to its number of
//!   distinct street instances ([`counts`]),
//! - the input segments as `GeoJSON` annotated with `_instanceId` and
//!   `_totalInstances` ([`annotate`]),
//! - a compact `GeoJSON` with one `MultiLineString` feature per street
//!   instance ([`instances`]).

pub mod annotate;
pub mod counts;
pub mod instances;

use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Errors that can occur while writing output files.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// I/O error (directory creation, file write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Returns the default data directory (`data/` at the workspace root).
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR` so paths are
/// always relative to the project root regardless of the caller's
/// working directory.
///
/// # Panics
///
/// Panics if the project root cannot be resolved from `CARGO_MANIFEST_DIR`.
#[must_use]
pub fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .join("data")
}

/// Serializes `value` as compact JSON to `path`, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns [`GenerateError`] if the directory cannot be created, the file
/// cannot be written, or serialization fails.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;

    log::info!("Wrote {}", path.display());
    Ok(())
}
