//! Optional TOML run configuration.
//!
//! ```toml
//! [cluster]
//! cell_size_degrees = 0.002
//!
//! [preprocess]
//! valid_areas = ["sydney", "parramatta"]
//! normalize_capitalization = true
//! ```
//!
//! Command-line flags take precedence over values read from the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use street_names_cluster::ClusterConfig;
use street_names_preprocess::PreprocessOptions;

/// Errors that can occur while loading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Contents of a config file. Missing tables and keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub cluster: ClusterConfig,
    pub preprocess: PreprocessOptions,
}

impl FileConfig {
    /// Parses config file contents.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is not a valid config.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Loads `path`, or returns the defaults when no path was given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text)?;
        log::debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Applies command-line overrides on top of the file values.
    #[must_use]
    pub fn with_overrides(mut self, cell_size: Option<f64>, normalize_names: bool) -> Self {
        if let Some(cell_size) = cell_size {
            self.cluster.cell_size_degrees = cell_size;
        }
        if normalize_names {
            self.preprocess.normalize_capitalization = true;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use street_names_cluster::DEFAULT_CELL_SIZE_DEGREES;

    #[test]
    fn empty_file_gives_defaults() {
        let config = FileConfig::parse("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!((config.cluster.cell_size_degrees - DEFAULT_CELL_SIZE_DEGREES).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_both_tables() {
        let config = FileConfig::parse(
            r#"
            [cluster]
            cell_size_degrees = 0.001

            [preprocess]
            valid_areas = ["sydney", "parramatta"]
            normalize_capitalization = true
            "#,
        )
        .unwrap();

        assert!((config.cluster.cell_size_degrees - 0.001).abs() < f64::EPSILON);
        assert_eq!(config.preprocess.valid_areas, vec!["sydney", "parramatta"]);
        assert!(config.preprocess.normalize_capitalization);
    }

    #[test]
    fn rejects_unknown_tables() {
        let err = FileConfig::parse("[server]\nport = 8080\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FileConfig::load(Some(Path::new("/nonexistent/street_names.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/street_names.toml"));
    }

    #[test]
    fn flags_override_file_values() {
        let config = FileConfig::parse("[cluster]\ncell_size_degrees = 0.001\n")
            .unwrap()
            .with_overrides(Some(0.004), true);

        assert!((config.cluster.cell_size_degrees - 0.004).abs() < f64::EPSILON);
        assert!(config.preprocess.normalize_capitalization);

        let unchanged = FileConfig::default().with_overrides(None, false);
        assert_eq!(unchanged, FileConfig::default());
    }
}
