//! Clustering parameters.

use serde::{Deserialize, Serialize};

/// Default grid cell size in degrees, roughly 200 m at the latitude of
/// the Australian capitals.
pub const DEFAULT_CELL_SIZE_DEGREES: f64 = 0.002;

/// Tunable parameters for [`crate::cluster`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ClusterConfig {
    /// Grid cell size in degrees. Segments closer than one cell always
    /// merge; segments more than two cells apart never merge directly.
    pub cell_size_degrees: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            cell_size_degrees: DEFAULT_CELL_SIZE_DEGREES,
        }
    }
}

impl ClusterConfig {
    /// Creates a config with the given cell size.
    #[must_use]
    pub const fn with_cell_size(cell_size_degrees: f64) -> Self {
        Self { cell_size_degrees }
    }

    /// The cell size actually used. Non-finite or non-positive values
    /// fall back to [`DEFAULT_CELL_SIZE_DEGREES`].
    #[must_use]
    pub fn effective_cell_size(&self) -> f64 {
        if self.cell_size_degrees.is_finite() && self.cell_size_degrees > 0.0 {
            self.cell_size_degrees
        } else {
            log::warn!(
                "Invalid cell size {}, using default {DEFAULT_CELL_SIZE_DEGREES}",
                self.cell_size_degrees
            );
            DEFAULT_CELL_SIZE_DEGREES
        }
    }
}
