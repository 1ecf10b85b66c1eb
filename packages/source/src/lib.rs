#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Street segment sources.
//!
//! Loads named road geometries from `GeoJSON` files into [`RoadSegment`]s
//! and exposes the registry of capital cities, each defined as a TOML file
//! embedded at compile time.
//!
//! [`RoadSegment`]: street_names_street_models::RoadSegment

pub mod load;
pub mod registry;

/// Errors that can occur while loading street data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a usable feature collection.
    #[error("Invalid GeoJSON document: {message}")]
    InvalidDocument {
        /// Description of what went wrong.
        message: String,
    },
}
