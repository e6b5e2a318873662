#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Severity and color classification for incident categories.
//!
//! Offense category labels in the dataset are free text drawn from a small,
//! not entirely clean vocabulary. This crate maps each label to a keyword
//! [`Tier`] which fixes its [`SeverityLevel`] and display color, derives the
//! ordered category list for the legend, and builds the category color map
//! used when rendering markers.

pub mod categories;
pub mod severity;
pub mod tiers;

pub use categories::{CategoryColorMap, LegendEntry, build_legend, derive_categories};
pub use severity::{DEFAULT_COLOR, SeverityLevel, Tier};
pub use tiers::{Classification, Classifier, KeywordTiers, TierOverride};

/// Errors that can occur while loading keyword configuration.
#[derive(Debug, thiserror::Error)]
pub enum TiersError {
    /// Reading the configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
