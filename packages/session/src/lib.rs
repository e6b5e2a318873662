#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interaction layer for the incident map.
//!
//! Holds the loaded dataset, filter predicates, search result, and info
//! window state in a single [`Session`]. Widgets feed [`Event`]s in and get
//! [`MapCommand`]s back, which a [`MapWidget`] implementation applies to the
//! actual map.

pub mod config;
pub mod event;
pub mod info;
pub mod map;
pub mod session;

pub use config::{BoundingBox, ConfigError, MapConfig};
pub use event::{DateControl, Event};
pub use info::{incident_info, place_info};
pub use map::{InfoRow, InfoWindowContent, MapCommand, MapWidget, MarkerId, apply_all};
pub use session::{DerivationStats, Session, Taxonomy, ViewState};
