//! Map configuration.
//!
//! Values come from an optional TOML file, then environment variables
//! override individual fields. The map service API key is the only required
//! value; without it the map view cannot be shown at all.

use std::path::Path;

use incident_map_incident_models::{Incident, LatLng};
use serde::{Deserialize, Serialize};

/// Environment variable holding the map service API key.
pub const API_KEY_ENV: &str = "INCIDENT_MAP_API_KEY";
/// Environment variable overriding the initial center latitude.
pub const CENTER_LAT_ENV: &str = "INCIDENT_MAP_CENTER_LAT";
/// Environment variable overriding the initial center longitude.
pub const CENTER_LNG_ENV: &str = "INCIDENT_MAP_CENTER_LNG";
/// Environment variable overriding the initial zoom level.
pub const ZOOM_ENV: &str = "INCIDENT_MAP_ZOOM";

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No map service API key was configured.
    #[error("Map API key is missing. Set INCIDENT_MAP_API_KEY to display the map.")]
    MissingApiKey,

    /// I/O error reading the configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment variable held an unusable value.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Value that failed to parse.
        value: String,
    },
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Returns the smallest box containing every incident with finite
    /// coordinates, or `None` if there are none.
    #[must_use]
    pub fn around(incidents: &[Incident]) -> Option<Self> {
        incidents
            .iter()
            .map(Incident::position)
            .filter(|p| p.lat.is_finite() && p.lng.is_finite())
            .fold(None, |acc: Option<Self>, p| {
                Some(acc.map_or_else(
                    || Self::new(p.lng, p.lat, p.lng, p.lat),
                    |b| {
                        Self::new(
                            b.west.min(p.lng),
                            b.south.min(p.lat),
                            b.east.max(p.lng),
                            b.north.max(p.lat),
                        )
                    },
                ))
            })
    }

    /// Returns whether `position` lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, position: LatLng) -> bool {
        (self.south..=self.north).contains(&position.lat)
            && (self.west..=self.east).contains(&position.lng)
    }

    /// Returns the center of the box.
    #[must_use]
    pub const fn center(&self) -> LatLng {
        LatLng::new(
            f64::midpoint(self.south, self.north),
            f64::midpoint(self.west, self.east),
        )
    }
}

/// Configuration for the map view and search widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Map service API key.
    pub api_key: Option<String>,
    /// Initial map center. Defaults to the center of the loaded incidents.
    pub center: Option<LatLng>,
    /// Initial zoom level.
    pub zoom: u8,
    /// Zoom level used when panning to a search result.
    pub search_zoom: u8,
    /// Area that address search results are biased toward. Defaults to the
    /// extent of the loaded incidents.
    pub search_bounds: Option<BoundingBox>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            center: None,
            zoom: 13,
            search_zoom: 16,
            search_bounds: None,
        }
    }
}

impl MapConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text cannot be parsed.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads configuration from an optional file, then applies environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or an
    /// environment override is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                log::info!("Loading map config from {}", path.display());
                Self::from_toml(&std::fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies environment overrides using `lookup` to read variables.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if a numeric override does not
    /// parse.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(API_KEY_ENV) {
            self.api_key = Some(key.trim().to_string());
        }

        let lat: Option<f64> = get(CENTER_LAT_ENV)
            .map(|v| parse_env(CENTER_LAT_ENV, &v))
            .transpose()?;
        let lng: Option<f64> = get(CENTER_LNG_ENV)
            .map(|v| parse_env(CENTER_LNG_ENV, &v))
            .transpose()?;
        match (lat, lng) {
            (Some(lat), Some(lng)) => self.center = Some(LatLng::new(lat, lng)),
            (None, None) => {}
            _ => log::warn!(
                "Ignoring partial center override; set both {CENTER_LAT_ENV} and {CENTER_LNG_ENV}"
            ),
        }

        if let Some(zoom) = get(ZOOM_ENV) {
            self.zoom = parse_env(ZOOM_ENV, &zoom)?;
        }

        Ok(())
    }

    /// Checks that the map can be displayed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] if no usable API key is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(()),
            _ => Err(ConfigError::MissingApiKey),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: value.to_string(),
    })
}
