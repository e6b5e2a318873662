#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Police incident record types.
//!
//! An [`Incident`] is one entry from a published police report log, already
//! geocoded by the offline pipeline that builds the dataset. Records are
//! created once when the dataset loads and are never mutated afterwards.

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// How the geocoder interpreted an incident's raw location string.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LocationInterpretation {
    /// A single street address.
    SpecificAddress,
    /// Two crossing streets.
    Intersection,
    /// A road or highway without a specific point.
    Route,
    /// A neighborhood, park, or other broad area.
    GeneralArea,
    /// Anything the geocoder could not classify.
    #[default]
    #[serde(other)]
    Unrecognized,
}

impl LocationInterpretation {
    /// Returns a human-readable label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SpecificAddress => "Specific address",
            Self::Intersection => "Intersection",
            Self::Route => "Route",
            Self::GeneralArea => "General area",
            Self::Unrecognized => "Unrecognized",
        }
    }
}

/// A single police incident as published in the static dataset.
///
/// Only `case_number` and the coordinates are required; every other field
/// defaults when absent so a sparse record still renders on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Incident {
    /// Unique case identifier from the report log.
    pub case_number: String,
    /// Incident date as printed in the log (`M/D/YYYY`).
    #[serde(default)]
    pub date: String,
    /// Time-of-day code (`HHMM` without separators, e.g. `1415`).
    #[serde(default, deserialize_with = "deserialize_time_code")]
    pub time: Option<u32>,
    /// Fine-grained offense description.
    #[serde(default)]
    pub offense_type: String,
    /// Coarse offense category label.
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub offense_category: Option<String>,
    /// Raw location string from the log.
    #[serde(default)]
    pub location: String,
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
    /// Address returned by the geocoder.
    #[serde(default)]
    pub formatted_address: String,
    /// Link to the location on the external map service.
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub maps_url: Option<String>,
    /// Place type reported by the geocoder (e.g. `"premise"`, `"route"`).
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub place_type: Option<String>,
    /// How the raw location string was interpreted.
    #[serde(default)]
    pub location_interpretation: LocationInterpretation,
    /// Report-date slug of the source log document (e.g. `"april-07-2025"`).
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub report_date_slug: Option<String>,
    /// Human-formatted report date of the source log document.
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub police_record_date: Option<String>,
}

impl Incident {
    /// Returns the incident's map position.
    #[must_use]
    pub const fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Returns the trimmed category label, or `None` when it is missing or
    /// blank.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.offense_category
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }

    /// Formats the time-of-day code as `HH:MM`.
    ///
    /// Codes that are not a valid 24-hour time are returned unformatted.
    /// Returns `None` when the record has no time.
    #[must_use]
    pub fn formatted_time(&self) -> Option<String> {
        let code = self.time?;
        let (hours, minutes) = (code / 100, code % 100);
        if hours < 24 && minutes < 60 {
            Some(format!("{hours:02}:{minutes:02}"))
        } else {
            Some(code.to_string())
        }
    }
}

/// A place resolved by the address search widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedPlace {
    /// Display name of the place (business or landmark name, or the query).
    pub name: String,
    /// Full formatted address.
    pub formatted_address: String,
    /// Resolved coordinate.
    pub position: LatLng,
}

/// Accepts the time code as a JSON number or a numeric string; anything else
/// becomes `None`.
fn deserialize_time_code<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Number(u32),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<RawTime>::deserialize(deserializer)? {
        Some(RawTime::Number(code)) => Some(code),
        Some(RawTime::Text(text)) => text.trim().parse().ok(),
        Some(RawTime::Other(_)) | None => None,
    })
}

/// Accepts a JSON string; numbers, booleans, arrays, and objects become
/// `None` instead of failing the whole record.
fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawText {
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<RawText>::deserialize(deserializer)? {
        Some(RawText::Text(text)) => Some(text),
        Some(RawText::Other(_)) | None => None,
    })
}
