#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loader for the static incident dataset.
//!
//! The dataset is a JSON array of incident objects produced offline by the
//! report-log scraping and geocoding pipeline. It is read once at startup and
//! held as an immutable, shared slice for the rest of the process. Records
//! that cannot be deserialized are skipped with a warning rather than failing
//! the whole load.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use incident_map_filter::{parse_incident_date, resolve_report_date};
use incident_map_incident_models::Incident;
use serde::{Deserialize, Serialize};

/// Default dataset location relative to the working directory.
pub const DEFAULT_DATASET_PATH: &str = "data/incidents.json";

/// Errors that can occur while loading the dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// I/O error reading the dataset file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is valid but not an incident array.
    #[error("Unexpected dataset shape: {message}")]
    Shape {
        /// Description of what was found instead.
        message: String,
    },
}

/// Top-level JSON layouts accepted for the dataset file.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDataset {
    Array(Vec<serde_json::Value>),
    Wrapped { incidents: Vec<serde_json::Value> },
}

/// Parses incidents from dataset JSON text.
///
/// Accepts either a bare array or an object with an `incidents` array.
///
/// # Errors
///
/// Returns [`DatasetError::Json`] if the text is not JSON, or
/// [`DatasetError::Shape`] if it holds no incident array.
pub fn parse_incidents(text: &str) -> Result<Vec<Incident>, DatasetError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let records = match serde_json::from_value::<RawDataset>(value) {
        Ok(RawDataset::Array(records) | RawDataset::Wrapped { incidents: records }) => records,
        Err(e) => {
            return Err(DatasetError::Shape {
                message: e.to_string(),
            });
        }
    };

    let total = records.len();
    let mut incidents = Vec::with_capacity(total);
    for (idx, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Incident>(record) {
            Ok(incident) => incidents.push(incident),
            Err(e) => log::warn!("Skipping dataset record {idx}: {e}"),
        }
    }

    if incidents.len() < total {
        log::warn!(
            "Loaded {} of {total} dataset records ({} skipped)",
            incidents.len(),
            total - incidents.len()
        );
    }

    Ok(incidents)
}

/// Reads and parses the dataset file at `path`.
///
/// # Errors
///
/// Returns [`DatasetError::Io`] if the file cannot be read, or any error
/// from [`parse_incidents`].
pub fn load_incidents(path: &Path) -> Result<Arc<[Incident]>, DatasetError> {
    log::info!("Loading incidents from {}...", path.display());
    let text = std::fs::read_to_string(path)?;
    let incidents: Arc<[Incident]> = parse_incidents(&text)?.into();
    log::info!("Loaded {} incidents", incidents.len());
    Ok(incidents)
}

/// Data-quality summary of a loaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    /// Number of incidents.
    pub total: u64,
    /// Incidents with no category label.
    pub uncategorized: u64,
    /// Incidents whose incident date does not parse.
    pub undated: u64,
    /// Incidents with no resolvable report date.
    pub without_report_date: u64,
    /// Earliest parseable incident date.
    pub earliest: Option<DateTime<Utc>>,
    /// Latest parseable incident date.
    pub latest: Option<DateTime<Utc>>,
}

impl DatasetSummary {
    /// Summarizes `incidents`.
    #[must_use]
    pub fn from_incidents(incidents: &[Incident]) -> Self {
        let mut summary = Self::default();
        for incident in incidents {
            summary.total += 1;
            if incident.category().is_none() {
                summary.uncategorized += 1;
            }
            if resolve_report_date(incident).is_none() {
                summary.without_report_date += 1;
            }
            match parse_incident_date(&incident.date) {
                Some(date) => {
                    summary.earliest = Some(summary.earliest.map_or(date, |e| e.min(date)));
                    summary.latest = Some(summary.latest.map_or(date, |l| l.max(date)));
                }
                None => summary.undated += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "case_number": "25-0101",
            "date": "1/15/2025",
            "time": 1415,
            "offense_type": "Petty theft",
            "offense_category": "Theft",
            "location": "100 MAIN ST",
            "lat": 37.77,
            "lng": -122.41,
            "formatted_address": "100 Main St, Springfield",
            "location_interpretation": "specific_address",
            "report_date_slug": "january-16-2025"
        },
        {
            "case_number": "25-0102",
            "date": "2/30/2025",
            "offense_category": "",
            "lat": 37.78,
            "lng": -122.42
        },
        {
            "case_number": "25-0103",
            "lng": -122.43
        }
    ]"#;

    #[test]
    fn parses_bare_array_and_skips_bad_records() {
        let incidents = parse_incidents(SAMPLE).unwrap();
        let cases: Vec<&str> = incidents.iter().map(|i| i.case_number.as_str()).collect();
        assert_eq!(cases, vec!["25-0101", "25-0102"]);
    }

    #[test]
    fn non_string_category_keeps_the_record() {
        let text = r#"[
            {"case_number": "25-0201", "offense_category": 42, "lat": 37.7, "lng": -122.4},
            {"case_number": "25-0202", "offense_category": {"id": 3}, "lat": 37.7, "lng": -122.4}
        ]"#;
        let incidents = parse_incidents(text).unwrap();
        assert_eq!(incidents.len(), 2);
        assert!(incidents.iter().all(|i| i.category().is_none()));
    }

    #[test]
    fn parses_wrapped_object() {
        let text = format!(r#"{{"incidents": {SAMPLE}}}"#);
        assert_eq!(parse_incidents(&text).unwrap().len(), 2);
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(matches!(
            parse_incidents(r#"{"rows": []}"#),
            Err(DatasetError::Shape { .. })
        ));
        assert!(matches!(
            parse_incidents("not json"),
            Err(DatasetError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_incidents(Path::new("definitely/not/here.json")),
            Err(DatasetError::Io(_))
        ));
    }

    #[test]
    fn summarizes_data_quality() {
        let incidents = parse_incidents(SAMPLE).unwrap();
        let summary = DatasetSummary::from_incidents(&incidents);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.uncategorized, 1);
        assert_eq!(summary.undated, 1);
        assert_eq!(summary.without_report_date, 1);
        assert_eq!(summary.earliest, summary.latest);
        assert_eq!(
            summary.earliest.map(|d| d.to_string()),
            Some("2025-01-15 00:00:00 UTC".to_string())
        );
    }
}
