#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client-side filtering of loaded police incidents.
//!
//! [`filter_incidents`] applies a [`FilterPredicates`] conjunction to an
//! incident slice, keeping the original order. Dates that cannot be parsed
//! never match an active date range, so malformed data is under-included
//! rather than silently shown.

pub mod dates;
pub mod predicates;

use chrono::{DateTime, Utc};
use incident_map_incident_models::Incident;

pub use dates::{
    parse_control_date, parse_incident_date, parse_report_date, parse_report_date_slug,
};
pub use predicates::{DateBound, DateRange, FilterPredicates};

/// Resolves the publication date of the report an incident came from.
///
/// Prefers the human-formatted `police_record_date` and falls back to the
/// `report_date_slug` when that is absent or unparseable.
#[must_use]
pub fn resolve_report_date(incident: &Incident) -> Option<DateTime<Utc>> {
    incident
        .police_record_date
        .as_deref()
        .and_then(parse_report_date)
        .or_else(|| {
            incident
                .report_date_slug
                .as_deref()
                .and_then(parse_report_date_slug)
        })
}

/// Returns whether a single incident satisfies every active predicate group.
#[must_use]
pub fn matches(incident: &Incident, predicates: &FilterPredicates) -> bool {
    if !predicates.admits_category(incident.category()) {
        return false;
    }
    if predicates.incident_dates.is_active()
        && !predicates
            .incident_dates
            .admits(parse_incident_date(&incident.date))
    {
        return false;
    }
    if predicates.report_dates.is_active()
        && !predicates.report_dates.admits(resolve_report_date(incident))
    {
        return false;
    }
    true
}

/// Returns the indices of incidents that satisfy `predicates`, in order.
#[must_use]
pub fn filter_indices(incidents: &[Incident], predicates: &FilterPredicates) -> Vec<usize> {
    incidents
        .iter()
        .enumerate()
        .filter(|(_, incident)| matches(incident, predicates))
        .map(|(idx, _)| idx)
        .collect()
}

/// Returns the incidents that satisfy `predicates`, preserving their
/// relative order.
#[must_use]
pub fn filter_incidents(incidents: &[Incident], predicates: &FilterPredicates) -> Vec<Incident> {
    incidents
        .iter()
        .filter(|incident| matches(incident, predicates))
        .cloned()
        .collect()
}
