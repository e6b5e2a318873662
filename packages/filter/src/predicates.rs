//! Filter predicate state.
//!
//! [`FilterPredicates`] is a conjunction of independent, optional groups: an
//! incident-date range, a report-date range, and a category selection. A
//! group with nothing set places no restriction on incidents.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::dates::parse_control_date;

/// One end of a date range as entered in a filter control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateBound {
    /// A valid calendar date.
    Date(DateTime<Utc>),
    /// Input that was entered but could not be parsed.
    ///
    /// Keeps its range active and excludes every incident from it.
    Malformed(String),
}

impl DateBound {
    /// Interprets a raw calendar-input value (`YYYY-MM-DD`).
    ///
    /// Returns `None` for blank input, which clears the bound.
    #[must_use]
    pub fn from_control_input(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(parse_control_date(trimmed).map_or_else(
            || {
                log::warn!("Malformed filter date {trimmed:?}, range excludes every incident");
                Self::Malformed(trimmed.to_string())
            },
            Self::Date,
        ))
    }

    /// Returns the parsed date, if valid.
    #[must_use]
    pub const fn date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(date) => Some(*date),
            Self::Malformed(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for DateBound {
    fn from(date: DateTime<Utc>) -> Self {
        Self::Date(date)
    }
}

/// An inclusive date range with optional ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Earliest date retained (inclusive).
    pub start: Option<DateBound>,
    /// Latest date retained (inclusive).
    pub end: Option<DateBound>,
}

impl DateRange {
    /// Returns `true` if either end is set.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Returns whether an incident with the given resolved date passes this
    /// range.
    ///
    /// An inactive range admits everything. An active range rejects a
    /// missing date and rejects everything if either bound is malformed.
    #[must_use]
    pub fn admits(&self, date: Option<DateTime<Utc>>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };

        let after_start = match &self.start {
            None => true,
            Some(DateBound::Date(start)) => date >= *start,
            Some(DateBound::Malformed(_)) => false,
        };
        let before_end = match &self.end {
            None => true,
            Some(DateBound::Date(end)) => date <= *end,
            Some(DateBound::Malformed(_)) => false,
        };

        after_start && before_end
    }
}

/// The full set of user-selected filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicates {
    /// Range over the date the incident occurred.
    pub incident_dates: DateRange,
    /// Range over the publication date of the source report.
    pub report_dates: DateRange,
    /// Selected category labels. Empty means every category passes.
    pub categories: BTreeSet<String>,
}

impl FilterPredicates {
    /// Returns predicates that restrict nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no predicate group is active.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        !self.incident_dates.is_active()
            && !self.report_dates.is_active()
            && self.categories.is_empty()
    }

    /// Returns whether `label` passes the category selection.
    #[must_use]
    pub fn admits_category(&self, label: Option<&str>) -> bool {
        self.categories.is_empty() || label.is_some_and(|label| self.categories.contains(label))
    }

    /// Adds or removes a category from the selection.
    pub fn set_category(&mut self, label: &str, checked: bool) {
        let label = label.trim();
        if label.is_empty() {
            return;
        }
        if checked {
            self.categories.insert(label.to_string());
        } else {
            self.categories.remove(label);
        }
    }

    /// Sets the incident-date start from raw control input.
    #[must_use]
    pub fn with_incident_start(mut self, raw: &str) -> Self {
        self.incident_dates.start = DateBound::from_control_input(raw);
        self
    }

    /// Sets the incident-date end from raw control input.
    #[must_use]
    pub fn with_incident_end(mut self, raw: &str) -> Self {
        self.incident_dates.end = DateBound::from_control_input(raw);
        self
    }

    /// Sets the report-date start from raw control input.
    #[must_use]
    pub fn with_report_start(mut self, raw: &str) -> Self {
        self.report_dates.start = DateBound::from_control_input(raw);
        self
    }

    /// Sets the report-date end from raw control input.
    #[must_use]
    pub fn with_report_end(mut self, raw: &str) -> Self {
        self.report_dates.end = DateBound::from_control_input(raw);
        self
    }

    /// Adds categories to the selection.
    #[must_use]
    pub fn with_categories<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for label in labels {
            self.set_category(label.as_ref(), true);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> DateTime<Utc> {
        parse_control_date(raw).unwrap()
    }

    #[test]
    fn blank_control_input_clears_bound() {
        assert_eq!(DateBound::from_control_input(""), None);
        assert_eq!(DateBound::from_control_input("   "), None);
    }

    #[test]
    fn control_input_parses_or_is_malformed() {
        assert_eq!(
            DateBound::from_control_input("2025-02-01"),
            Some(DateBound::Date(date("2025-02-01")))
        );
        assert_eq!(
            DateBound::from_control_input("02/01/2025"),
            Some(DateBound::Malformed("02/01/2025".to_string()))
        );
    }

    #[test]
    fn inactive_range_admits_missing_dates() {
        assert!(DateRange::default().admits(None));
    }

    #[test]
    fn active_range_rejects_missing_dates() {
        let range = DateRange {
            start: Some(date("2025-01-01").into()),
            end: None,
        };
        assert!(!range.admits(None));
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = DateRange {
            start: Some(date("2025-01-01").into()),
            end: Some(date("2025-01-31").into()),
        };
        assert!(range.admits(Some(date("2025-01-01"))));
        assert!(range.admits(Some(date("2025-01-31"))));
        assert!(!range.admits(Some(date("2024-12-31"))));
        assert!(!range.admits(Some(date("2025-02-01"))));
    }

    #[test]
    fn malformed_bound_rejects_everything() {
        let range = DateRange {
            start: None,
            end: Some(DateBound::Malformed("soon".to_string())),
        };
        assert!(range.is_active());
        assert!(!range.admits(Some(date("2025-01-01"))));
        assert!(!range.admits(None));
    }

    #[test]
    fn empty_selection_admits_all_categories() {
        let predicates = FilterPredicates::new();
        assert!(predicates.admits_category(Some("Theft")));
        assert!(predicates.admits_category(None));
    }

    #[test]
    fn selection_restricts_categories() {
        let predicates = FilterPredicates::new().with_categories(["Theft"]);
        assert!(predicates.admits_category(Some("Theft")));
        assert!(!predicates.admits_category(Some("Assault")));
        assert!(!predicates.admits_category(None));
    }

    #[test]
    fn unchecking_last_category_lifts_restriction() {
        let mut predicates = FilterPredicates::new();
        predicates.set_category("Theft", true);
        assert!(!predicates.is_unrestricted());
        predicates.set_category("Theft", false);
        assert!(predicates.is_unrestricted());
        assert!(predicates.admits_category(Some("Assault")));
    }
}
