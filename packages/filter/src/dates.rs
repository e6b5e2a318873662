//! Date parsing for incident and report dates.
//!
//! Every parser here is total: it returns `None` for anything it cannot turn
//! into a real calendar date and never panics. A `None` date is excluded from
//! any active date-range filter.
//!
//! All parsed dates are anchored at UTC midnight.

use chrono::{DateTime, Datelike as _, NaiveDate, Utc};

/// Earliest accepted year.
pub const MIN_YEAR: i32 = 1900;
/// Latest accepted year.
pub const MAX_YEAR: i32 = 3000;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parses an incident date in `M/D/YYYY` form.
///
/// Rejects input that is not exactly three numeric components, any
/// component out of range, and any day that does not exist in the given
/// month (e.g. `2/30/2024`).
#[must_use]
pub fn parse_incident_date(s: &str) -> Option<DateTime<Utc>> {
    let parsed = parse_month_day_year(s);
    if parsed.is_none() {
        log::debug!("Unparseable incident date: {s:?}");
    }
    parsed
}

/// Parses a report-date slug such as `"april-07-2025"`.
///
/// The month may be a full name or a three-letter abbreviation, in any case.
#[must_use]
pub fn parse_report_date_slug(s: &str) -> Option<DateTime<Utc>> {
    let lower = s.trim().to_lowercase();
    let parsed = match lower.split('-').collect::<Vec<_>>().as_slice() {
        [month, day, year] => month_from_name(month).and_then(|month| {
            let day = parse_component(day)?;
            let year = i32::try_from(parse_component(year)?).ok()?;
            calendar_date(year, month, day)
        }),
        _ => None,
    };
    if parsed.is_none() {
        log::debug!("Unparseable report date slug: {s:?}");
    }
    parsed
}

/// Parses a human-formatted report date.
///
/// Accepts `"April 7, 2025"`, `"Apr 07, 2025"`, `"April 7 2025"`, and the
/// numeric `M/D/YYYY` form.
#[must_use]
pub fn parse_report_date(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    let parsed = parse_month_day_year(trimmed).or_else(|| {
        ["%B %d, %Y", "%B %d %Y"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .and_then(|date| calendar_date(date.year(), date.month(), date.day()))
    });
    if parsed.is_none() {
        log::debug!("Unparseable report date: {s:?}");
    }
    parsed
}

/// Parses a filter-control date in calendar-input form (`YYYY-MM-DD`).
#[must_use]
pub fn parse_control_date(s: &str) -> Option<DateTime<Utc>> {
    let parsed = parse_year_month_day(s);
    if parsed.is_none() {
        log::debug!("Unparseable filter date: {s:?}");
    }
    parsed
}

fn parse_year_month_day(s: &str) -> Option<DateTime<Utc>> {
    match s.trim().split('-').collect::<Vec<_>>().as_slice() {
        [year, month, day] => {
            let year = i32::try_from(parse_component(year)?).ok()?;
            calendar_date(year, parse_component(month)?, parse_component(day)?)
        }
        _ => None,
    }
}

fn parse_month_day_year(s: &str) -> Option<DateTime<Utc>> {
    match s.trim().split('/').collect::<Vec<_>>().as_slice() {
        [month, day, year] => {
            let month = parse_component(month)?;
            let day = parse_component(day)?;
            let year = i32::try_from(parse_component(year)?).ok()?;
            calendar_date(year, month, day)
        }
        _ => None,
    }
}

/// Parses one all-digit date component. Signs, spaces, and empty strings are
/// rejected.
fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn month_from_name(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|full| *full == name || (name.len() == 3 && full.starts_with(name)))
        .and_then(|idx| u32::try_from(idx + 1).ok())
}

/// Builds a UTC-midnight date, rejecting out-of-range components and any
/// date that does not read back as the same year, month, and day.
fn calendar_date(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year)
        || !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
    {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    if (date.year(), date.month(), date.day()) != (year, month, day) {
        return None;
    }

    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}
