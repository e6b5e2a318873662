//! Info window content for incidents and search results.

use incident_map_filter::resolve_report_date;
use incident_map_incident_models::{Incident, SelectedPlace};

use crate::map::{InfoRow, InfoWindowContent};

/// Builds the info window shown when an incident marker is clicked.
///
/// Empty fields are left out rather than shown blank.
#[must_use]
pub fn incident_info(incident: &Incident, color: &'static str) -> InfoWindowContent {
    let mut rows = Vec::new();
    let mut push = |label: &'static str, value: Option<String>| {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            rows.push(InfoRow { label, value });
        }
    };

    push("Category", incident.category().map(str::to_string));
    push("Case", Some(incident.case_number.clone()));
    push("Date", Some(incident.date.clone()));
    push("Time", incident.formatted_time());
    push("Location", Some(incident.location.clone()));
    push("Address", Some(incident.formatted_address.clone()));
    push(
        "Location type",
        Some(incident.location_interpretation.label().to_string()),
    );
    push("Place type", incident.place_type.clone());
    push("Report date", report_date_display(incident));

    let title = if incident.offense_type.trim().is_empty() {
        incident.category().unwrap_or("Incident").to_string()
    } else {
        incident.offense_type.trim().to_string()
    };

    InfoWindowContent {
        title,
        color: Some(color),
        rows,
        link: incident.maps_url.clone().filter(|url| !url.is_empty()),
    }
}

/// Builds the info window shown for the search-result marker.
#[must_use]
pub fn place_info(place: &SelectedPlace) -> InfoWindowContent {
    let mut rows = Vec::new();
    if !place.formatted_address.trim().is_empty() && place.formatted_address != place.name {
        rows.push(InfoRow {
            label: "Address",
            value: place.formatted_address.clone(),
        });
    }

    InfoWindowContent {
        title: if place.name.trim().is_empty() {
            place.formatted_address.clone()
        } else {
            place.name.clone()
        },
        color: None,
        rows,
        link: None,
    }
}

/// Formats the resolved report date as `"April 7, 2025"`, falling back to
/// the raw human-formatted field when nothing parses.
fn report_date_display(incident: &Incident) -> Option<String> {
    resolve_report_date(incident)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .or_else(|| incident.police_record_date.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_map_incident_models::{LatLng, LocationInterpretation};

    fn incident() -> Incident {
        Incident {
            case_number: "25-0042".to_string(),
            date: "4/5/2025".to_string(),
            time: Some(2305),
            offense_type: "Shoplifting".to_string(),
            offense_category: Some("Theft".to_string()),
            location: "200 BLK MARKET ST".to_string(),
            lat: 37.0,
            lng: -122.0,
            formatted_address: "200 Market St".to_string(),
            maps_url: Some("https://maps.example/?q=200+Market+St".to_string()),
            place_type: None,
            location_interpretation: LocationInterpretation::SpecificAddress,
            report_date_slug: Some("april-07-2025".to_string()),
            police_record_date: None,
        }
    }

    fn row<'a>(content: &'a InfoWindowContent, label: &str) -> Option<&'a str> {
        content
            .rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }

    #[test]
    fn incident_window_lists_fields() {
        let content = incident_info(&incident(), "#fc8d59");
        assert_eq!(content.title, "Shoplifting");
        assert_eq!(content.color, Some("#fc8d59"));
        assert_eq!(row(&content, "Case"), Some("25-0042"));
        assert_eq!(row(&content, "Time"), Some("23:05"));
        assert_eq!(row(&content, "Location type"), Some("Specific address"));
        assert_eq!(row(&content, "Report date"), Some("April 7, 2025"));
        assert_eq!(row(&content, "Place type"), None);
        assert!(content.link.is_some());
    }

    #[test]
    fn unparseable_report_date_shows_raw_text() {
        let mut incident = incident();
        incident.report_date_slug = None;
        incident.police_record_date = Some("Week of April 7".to_string());
        let content = incident_info(&incident, "#636363");
        assert_eq!(row(&content, "Report date"), Some("Week of April 7"));
    }

    #[test]
    fn title_falls_back_to_category() {
        let mut incident = incident();
        incident.offense_type = String::new();
        assert_eq!(incident_info(&incident, "#636363").title, "Theft");
        incident.offense_category = None;
        assert_eq!(incident_info(&incident, "#636363").title, "Incident");
    }

    #[test]
    fn place_window_shows_name_and_address() {
        let place = SelectedPlace {
            name: "City Hall".to_string(),
            formatted_address: "1 Civic Center Plaza".to_string(),
            position: LatLng::new(37.0, -122.0),
        };
        let content = place_info(&place);
        assert_eq!(content.title, "City Hall");
        assert_eq!(row(&content, "Address"), Some("1 Civic Center Plaza"));
    }
}
