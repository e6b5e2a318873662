//! Events emitted by the widgets and filter controls.

use std::sync::Arc;

use incident_map_incident_models::{Incident, SelectedPlace};

use crate::map::MarkerId;

/// Which date input a [`Event::DateInput`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateControl {
    /// Incident-date range start.
    IncidentStart,
    /// Incident-date range end.
    IncidentEnd,
    /// Report-date range start.
    ReportStart,
    /// Report-date range end.
    ReportEnd,
}

/// A user or lifecycle event fed into [`crate::Session::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The dataset finished loading (or was replaced).
    DatasetLoaded(Arc<[Incident]>),
    /// A date input changed. `value` is the raw calendar-input text; an
    /// empty string clears the bound.
    DateInput {
        /// Control that changed.
        control: DateControl,
        /// Raw input value.
        value: String,
    },
    /// A category checkbox changed.
    CategoryToggled {
        /// Category label.
        label: String,
        /// New checked state.
        checked: bool,
    },
    /// Every filter was reset.
    ClearFilters,
    /// A marker was clicked.
    MarkerClicked(MarkerId),
    /// The map background was clicked.
    MapClicked,
    /// The info window's close button was clicked.
    InfoWindowClosed,
    /// The search widget resolved a place.
    PlaceResolved(SelectedPlace),
    /// The search box was cleared.
    SearchCleared,
}
