//! Commands sent to the external map widget.
//!
//! The session never touches the widget directly. It produces
//! [`MapCommand`] values describing what should change, and the presentation
//! layer applies them to whatever implements [`MapWidget`].

use incident_map_incident_models::LatLng;
use serde::Serialize;

/// Identifies a clickable marker on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum MarkerId {
    /// An incident marker, by index into the loaded dataset.
    Incident(usize),
    /// The single search-result marker.
    SearchResult,
}

/// One labelled row in an info window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoRow {
    /// Row label.
    pub label: &'static str,
    /// Row value.
    pub value: String,
}

/// Structured content for an info window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoWindowContent {
    /// Heading text.
    pub title: String,
    /// Accent color for the heading, if any.
    pub color: Option<&'static str>,
    /// Detail rows in display order.
    pub rows: Vec<InfoRow>,
    /// External link (e.g. to the map service), if any.
    pub link: Option<String>,
}

/// Capabilities the session needs from the map widget.
pub trait MapWidget {
    /// Removes every incident marker.
    fn clear_incident_markers(&mut self);

    /// Adds a filled circle marker for an incident.
    fn add_incident_marker(&mut self, index: usize, position: LatLng, fill_color: &str);

    /// Places the search-result marker, or removes it when `None`.
    fn set_search_marker(&mut self, position: Option<LatLng>);

    /// Opens the info window at `position`, replacing any open one.
    fn open_info_window(&mut self, marker: MarkerId, position: LatLng, content: &InfoWindowContent);

    /// Closes the open info window, if any.
    fn close_info_window(&mut self);

    /// Pans and zooms the map.
    fn pan_to(&mut self, position: LatLng, zoom: u8);
}

/// A single change to apply to the map widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapCommand {
    /// Remove every incident marker.
    ClearIncidentMarkers,
    /// Add an incident marker.
    AddIncidentMarker {
        /// Index into the loaded dataset.
        index: usize,
        /// Marker position.
        position: LatLng,
        /// Fill color.
        color: &'static str,
    },
    /// Set or remove the search-result marker.
    SetSearchMarker {
        /// Marker position, `None` to remove.
        position: Option<LatLng>,
    },
    /// Open an info window.
    OpenInfoWindow {
        /// Marker the window belongs to.
        marker: MarkerId,
        /// Anchor position.
        position: LatLng,
        /// Window content.
        content: InfoWindowContent,
    },
    /// Close the open info window.
    CloseInfoWindow,
    /// Pan and zoom the map.
    PanTo {
        /// Target position.
        position: LatLng,
        /// Target zoom level.
        zoom: u8,
    },
}

impl MapCommand {
    /// Applies this command to `widget`.
    pub fn apply(&self, widget: &mut dyn MapWidget) {
        match self {
            Self::ClearIncidentMarkers => widget.clear_incident_markers(),
            Self::AddIncidentMarker {
                index,
                position,
                color,
            } => widget.add_incident_marker(*index, *position, color),
            Self::SetSearchMarker { position } => widget.set_search_marker(*position),
            Self::OpenInfoWindow {
                marker,
                position,
                content,
            } => widget.open_info_window(*marker, *position, content),
            Self::CloseInfoWindow => widget.close_info_window(),
            Self::PanTo { position, zoom } => widget.pan_to(*position, *zoom),
        }
    }
}

/// Applies every command in order.
pub fn apply_all(commands: &[MapCommand], widget: &mut dyn MapWidget) {
    for command in commands {
        command.apply(widget);
    }
}
