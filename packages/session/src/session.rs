//! The interaction state store.
//!
//! [`Session`] owns the loaded incidents, the current filter predicates, the
//! search result, and which info window is open. Every widget event goes
//! through [`Session::dispatch`], which updates that state and returns the
//! [`MapCommand`]s needed to bring the map back in sync.
//!
//! Derived data is memoized. The category taxonomy (ordered categories,
//! color map, legend) is rebuilt only when the dataset changes; the filtered
//! incident set is rebuilt only when the dataset or the predicates change.

use std::sync::Arc;

use incident_map_classify::{
    CategoryColorMap, Classifier, LegendEntry, build_legend, derive_categories,
};
use incident_map_filter::{DateBound, FilterPredicates, filter_indices};
use incident_map_incident_models::{Incident, LatLng, SelectedPlace};

use crate::config::{BoundingBox, MapConfig};
use crate::event::{DateControl, Event};
use crate::info::{incident_info, place_info};
use crate::map::{MapCommand, MarkerId};

/// Whether the map can be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// The map is available.
    Ready,
    /// The map cannot be shown; the whole view is replaced by `message`.
    Unavailable {
        /// User-facing explanation.
        message: String,
    },
}

/// Category-derived data that only changes with the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    /// Categories ordered by severity, then alphabetically.
    pub categories: Vec<String>,
    /// Color for each category.
    pub colors: CategoryColorMap,
    /// Legend rows in category order.
    pub legend: Vec<LegendEntry>,
}

impl Taxonomy {
    /// Derives the taxonomy for `incidents`.
    #[must_use]
    pub fn build(incidents: &[Incident], classifier: &Classifier) -> Self {
        let categories = derive_categories(incidents, classifier);
        let colors = CategoryColorMap::build(&categories, classifier);
        let legend = build_legend(incidents, &categories, classifier);
        Self {
            categories,
            colors,
            legend,
        }
    }
}

/// How many times each memoized derivation has been recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivationStats {
    /// Taxonomy rebuilds.
    pub taxonomy_builds: u64,
    /// Filter passes.
    pub filter_runs: u64,
}

#[derive(Debug)]
struct FilterMemo {
    generation: u64,
    predicates: FilterPredicates,
    indices: Arc<[usize]>,
}

/// Interaction state for one map view.
#[derive(Debug)]
pub struct Session {
    config: MapConfig,
    view: ViewState,
    classifier: Classifier,
    incidents: Arc<[Incident]>,
    generation: u64,
    predicates: FilterPredicates,
    taxonomy: Option<(u64, Arc<Taxonomy>)>,
    filtered: Option<FilterMemo>,
    search: Option<SelectedPlace>,
    open_window: Option<MarkerId>,
    stats: DerivationStats,
}

impl Session {
    /// Creates a session with no incidents loaded.
    ///
    /// If `config` has no usable API key the session starts in
    /// [`ViewState::Unavailable`] and never emits map commands.
    #[must_use]
    pub fn new(config: MapConfig, classifier: Classifier) -> Self {
        let view = match config.validate() {
            Ok(()) => ViewState::Ready,
            Err(e) => {
                log::error!("Map view unavailable: {e}");
                ViewState::Unavailable {
                    message: e.to_string(),
                }
            }
        };

        Self {
            config,
            view,
            classifier,
            incidents: Arc::from(Vec::new()),
            generation: 0,
            predicates: FilterPredicates::default(),
            taxonomy: None,
            filtered: None,
            search: None,
            open_window: None,
            stats: DerivationStats::default(),
        }
    }

    /// Returns whether the map can be shown.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Returns the loaded incidents.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Returns the current filter predicates.
    #[must_use]
    pub const fn predicates(&self) -> &FilterPredicates {
        &self.predicates
    }

    /// Returns the current search result.
    #[must_use]
    pub const fn search_result(&self) -> Option<&SelectedPlace> {
        self.search.as_ref()
    }

    /// Returns the marker whose info window is open.
    #[must_use]
    pub const fn open_info_window(&self) -> Option<MarkerId> {
        self.open_window
    }

    /// Returns recomputation counters for the memoized derivations.
    #[must_use]
    pub const fn stats(&self) -> DerivationStats {
        self.stats
    }

    /// Returns the initial map center: the configured center, else the
    /// center of the loaded incidents.
    #[must_use]
    pub fn center(&self) -> LatLng {
        self.config
            .center
            .or_else(|| BoundingBox::around(&self.incidents).map(|b| b.center()))
            .unwrap_or(LatLng::new(0.0, 0.0))
    }

    /// Returns the area search results should be biased toward.
    #[must_use]
    pub fn search_bounds(&self) -> Option<BoundingBox> {
        self.config
            .search_bounds
            .or_else(|| BoundingBox::around(&self.incidents))
    }

    /// Returns the category taxonomy, rebuilding it if the dataset changed.
    pub fn taxonomy(&mut self) -> Arc<Taxonomy> {
        let generation = self.generation;
        if let Some((built_for, taxonomy)) = &self.taxonomy
            && *built_for == generation
        {
            return Arc::clone(taxonomy);
        }

        let taxonomy = Arc::new(Taxonomy::build(&self.incidents, &self.classifier));
        self.stats.taxonomy_builds += 1;
        log::info!(
            "Derived {} categories from {} incidents",
            taxonomy.categories.len(),
            self.incidents.len()
        );
        self.taxonomy = Some((generation, Arc::clone(&taxonomy)));
        taxonomy
    }

    /// Returns the dataset indices that pass the current predicates,
    /// refiltering only if the dataset or predicates changed.
    pub fn filtered_indices(&mut self) -> Arc<[usize]> {
        let generation = self.generation;
        if let Some(memo) = &self.filtered
            && memo.generation == generation
            && memo.predicates == self.predicates
        {
            return Arc::clone(&memo.indices);
        }

        let indices: Arc<[usize]> = filter_indices(&self.incidents, &self.predicates).into();
        self.stats.filter_runs += 1;
        log::debug!(
            "Filtered {} of {} incidents",
            indices.len(),
            self.incidents.len()
        );
        self.filtered = Some(FilterMemo {
            generation,
            predicates: self.predicates.clone(),
            indices: Arc::clone(&indices),
        });
        indices
    }

    /// Returns the incidents that pass the current predicates, in dataset
    /// order.
    pub fn filtered_incidents(&mut self) -> Vec<Incident> {
        let indices = self.filtered_indices();
        indices
            .iter()
            .map(|&index| self.incidents[index].clone())
            .collect()
    }

    /// Produces the commands for a full redraw: markers, search marker, any
    /// open info window, and the initial pan.
    pub fn render(&mut self) -> Vec<MapCommand> {
        if self.view != ViewState::Ready {
            return Vec::new();
        }

        let mut commands = self.marker_commands();
        commands.push(MapCommand::SetSearchMarker {
            position: self.search.as_ref().map(|place| place.position),
        });
        if let Some(marker) = self.open_window {
            commands.extend(self.info_window_command(marker));
        }
        commands.push(MapCommand::PanTo {
            position: self.center(),
            zoom: self.config.zoom,
        });
        commands
    }

    /// Applies an event and returns the map changes it causes.
    pub fn dispatch(&mut self, event: Event) -> Vec<MapCommand> {
        let commands = match event {
            Event::DatasetLoaded(incidents) => self.load(incidents),
            Event::DateInput { control, value } => {
                let bound = DateBound::from_control_input(&value);
                let mut next = self.predicates.clone();
                match control {
                    DateControl::IncidentStart => next.incident_dates.start = bound,
                    DateControl::IncidentEnd => next.incident_dates.end = bound,
                    DateControl::ReportStart => next.report_dates.start = bound,
                    DateControl::ReportEnd => next.report_dates.end = bound,
                }
                self.set_predicates(next)
            }
            Event::CategoryToggled { label, checked } => {
                let mut next = self.predicates.clone();
                next.set_category(&label, checked);
                self.set_predicates(next)
            }
            Event::ClearFilters => self.set_predicates(FilterPredicates::default()),
            Event::MarkerClicked(marker) => self.open(marker),
            Event::MapClicked => self.close_window(true),
            Event::InfoWindowClosed => self.close_window(false),
            Event::PlaceResolved(place) => self.select_place(place),
            Event::SearchCleared => self.clear_search(),
        };

        if self.view == ViewState::Ready {
            commands
        } else {
            Vec::new()
        }
    }

    fn load(&mut self, incidents: Arc<[Incident]>) -> Vec<MapCommand> {
        log::info!("Dataset loaded with {} incidents", incidents.len());
        self.incidents = incidents;
        self.generation += 1;

        let mut commands = self.marker_commands();
        if matches!(self.open_window, Some(MarkerId::Incident(_))) {
            self.open_window = None;
            commands.push(MapCommand::CloseInfoWindow);
        }
        commands
    }

    fn set_predicates(&mut self, next: FilterPredicates) -> Vec<MapCommand> {
        if next == self.predicates {
            return Vec::new();
        }
        self.predicates = next;

        let mut commands = self.marker_commands();
        if let Some(MarkerId::Incident(index)) = self.open_window
            && self.filtered_indices().binary_search(&index).is_err()
        {
            self.open_window = None;
            commands.push(MapCommand::CloseInfoWindow);
        }
        commands
    }

    fn open(&mut self, marker: MarkerId) -> Vec<MapCommand> {
        let command = match marker {
            MarkerId::Incident(index) if self.filtered_indices().binary_search(&index).is_ok() => {
                self.info_window_command(marker)
            }
            MarkerId::Incident(index) => {
                log::debug!("Ignoring click on hidden incident marker {index}");
                None
            }
            MarkerId::SearchResult => self.info_window_command(marker),
        };

        command.map_or_else(Vec::new, |command| {
            self.open_window = Some(marker);
            vec![command]
        })
    }

    fn close_window(&mut self, send_close: bool) -> Vec<MapCommand> {
        match self.open_window.take() {
            Some(_) if send_close => vec![MapCommand::CloseInfoWindow],
            _ => Vec::new(),
        }
    }

    fn select_place(&mut self, place: SelectedPlace) -> Vec<MapCommand> {
        if let Some(bounds) = self.search_bounds()
            && !bounds.contains(place.position)
        {
            let name = &place.name;
            log::info!("Search result {name:?} lies outside the incident area");
        }

        let position = place.position;
        let content = place_info(&place);
        self.search = Some(place);
        self.open_window = Some(MarkerId::SearchResult);

        vec![
            MapCommand::SetSearchMarker {
                position: Some(position),
            },
            MapCommand::PanTo {
                position,
                zoom: self.config.search_zoom,
            },
            MapCommand::OpenInfoWindow {
                marker: MarkerId::SearchResult,
                position,
                content,
            },
        ]
    }

    fn clear_search(&mut self) -> Vec<MapCommand> {
        if self.search.take().is_none() {
            return Vec::new();
        }

        let mut commands = vec![MapCommand::SetSearchMarker { position: None }];
        if self.open_window == Some(MarkerId::SearchResult) {
            self.open_window = None;
            commands.push(MapCommand::CloseInfoWindow);
        }
        commands
    }

    fn marker_commands(&mut self) -> Vec<MapCommand> {
        let taxonomy = self.taxonomy();
        let indices = self.filtered_indices();

        let mut commands = Vec::with_capacity(indices.len() + 1);
        commands.push(MapCommand::ClearIncidentMarkers);
        commands.extend(indices.iter().map(|&index| {
            let incident = &self.incidents[index];
            MapCommand::AddIncidentMarker {
                index,
                position: incident.position(),
                color: taxonomy.colors.incident_color(incident),
            }
        }));
        commands
    }

    fn info_window_command(&mut self, marker: MarkerId) -> Option<MapCommand> {
        match marker {
            MarkerId::Incident(index) => {
                let taxonomy = self.taxonomy();
                let incident = self.incidents.get(index)?;
                Some(MapCommand::OpenInfoWindow {
                    marker,
                    position: incident.position(),
                    content: incident_info(incident, taxonomy.colors.incident_color(incident)),
                })
            }
            MarkerId::SearchResult => {
                let place = self.search.as_ref()?;
                Some(MapCommand::OpenInfoWindow {
                    marker,
                    position: place.position,
                    content: place_info(place),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_map_classify::DEFAULT_COLOR;
    use incident_map_incident_models::LocationInterpretation;

    fn incident(case: &str, date: &str, category: Option<&str>, lat: f64) -> Incident {
        Incident {
            case_number: case.to_string(),
            date: date.to_string(),
            time: Some(800),
            offense_type: format!("{case} offense"),
            offense_category: category.map(str::to_string),
            location: String::new(),
            lat,
            lng: -122.0,
            formatted_address: String::new(),
            maps_url: None,
            place_type: None,
            location_interpretation: LocationInterpretation::GeneralArea,
            report_date_slug: None,
            police_record_date: None,
        }
    }

    fn dataset() -> Arc<[Incident]> {
        vec![
            incident("A", "1/15/2025", Some("Theft"), 37.0),
            incident("B", "3/1/2025", Some("Violent Crime"), 37.25),
            incident("C", "bad", None, 37.5),
        ]
        .into()
    }

    fn config() -> MapConfig {
        MapConfig {
            api_key: Some("test-key".to_string()),
            ..MapConfig::default()
        }
    }

    fn loaded() -> Session {
        let mut session = Session::new(config(), Classifier::default());
        session.dispatch(Event::DatasetLoaded(dataset()));
        session
    }

    fn marker_indices(commands: &[MapCommand]) -> Vec<usize> {
        commands
            .iter()
            .filter_map(|c| match c {
                MapCommand::AddIncidentMarker { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    fn date_input(control: DateControl, value: &str) -> Event {
        Event::DateInput {
            control,
            value: value.to_string(),
        }
    }

    #[test]
    fn missing_api_key_makes_view_unavailable() {
        let mut session = Session::new(MapConfig::default(), Classifier::default());
        assert!(matches!(session.view(), ViewState::Unavailable { .. }));
        assert!(session.dispatch(Event::DatasetLoaded(dataset())).is_empty());
        assert!(session.render().is_empty());
        // State still tracks the dataset even though nothing renders.
        assert_eq!(session.incidents().len(), 3);
    }

    #[test]
    fn loading_renders_every_incident_with_category_colors() {
        let mut session = Session::new(config(), Classifier::default());
        let commands = session.dispatch(Event::DatasetLoaded(dataset()));

        assert_eq!(commands[0], MapCommand::ClearIncidentMarkers);
        assert_eq!(marker_indices(&commands), vec![0, 1, 2]);

        let colors: Vec<&str> = commands
            .iter()
            .filter_map(|c| match c {
                MapCommand::AddIncidentMarker { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        let classifier = Classifier::default();
        assert_eq!(
            colors,
            vec![
                classifier.color("Theft"),
                classifier.color("Violent Crime"),
                DEFAULT_COLOR,
            ]
        );
    }

    #[test]
    fn taxonomy_is_memoized_per_dataset() {
        let mut session = loaded();
        let first = session.taxonomy();
        let second = session.taxonomy();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(session.stats().taxonomy_builds, 1);
        assert_eq!(
            first.categories,
            vec!["Violent Crime".to_string(), "Theft".to_string()]
        );

        // Filter changes do not rebuild the taxonomy.
        session.dispatch(date_input(DateControl::IncidentStart, "2025-02-01"));
        session.taxonomy();
        assert_eq!(session.stats().taxonomy_builds, 1);

        // A new dataset does, even if identical.
        session.dispatch(Event::DatasetLoaded(dataset()));
        assert_eq!(session.stats().taxonomy_builds, 2);
    }

    #[test]
    fn filter_is_memoized_until_predicates_change() {
        let mut session = loaded();
        let runs = session.stats().filter_runs;
        session.filtered_indices();
        session.filtered_indices();
        assert_eq!(session.stats().filter_runs, runs);

        session.dispatch(Event::CategoryToggled {
            label: "Theft".to_string(),
            checked: true,
        });
        assert_eq!(session.stats().filter_runs, runs + 1);
        assert_eq!(&*session.filtered_indices(), &[0]);
    }

    #[test]
    fn unchanged_predicates_emit_nothing() {
        let mut session = loaded();
        assert!(session.dispatch(Event::ClearFilters).is_empty());
        assert!(session.dispatch(date_input(DateControl::ReportEnd, "")).is_empty());
    }

    #[test]
    fn date_input_refilters_markers() {
        let mut session = loaded();
        let commands = session.dispatch(date_input(DateControl::IncidentStart, "2025-02-01"));
        assert_eq!(marker_indices(&commands), vec![1]);

        let commands = session.dispatch(date_input(DateControl::IncidentStart, ""));
        assert_eq!(marker_indices(&commands), vec![0, 1, 2]);
    }

    #[test]
    fn malformed_date_input_hides_everything() {
        let mut session = loaded();
        let commands = session.dispatch(date_input(DateControl::IncidentEnd, "whenever"));
        assert_eq!(commands, vec![MapCommand::ClearIncidentMarkers]);
    }

    #[test]
    fn unchecking_every_category_shows_everything() {
        let mut session = loaded();
        session.dispatch(Event::CategoryToggled {
            label: "Theft".to_string(),
            checked: true,
        });
        let commands = session.dispatch(Event::CategoryToggled {
            label: "Theft".to_string(),
            checked: false,
        });
        assert_eq!(marker_indices(&commands), vec![0, 1, 2]);
    }

    #[test]
    fn clicking_marker_opens_info_window() {
        let mut session = loaded();
        let commands = session.dispatch(Event::MarkerClicked(MarkerId::Incident(1)));
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            MapCommand::OpenInfoWindow {
                marker, content, ..
            } => {
                assert_eq!(*marker, MarkerId::Incident(1));
                assert_eq!(content.title, "B offense");
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(session.open_info_window(), Some(MarkerId::Incident(1)));

        let commands = session.dispatch(Event::MapClicked);
        assert_eq!(commands, vec![MapCommand::CloseInfoWindow]);
        assert_eq!(session.open_info_window(), None);
        assert!(session.dispatch(Event::MapClicked).is_empty());
    }

    #[test]
    fn clicking_hidden_or_unknown_marker_is_ignored() {
        let mut session = loaded();
        session.dispatch(date_input(DateControl::IncidentStart, "2025-02-01"));
        assert!(session.dispatch(Event::MarkerClicked(MarkerId::Incident(0))).is_empty());
        assert!(session.dispatch(Event::MarkerClicked(MarkerId::Incident(99))).is_empty());
        assert!(session.dispatch(Event::MarkerClicked(MarkerId::SearchResult)).is_empty());
        assert_eq!(session.open_info_window(), None);
    }

    #[test]
    fn filtering_out_open_incident_closes_its_window() {
        let mut session = loaded();
        session.dispatch(Event::MarkerClicked(MarkerId::Incident(0)));
        let commands = session.dispatch(date_input(DateControl::IncidentStart, "2025-02-01"));
        assert_eq!(commands.last(), Some(&MapCommand::CloseInfoWindow));
        assert_eq!(session.open_info_window(), None);
    }

    #[test]
    fn closing_window_from_widget_sends_nothing_back() {
        let mut session = loaded();
        session.dispatch(Event::MarkerClicked(MarkerId::Incident(0)));
        assert!(session.dispatch(Event::InfoWindowClosed).is_empty());
        assert_eq!(session.open_info_window(), None);
    }

    #[test]
    fn search_result_drops_marker_pans_and_opens_window() {
        let mut session = loaded();
        let position = LatLng::new(37.1, -122.1);
        let commands = session.dispatch(Event::PlaceResolved(SelectedPlace {
            name: "Library".to_string(),
            formatted_address: "1 Main St".to_string(),
            position,
        }));

        assert_eq!(
            commands[0],
            MapCommand::SetSearchMarker {
                position: Some(position)
            }
        );
        assert_eq!(
            commands[1],
            MapCommand::PanTo {
                position,
                zoom: 16
            }
        );
        assert!(matches!(
            commands[2],
            MapCommand::OpenInfoWindow {
                marker: MarkerId::SearchResult,
                ..
            }
        ));
        assert_eq!(
            session.search_result().map(|p| p.name.as_str()),
            Some("Library")
        );

        let commands = session.dispatch(Event::SearchCleared);
        assert_eq!(
            commands,
            vec![
                MapCommand::SetSearchMarker { position: None },
                MapCommand::CloseInfoWindow,
            ]
        );
        assert!(session.search_result().is_none());
    }

    #[test]
    fn render_includes_search_marker_and_initial_pan() {
        let mut session = loaded();
        let commands = session.render();
        assert_eq!(marker_indices(&commands), vec![0, 1, 2]);
        let no_search = MapCommand::SetSearchMarker { position: None };
        assert!(commands.contains(&no_search));
        assert_eq!(
            commands.last(),
            Some(&MapCommand::PanTo {
                position: LatLng::new(37.25, -122.0),
                zoom: 13,
            })
        );
    }

    #[test]
    fn configured_center_wins() {
        let mut config = config();
        config.center = Some(LatLng::new(1.0, 2.0));
        let session = Session::new(config, Classifier::default());
        assert_eq!(session.center(), LatLng::new(1.0, 2.0));
    }

    #[test]
    fn reloading_dataset_closes_incident_window() {
        let mut session = loaded();
        session.dispatch(Event::MarkerClicked(MarkerId::Incident(2)));
        let commands = session.dispatch(Event::DatasetLoaded(Arc::from(Vec::new())));
        assert_eq!(
            commands,
            vec![
                MapCommand::ClearIncidentMarkers,
                MapCommand::CloseInfoWindow
            ]
        );
        assert!(session.taxonomy().categories.is_empty());
    }
}
