//! The single-threaded application state.
//!
//! `AtlasController` owns the dataset, the connection index, the selection and
//! every piece of UI state. All mutation goes through [`EventListener`] or the
//! explicit methods below; the map is reached only through the surface.

use crate::panel::{self, PanelContent, PanelView};
use crate::search_box::{Availability, ResultChoice, SearchBox};
use crate::selection::{SelectionState, ToggleOutcome};
use crate::settings::AtlasSettings;
use crate::timeline::{Effect, Timeline};
use statemap_core::{ConnectionId, Dataset, DatasetError, LocationIndex, StatementId};
use statemap_events::{Event, EventListener};
use statemap_graph::{Bounds, ConnectionIndex, MapSurface};
use statemap_search::SearchEngine;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

pub struct AtlasController<S: MapSurface> {
    settings: AtlasSettings,
    surface: S,
    load_state: LoadState,
    dataset: Dataset,
    index: ConnectionIndex,
    engine: SearchEngine,
    selection: SelectionState,
    search: SearchBox,
    timeline: Timeline,
    panel_view: PanelView,
    panel: PanelContent,
}

impl<S: MapSurface> AtlasController<S> {
    pub fn new(settings: AtlasSettings, mut surface: S) -> Self {
        let view = &settings.view;
        surface.set_zoom_limits(view.min_zoom, view.max_zoom);
        surface.set_view(view.center_coordinate(), view.zoom);

        Self {
            settings,
            surface,
            load_state: LoadState::Loading,
            dataset: Dataset::default(),
            index: ConnectionIndex::default(),
            engine: SearchEngine::default(),
            selection: SelectionState::new(),
            search: SearchBox::new(),
            timeline: Timeline::new(),
            panel_view: PanelView::Placeholder,
            panel: panel::render_placeholder(),
        }
    }

    /// Hand over the joint result of loading both resources. Only the first
    /// call has any effect.
    pub fn finish_loading(&mut self, result: Result<Dataset, DatasetError>) {
        if self.load_state != LoadState::Loading {
            tracing::warn!("Datasets already settled; ignoring second load result");
            return;
        }

        match result {
            Ok(dataset) => {
                self.index = ConnectionIndex::build(dataset.locations(), dataset.connections());
                self.engine = SearchEngine::new(dataset.locations());
                self.surface
                    .place_markers(dataset.locations(), self.settings.clusters.max_radius);

                let bounds =
                    Bounds::from_coordinates(dataset.locations().iter().map(|l| &l.coordinate));
                if let Some(bounds) = bounds.filter(Bounds::is_valid) {
                    let view = &self.settings.view;
                    self.surface
                        .fit_bounds(&bounds, view.fit_padding, view.fit_max_zoom);
                }

                tracing::info!("{}", panel::map_info(dataset.location_count(), dataset.connection_count()));
                self.dataset = dataset;
                self.load_state = LoadState::Ready;
            }
            Err(e) => {
                tracing::error!("Error loading data: {}", e);
                self.load_state = LoadState::Failed(e.to_string());
                self.panel = panel::render_error(&self.panel);
                self.panel_view = PanelView::Error;
            }
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn settings(&self) -> &AtlasSettings {
        &self.settings
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_ready(&self) -> bool {
        self.load_state == LoadState::Ready
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn index(&self) -> &ConnectionIndex {
        &self.index
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn selected(&self) -> Option<&StatementId> {
        self.selection.selected()
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &ConnectionId> {
        self.selection.visibility().highlighted()
    }

    pub fn panel(&self) -> &PanelContent {
        &self.panel
    }

    pub fn panel_view(&self) -> PanelView {
        self.panel_view
    }

    pub fn search_box(&self) -> &SearchBox {
        &self.search
    }

    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    /// Header line once loaded.
    pub fn map_info(&self) -> Option<String> {
        self.is_ready().then(|| {
            panel::map_info(self.dataset.location_count(), self.dataset.connection_count())
        })
    }

    pub fn marker_tooltip(&self, location: LocationIndex) -> Option<String> {
        self.dataset.location(location).and_then(panel::marker_tooltip)
    }

    // ------------------------------------------------------------------
    // Map interaction
    // ------------------------------------------------------------------

    /// Map and panel interactions only run once the data is in.
    fn accepts_interaction(&self, action: &str) -> bool {
        if self.is_ready() {
            return true;
        }
        tracing::debug!(state = ?self.load_state, "Ignoring {} until data is loaded", action);
        false
    }

    pub fn click_marker(&mut self, location: LocationIndex) {
        if !self.accepts_interaction("marker click") {
            return;
        }
        let Some(statement) = self
            .dataset
            .location(location)
            .map(|l| l.statement().clone())
        else {
            tracing::warn!("Marker click on unknown location {}", location);
            return;
        };
        let outcome = self
            .selection
            .toggle_statement(&statement, &mut self.index, &mut self.surface);
        tracing::debug!(location = %location, ?outcome, "Marker clicked");
        self.show_location(location);
    }

    /// Line or label click: show the connection and add it to the highlights.
    pub fn click_connection(&mut self, id: &ConnectionId) {
        if !self.accepts_interaction("connection click") {
            return;
        }
        self.show_connection(id);
        self.selection
            .highlight_connection(id, &mut self.index, &mut self.surface);
    }

    pub fn click_background(&mut self) {
        if !self.accepts_interaction("background click") {
            return;
        }
        self.selection.reset(&mut self.index, &mut self.surface);
        self.panel = panel::render_placeholder();
        self.panel_view = PanelView::Placeholder;
    }

    // ------------------------------------------------------------------
    // Panel actions
    // ------------------------------------------------------------------

    /// From/to links and episode tags: select the statement and show its connections.
    pub fn highlight_statement(&mut self, statement: &StatementId) {
        if !self.accepts_interaction("statement highlight") {
            return;
        }
        self.selection
            .select_and_highlight(statement, &mut self.index, &mut self.surface);
        self.refresh_location_panel();
    }

    /// Show/Hide Connections button. Same rule as a marker click; the panel
    /// stays on the current location with its button label updated.
    pub fn toggle_statement(&mut self, statement: &StatementId) -> Option<ToggleOutcome> {
        if !self.accepts_interaction("connections toggle") {
            return None;
        }
        let outcome = self
            .selection
            .toggle_statement(statement, &mut self.index, &mut self.surface);
        self.refresh_location_panel();
        Some(outcome)
    }

    pub fn highlight_connection(&mut self, id: &ConnectionId) -> bool {
        if !self.accepts_interaction("connection highlight") {
            return false;
        }
        let shown = self
            .selection
            .highlight_connection(id, &mut self.index, &mut self.surface);
        self.refresh_location_panel();
        shown
    }

    pub fn clear_connections(&mut self) {
        if !self.accepts_interaction("clear connections") {
            return;
        }
        self.selection
            .clear_connections(&mut self.index, &mut self.surface);
        self.refresh_location_panel();
    }

    fn show_location(&mut self, location: LocationIndex) {
        let Some(loc) = self.dataset.location(location) else {
            return;
        };
        let visible = self.selection.connections_visible_for(loc.statement());
        self.panel = panel::render_location(loc, &self.dataset, visible);
        self.panel_view = PanelView::Location(location);
    }

    fn show_connection(&mut self, id: &ConnectionId) {
        match self.dataset.connection(id) {
            Some((reference, connection)) => {
                self.panel = panel::render_connection(connection);
                self.panel_view = PanelView::Connection(reference);
            }
            None => tracing::warn!("No connection record for {}", id),
        }
    }

    fn refresh_location_panel(&mut self) {
        if let PanelView::Location(location) = self.panel_view {
            self.show_location(location);
        }
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    fn availability(&self) -> Availability {
        match self.load_state {
            LoadState::Loading => Availability::Loading,
            LoadState::Ready => Availability::Ready,
            LoadState::Failed(_) => Availability::Unavailable,
        }
    }

    pub fn search_input(&mut self, text: &str) {
        let availability = self.availability();
        self.search.input(text, &self.engine, availability);
    }

    pub fn search_focus(&mut self) {
        self.search.focus();
    }

    pub fn search_blur(&mut self) {
        self.search.blur();
        self.timeline
            .schedule(self.settings.search.blur_hide_delay(), Effect::HideSearchResults);
    }

    pub fn search_clear(&mut self) {
        self.search.clear();
    }

    pub fn escape(&mut self) {
        self.search.escape();
    }

    pub fn choose_search_result(&mut self, index: usize) {
        match self.search.choose_result(index) {
            Some(ResultChoice::Jump {
                location,
                statement,
            }) => self.jump_to(location, statement),
            Some(ResultChoice::PickerOpened) => tracing::debug!("Location picker opened"),
            None => tracing::warn!("No search result at position {}", index),
        }
    }

    pub fn choose_picker_location(&mut self, index: usize) {
        match self.search.choose_picker_location(index) {
            Some((location, statement)) => self.jump_to(location, statement),
            None => tracing::warn!("No picker entry at position {}", index),
        }
    }

    pub fn dismiss_picker(&mut self) {
        self.search.dismiss_picker();
    }

    /// Fly to a location; the rest of the jump happens once the flight ends.
    /// A newer jump replaces one still in flight.
    pub fn jump_to(&mut self, location: LocationIndex, statement: StatementId) {
        if !self.accepts_interaction("jump") {
            return;
        }
        let Some(target) = self.dataset.location(location).map(|l| l.coordinate) else {
            tracing::warn!("Jump to unknown location {}", location);
            return;
        };
        let superseded = self
            .timeline
            .cancel_where(|e| matches!(e, Effect::CompleteJump { .. }));
        if superseded > 0 {
            tracing::debug!("Superseded pending jump");
        }

        let jump = &self.settings.jump;
        self.surface.fly_to(target, jump.zoom, jump.fly_duration());
        self.timeline.schedule(
            jump.fly_duration(),
            Effect::CompleteJump {
                location,
                statement,
            },
        );
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Advance the clock and apply every effect that falls due.
    pub fn advance(&mut self, elapsed: Duration) {
        self.timeline.advance(elapsed);
        while let Some(effect) = self.timeline.pop_due() {
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::CompleteJump {
                location,
                statement,
            } => {
                self.surface.emphasize_marker(location);
                self.timeline.schedule(
                    self.settings.jump.emphasis_duration(),
                    Effect::ClearEmphasis { location },
                );
                self.selection
                    .select_and_highlight(&statement, &mut self.index, &mut self.surface);
                self.show_location(location);
            }
            Effect::ClearEmphasis { location } => self.surface.clear_marker_emphasis(location),
            Effect::HideSearchResults => self.search.hide_results(),
        }
    }
}

impl<S: MapSurface> EventListener for AtlasController<S> {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::MarkerClicked { location } => self.click_marker(*location),
            Event::ConnectionClicked { id } => self.click_connection(id),
            Event::MapBackgroundClicked => self.click_background(),
            Event::StatementLinkClicked { statement } => self.highlight_statement(statement),
            Event::ToggleStatementConnections { statement } => {
                self.toggle_statement(statement);
            }
            Event::HighlightConnectionRequested { id } => {
                self.highlight_connection(id);
            }
            Event::ClearConnectionsRequested => self.clear_connections(),
            Event::SearchInput { text } => self.search_input(text),
            Event::SearchFocused | Event::SearchShortcut => self.search_focus(),
            Event::SearchBlurred => self.search_blur(),
            Event::SearchCleared => self.search_clear(),
            Event::EscapePressed => self.escape(),
            Event::SearchResultChosen { index } => self.choose_search_result(*index),
            Event::PickerLocationChosen { index } => self.choose_picker_location(*index),
            Event::PickerDismissed => self.dismiss_picker(),
            Event::Tick { elapsed } => self.advance(*elapsed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statemap_core::{Connection, ConnectionType, Coordinate, Location, LocationProperties};
    use statemap_graph::{CanvasCall, RecordingCanvas};

    fn dataset() -> Dataset {
        let loc = |statement: &str, place: &str, lat: f64| {
            Location::new(Coordinate::new(lat, -1.0), LocationProperties::new(statement))
                .with_place(place)
        };
        Dataset::new(
            vec![
                loc("MAG-001", "Leeds", 53.8),
                loc("MAG-002", "London", 51.5),
                loc("MAG-002", "Brighton", 50.8),
            ],
            vec![Connection::new("c1", "MAG-001", "MAG-002", ConnectionType::Entity).with_label("Web")],
        )
    }

    fn ready() -> AtlasController<RecordingCanvas> {
        let mut controller = AtlasController::new(AtlasSettings::default(), RecordingCanvas::new());
        controller.finish_loading(Ok(dataset()));
        controller
    }

    #[test]
    fn test_load_places_markers_and_fits_bounds() {
        let controller = ready();
        let calls = controller.surface().calls();
        assert!(matches!(
            calls[0],
            CanvasCall::SetZoomLimits {
                min_zoom: 2,
                max_zoom: 20
            }
        ));
        assert!(calls.contains(&CanvasCall::PlaceMarkers {
            count: 3,
            cluster_radius: 60
        }));
        assert!(calls.iter().any(|c| matches!(
            c,
            CanvasCall::FitBounds {
                padding: 50,
                max_zoom: 8,
                ..
            }
        )));
        assert_eq!(
            controller.map_info().as_deref(),
            Some("Statement Location Index • 3 locations • 1 connections")
        );
    }

    #[test]
    fn test_second_load_result_is_ignored() {
        let mut controller = ready();
        controller.finish_loading(Err(DatasetError::InvalidCoordinates { feature: 0 }));
        assert!(controller.is_ready());
    }

    #[test]
    fn test_marker_click_updates_panel_and_highlights() {
        let mut controller = ready();
        controller.click_marker(LocationIndex(0));
        assert_eq!(controller.selected().map(|s| s.as_str()), Some("MAG-001"));
        assert_eq!(controller.panel_view(), PanelView::Location(LocationIndex(0)));
        assert!(controller.panel().body.contains("Hide Connections"));
        assert_eq!(controller.highlighted().count(), 1);
    }

    #[test]
    fn test_blur_hides_results_after_delay() {
        let mut controller = ready();
        controller.search_focus();
        controller.search_input("2");
        controller.search_blur();

        controller.advance(Duration::from_millis(199));
        assert!(controller.search_box().results_visible());
        controller.advance(Duration::from_millis(1));
        assert!(!controller.search_box().results_visible());
    }

    #[test]
    fn test_later_jump_supersedes_pending_one() {
        let mut controller = ready();
        controller.jump_to(LocationIndex(0), "MAG-001".into());
        controller.advance(Duration::from_millis(500));
        controller.jump_to(LocationIndex(1), "MAG-002".into());
        controller.advance(Duration::from_millis(1500));

        assert_eq!(controller.selected().map(|s| s.as_str()), Some("MAG-002"));
        assert!(!controller.surface().is_emphasized(LocationIndex(0)));
        assert!(controller.surface().is_emphasized(LocationIndex(1)));
    }
}
