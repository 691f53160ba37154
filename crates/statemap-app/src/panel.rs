//! Detail panel markup.
//!
//! The panel has three slots (title, meta, body) that are replaced wholesale.
//! Clickable elements carry a `data-action` attribute describing the
//! [`PanelAction`] the host should dispatch when they are clicked.

use serde::Serialize;
use statemap_core::{Connection, ConnectionId, ConnectionRef, Dataset, Location, LocationIndex, StatementId};
use statemap_events::Event;
use statemap_graph::{get_connection_color, get_entity_color};

pub const PLACEHOLDER_TITLE: &str = "Statement Archive";
pub const PLACEHOLDER_META: &str = "Select a location to view details";
pub const PLACEHOLDER_BODY: &str = "Click on any marker to view statement details and connections.";

pub const DEFAULT_TITLE: &str = "Unknown Location";
pub const DEFAULT_STATEMENT: &str = "STATEMENT-UNKNOWN";
pub const DEFAULT_SUMMARY: &str = "No statement summary available.";
pub const DEFAULT_ENTITY: &str = "Unclassified";
/// Boilerplate note that is never shown.
pub const BOILERPLATE_ARCHIVIST_NOTE: &str = "Statement recorded for posterity.";

pub const ERROR_BODY: &str = "Unable to load statement data.";
pub const ERROR_HINT: &str = "Check that data files exist and contain valid JSON.";

/// Which state the panel is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanelView {
    Placeholder,
    Location(LocationIndex),
    Connection(ConnectionRef),
    Error,
}

/// Markup for the three panel slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelContent {
    pub title: String,
    pub meta: String,
    pub body: String,
}

/// What a clickable panel element asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    /// Connection list item in the location panel.
    ShowConnection(ConnectionId),
    /// From/to links and episode tags.
    HighlightStatement(StatementId),
    ToggleStatement(StatementId),
    HighlightConnection(ConnectionId),
    ClearConnections,
}

impl PanelAction {
    fn attributes(&self) -> String {
        match self {
            Self::ShowConnection(id) => {
                format!(r#"data-action="show-connection" data-id="{}""#, html_escape(id.as_str()))
            }
            Self::HighlightStatement(s) => format!(
                r#"data-action="highlight-statement" data-statement="{}""#,
                html_escape(s.as_str())
            ),
            Self::ToggleStatement(s) => format!(
                r#"data-action="toggle-statement" data-statement="{}""#,
                html_escape(s.as_str())
            ),
            Self::HighlightConnection(id) => format!(
                r#"data-action="highlight-connection" data-id="{}""#,
                html_escape(id.as_str())
            ),
            Self::ClearConnections => r#"data-action="clear-connections""#.to_string(),
        }
    }

    /// Parse the `data-action` attribute and its argument back into an action.
    pub fn from_attributes(action: &str, argument: Option<&str>) -> Option<Self> {
        match (action, argument) {
            ("show-connection", Some(id)) => Some(Self::ShowConnection(id.into())),
            ("highlight-statement", Some(s)) => Some(Self::HighlightStatement(s.into())),
            ("toggle-statement", Some(s)) => Some(Self::ToggleStatement(s.into())),
            ("highlight-connection", Some(id)) => Some(Self::HighlightConnection(id.into())),
            ("clear-connections", _) => Some(Self::ClearConnections),
            _ => None,
        }
    }

    pub fn into_event(self) -> Event {
        match self {
            Self::ShowConnection(id) => Event::ConnectionClicked { id },
            Self::HighlightStatement(statement) => Event::StatementLinkClicked { statement },
            Self::ToggleStatement(statement) => Event::ToggleStatementConnections { statement },
            Self::HighlightConnection(id) => Event::HighlightConnectionRequested { id },
            Self::ClearConnections => Event::ClearConnectionsRequested,
        }
    }
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_placeholder() -> PanelContent {
    PanelContent {
        title: format!(r#"<i class="fas fa-map-pin"></i> {PLACEHOLDER_TITLE}"#),
        meta: format!(r#"<span class="statement-number">{PLACEHOLDER_META}</span>"#),
        body: format!("<p>{PLACEHOLDER_BODY}</p>"),
    }
}

/// Error state. Title and meta stay as they were.
pub fn render_error(previous: &PanelContent) -> PanelContent {
    PanelContent {
        title: previous.title.clone(),
        meta: previous.meta.clone(),
        body: format!(
            "<p>{ERROR_BODY}</p>\n<div class=\"archivist-note\"><i class=\"fas fa-exclamation-triangle\"></i> <strong>Archivist's Note:</strong> {ERROR_HINT}</div>"
        ),
    }
}

/// Summary text as paragraphs, one per line.
fn summary_paragraphs(summary: &str) -> String {
    let paragraphs: Vec<String> = summary.split('\n').map(html_escape).collect();
    format!("<p>{}</p>", paragraphs.join("</p><p>"))
}

/// Location detail. `connections_visible` picks the toggle button's label.
pub fn render_location(
    location: &Location,
    dataset: &Dataset,
    connections_visible: bool,
) -> PanelContent {
    let props = &location.properties;
    let title = props.place.as_deref().unwrap_or(DEFAULT_TITLE);
    let statement = if props.statement.as_str().is_empty() {
        DEFAULT_STATEMENT
    } else {
        props.statement.as_str()
    };
    let entity = props.entity.as_deref().unwrap_or(DEFAULT_ENTITY);
    let summary = props
        .summary
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SUMMARY);

    let meta = format!(
        r#"<span class="statement-number"><i class="fas fa-file-audio"></i> {}</span><span class="entity-tag" style="background: {}"><i class="fas fa-eye"></i> {}</span>"#,
        html_escape(statement),
        get_entity_color(entity),
        html_escape(entity)
    );

    let mut body = summary_paragraphs(summary);

    if let Some(date) = &props.date {
        body.push_str(&format!(
            r#"<div class="statement-date"><i class="far fa-calendar"></i> Statement given: {}</div>"#,
            html_escape(date)
        ));
    }
    if let Some(giver) = &props.statement_giver {
        body.push_str(&format!(
            r#"<div class="statement-giver"><i class="fas fa-user"></i> Statement giver: {}</div>"#,
            html_escape(giver)
        ));
    }
    if let Some(supplemental) = &props.supplemental {
        body.push_str(&format!(
            r#"<div class="supplemental-info"><strong>Supplemental:</strong> {}</div>"#,
            html_escape(supplemental)
        ));
    }
    if let Some(note) = props
        .archivist_note
        .as_deref()
        .filter(|note| *note != BOILERPLATE_ARCHIVIST_NOTE)
    {
        body.push_str(&format!(
            r#"<div class="archivist-note"><i class="fas fa-microphone"></i> <strong>Archivist's Note:</strong> {}</div>"#,
            html_escape(note)
        ));
    }

    let related: Vec<&Connection> = dataset
        .connections_for(&props.statement)
        .map(|(_, conn)| conn)
        .collect();
    if !related.is_empty() {
        body.push_str(&connections_section(&props.statement, &related, connections_visible));
    }

    PanelContent {
        title: format!(r#"<i class="fas fa-map-pin"></i> {}"#, html_escape(title)),
        meta,
        body,
    }
}

fn connections_section(
    statement: &StatementId,
    related: &[&Connection],
    connections_visible: bool,
) -> String {
    let (button_text, button_icon) = if connections_visible {
        ("Hide Connections", "fa-eye-slash")
    } else {
        ("Show Connections", "fa-link")
    };

    let mut section = format!(
        r#"<div class="connections-section"><h4><i class="fas fa-project-diagram"></i> Connections ({})</h4><button class="toggle-connections-btn" {}><i class="fas {}"></i> {}</button><div class="connections-list">"#,
        related.len(),
        PanelAction::ToggleStatement(statement.clone()).attributes(),
        button_icon,
        button_text
    );

    for conn in related {
        section.push_str(&format!(
            r#"<div class="connection-item" {}><span class="connection-dot" style="background: {}"></span><div class="connection-info"><div class="connection-header"><span class="connection-type">{}</span><span class="connection-strength strength-{}">{}</span></div><div class="connection-label">{}</div><div class="connection-target">→ {}</div></div></div>"#,
            PanelAction::ShowConnection(conn.id.clone()).attributes(),
            get_connection_color(conn),
            html_escape(conn.kind.as_str()),
            html_escape(conn.strength.as_str()),
            html_escape(conn.strength.as_str()),
            html_escape(conn.label.as_deref().unwrap_or_default()),
            html_escape(conn.other_end(statement).as_str())
        ));
    }

    section.push_str("</div></div>");
    section
}

pub fn render_connection(connection: &Connection) -> PanelContent {
    let statement_link = |statement: &StatementId| {
        format!(
            r#"<span class="connection-info-value statement-link" {}>{}</span>"#,
            PanelAction::HighlightStatement(statement.clone()).attributes(),
            html_escape(statement.as_str())
        )
    };

    let mut body = format!(
        r#"<div class="connection-details"><h3><i class="fas fa-link"></i> {}</h3>"#,
        html_escape(connection.label.as_deref().unwrap_or_default())
    );

    body.push_str(&format!(
        r#"<div class="connection-info-grid"><div class="connection-info-item"><span class="connection-info-label">Type:</span><span class="connection-info-value">{}</span></div><div class="connection-info-item"><span class="connection-info-label">Strength:</span><span class="connection-info-value strength-{}">{}</span></div><div class="connection-info-item"><span class="connection-info-label">From:</span>{}</div><div class="connection-info-item"><span class="connection-info-label">To:</span>{}</div></div>"#,
        html_escape(connection.kind.as_str()),
        html_escape(connection.strength.as_str()),
        html_escape(connection.strength.as_str()),
        statement_link(&connection.from),
        statement_link(&connection.to)
    ));

    body.push_str(&format!(
        r#"<div class="connection-description"><h4><i class="fas fa-scroll"></i> Description</h4><p>{}</p></div>"#,
        html_escape(&connection.description)
    ));

    if let Some(evidence) = &connection.evidence {
        body.push_str(&format!(
            r#"<div class="connection-evidence"><h4><i class="fas fa-search"></i> Evidence</h4><p>{}</p></div>"#,
            html_escape(evidence)
        ));
    }

    if !connection.characters.is_empty() {
        let tags: String = connection
            .characters
            .iter()
            .map(|c| format!(r#"<span class="character-tag">{}</span>"#, html_escape(c)))
            .collect();
        body.push_str(&format!(
            r#"<div class="connection-characters"><h4><i class="fas fa-users"></i> Involved Characters/Entities</h4><div class="character-tags">{tags}</div></div>"#
        ));
    }

    let episodes: String = connection
        .episodes
        .iter()
        .map(|ep| {
            format!(
                r#"<span class="episode-tag" {}>{}</span>"#,
                PanelAction::HighlightStatement(ep.clone()).attributes(),
                html_escape(ep.as_str())
            )
        })
        .collect();
    body.push_str(&format!(
        r#"<div class="connection-episodes"><h4><i class="fas fa-podcast"></i> Related Episodes</h4><div class="episode-tags">{episodes}</div></div>"#
    ));

    body.push_str(&format!(
        r#"<div class="connection-actions"><button class="connection-action-btn" {}><i class="fas fa-eye"></i> Highlight This Connection</button><button class="connection-action-btn" {}><i class="fas fa-times"></i> Clear All Connections</button></div></div>"#,
        PanelAction::HighlightConnection(connection.id.clone()).attributes(),
        PanelAction::ClearConnections.attributes()
    ));

    PanelContent {
        title: r#"<i class="fas fa-project-diagram"></i> Connection Details"#.to_string(),
        meta: format!(
            r#"<span class="statement-number"><i class="fas fa-link"></i> {}</span>"#,
            html_escape(connection.id.as_str())
        ),
        body,
    }
}

/// Hover text for a marker; only locations with a place get one.
pub fn marker_tooltip(location: &Location) -> Option<String> {
    location.place().map(|place| {
        format!(
            "{}<br>{}",
            html_escape(place),
            html_escape(location.statement().as_str())
        )
    })
}

pub fn map_info(location_count: usize, connection_count: usize) -> String {
    format!(
        "Statement Location Index • {location_count} locations • {connection_count} connections"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use statemap_core::{ConnectionType, Coordinate, LocationProperties, Strength};

    fn dataset() -> Dataset {
        let mut props = LocationProperties::new("MAG-001");
        props.place = Some("Hill Top Road".to_string());
        props.summary = Some("First line\nSecond <line>".to_string());
        props.entity = Some("The Spiral".to_string());
        props.date = Some("2016".to_string());
        props.archivist_note = Some(BOILERPLATE_ARCHIVIST_NOTE.to_string());
        let first = Location::new(Coordinate::new(53.8, -1.5), props);
        let second = Location::new(Coordinate::new(51.5, 0.0), LocationProperties::new("MAG-002"));
        let mut connection =
            Connection::new("c1", "MAG-002", "MAG-001", ConnectionType::Location)
                .with_strength(Strength::Medium)
                .with_label("Same house");
        connection.episodes = vec!["MAG-001".into(), "MAG-002".into()];
        connection.characters = vec!["Michael".to_string()];
        connection.evidence = Some("Doors".to_string());
        Dataset::new(vec![first, second], vec![connection])
    }

    #[test]
    fn test_location_panel() {
        let dataset = dataset();
        let panel = render_location(&dataset.locations()[0], &dataset, false);

        assert!(panel.title.ends_with("Hill Top Road"));
        assert!(panel.meta.contains("MAG-001"));
        assert!(panel.meta.contains("background: #9932CC"));
        assert!(panel.body.starts_with("<p>First line</p><p>Second &lt;line&gt;</p>"));
        assert!(panel.body.contains("Statement given: 2016"));
        assert!(!panel.body.contains("Statement giver"));
        assert!(!panel.body.contains("Archivist's Note"));
        assert!(panel.body.contains("Connections (1)"));
        assert!(panel.body.contains("Show Connections"));
        assert!(panel.body.contains("→ MAG-002"));
        assert!(panel.body.contains(r#"data-action="show-connection" data-id="c1""#));
        assert!(panel.body.contains("background: #9932CC"));
    }

    #[test]
    fn test_location_defaults() {
        let bare = Location::new(Coordinate::default(), LocationProperties::new("MAG-404"));
        let dataset = Dataset::new(vec![bare.clone()], vec![]);
        let panel = render_location(&bare, &dataset, false);

        assert!(panel.title.ends_with(DEFAULT_TITLE));
        assert!(panel.meta.contains(DEFAULT_ENTITY));
        assert!(panel.meta.contains("#8B0000"));
        assert_eq!(panel.body, format!("<p>{DEFAULT_SUMMARY}</p>"));
    }

    #[test]
    fn test_location_without_statement_id() {
        let json = r#"{"features": [
            {"geometry": {"type": "Point", "coordinates": [-1.5, 53.8]}, "properties": {"place": "Leeds"}}
        ]}"#;
        let dataset = Dataset::from_json(json, "{}").unwrap();
        let panel = render_location(&dataset.locations()[0], &dataset, false);
        assert!(panel.meta.contains(DEFAULT_STATEMENT));
    }

    #[test]
    fn test_authored_archivist_note_is_shown() {
        let mut props = LocationProperties::new("MAG-003");
        props.archivist_note = Some("Tape damaged.".to_string());
        let location = Location::new(Coordinate::default(), props);
        let dataset = Dataset::new(vec![location.clone()], vec![]);
        let panel = render_location(&location, &dataset, false);
        assert!(panel.body.contains("Archivist's Note:</strong> Tape damaged."));
    }

    #[test]
    fn test_toggle_button_label_follows_visibility() {
        let dataset = dataset();
        let panel = render_location(&dataset.locations()[0], &dataset, true);
        assert!(panel.body.contains("Hide Connections"));
        assert!(panel.body.contains(r#"data-action="toggle-statement" data-statement="MAG-001""#));
    }

    #[test]
    fn test_connection_panel() {
        let dataset = dataset();
        let panel = render_connection(&dataset.connections()[0]);

        assert!(panel.title.ends_with("Connection Details"));
        assert!(panel.meta.contains("c1"));
        assert!(panel.body.contains("Same house"));
        assert!(panel.body.contains(r#"strength-medium">medium"#));
        assert!(panel.body.contains("Evidence"));
        assert!(panel.body.contains(r#"<span class="character-tag">Michael</span>"#));
        assert!(panel.body.contains(r#"data-action="highlight-statement" data-statement="MAG-002""#));
        assert!(panel.body.contains("Highlight This Connection"));
        assert!(panel.body.contains(r#"data-action="clear-connections""#));
    }

    #[test]
    fn test_connection_panel_omits_optional_sections() {
        let connection = Connection::new("c2", "MAG-001", "MAG-002", ConnectionType::Entity);
        let panel = render_connection(&connection);
        assert!(!panel.body.contains("Evidence"));
        assert!(!panel.body.contains("character-tag"));
        assert!(panel.body.contains("Related Episodes"));
    }

    #[test]
    fn test_placeholder_and_error() {
        let placeholder = render_placeholder();
        assert!(placeholder.title.contains(PLACEHOLDER_TITLE));
        assert!(placeholder.meta.contains(PLACEHOLDER_META));

        let error = render_error(&placeholder);
        assert_eq!(error.title, placeholder.title);
        assert!(error.body.contains(ERROR_BODY));
        assert!(error.body.contains(ERROR_HINT));
    }

    #[test]
    fn test_actions_round_trip_through_attributes() {
        let action = PanelAction::from_attributes("highlight-statement", Some("MAG-009")).unwrap();
        assert_eq!(
            action.into_event(),
            Event::StatementLinkClicked {
                statement: "MAG-009".into()
            }
        );
        assert_eq!(
            PanelAction::from_attributes("clear-connections", None),
            Some(PanelAction::ClearConnections)
        );
        assert_eq!(PanelAction::from_attributes("explode", Some("x")), None);
    }

    #[test]
    fn test_tooltip_and_map_info() {
        let dataset = dataset();
        assert_eq!(
            marker_tooltip(&dataset.locations()[0]).as_deref(),
            Some("Hill Top Road<br>MAG-001")
        );
        assert_eq!(marker_tooltip(&dataset.locations()[1]), None);
        assert_eq!(
            map_info(154, 12),
            "Statement Location Index • 154 locations • 12 connections"
        );
    }
}
