//! Connection Index
//!
//! Every connection is expanded once, at load time, into a layer holding one
//! line (and optionally one midpoint label) per location pair spanned by its
//! two statements. Layers start invisible and are never rebuilt.

use crate::style::{
    Color, LineStyle, OPACITY_HIDDEN, OPACITY_LABEL_HIGHLIGHT, OPACITY_LINE_HIGHLIGHT,
    get_connection_color, get_line_style, get_type_color,
};
use indexmap::IndexMap;
use serde::Serialize;
use statemap_core::{
    Connection, ConnectionId, ConnectionRef, Coordinate, Location, LocationIndex, StatementId,
};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionLine {
    pub connection: ConnectionRef,
    pub from: LocationIndex,
    pub to: LocationIndex,
    pub path: [Coordinate; 2],
    pub style: LineStyle,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionLabel {
    pub connection: ConnectionRef,
    pub position: Coordinate,
    pub text: String,
    pub color: Color,
    pub opacity: f32,
}

/// All visual elements of one connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionLayer {
    pub connection: ConnectionRef,
    pub lines: Vec<ConnectionLine>,
    pub labels: Vec<ConnectionLabel>,
}

impl ConnectionLayer {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_visible(&self) -> bool {
        self.lines.iter().any(|l| l.opacity > OPACITY_HIDDEN)
            || self.labels.iter().any(|l| l.opacity > OPACITY_HIDDEN)
    }

    pub fn show(&mut self) {
        for line in &mut self.lines {
            line.opacity = OPACITY_LINE_HIGHLIGHT;
        }
        for label in &mut self.labels {
            label.opacity = OPACITY_LABEL_HIGHLIGHT;
        }
    }

    /// Reset every element to invisible. Returns whether anything changed.
    pub fn hide(&mut self) -> bool {
        let changed = self.is_visible();
        for line in &mut self.lines {
            line.opacity = OPACITY_HIDDEN;
        }
        for label in &mut self.labels {
            label.opacity = OPACITY_HIDDEN;
        }
        changed
    }
}

/// Non-fatal issue found while building the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BuildWarning {
    /// One or both endpoints resolved to zero locations; the connection has no layer.
    MissingLocations {
        connection: ConnectionId,
        missing: Vec<StatementId>,
    },
    /// A later record reused an id; its layer replaced the earlier one.
    DuplicateId { connection: ConnectionId },
    /// The color override could not be parsed and was ignored.
    InvalidColor {
        connection: ConnectionId,
        color: String,
    },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLocations {
                connection,
                missing,
            } => {
                let missing: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
                write!(
                    f,
                    "Could not find locations for connection {connection} (missing: {})",
                    missing.join(", ")
                )
            }
            Self::DuplicateId { connection } => {
                write!(f, "Duplicate connection id {connection}; later record wins")
            }
            Self::InvalidColor { connection, color } => {
                write!(f, "Connection {connection} has unusable color {color:?}")
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ConnectionIndex {
    layers: IndexMap<ConnectionId, ConnectionLayer>,
    by_statement: HashMap<StatementId, Vec<ConnectionId>>,
    warnings: Vec<BuildWarning>,
}

impl ConnectionIndex {
    /// Build one layer per connection. `ConnectionRef`s point into `connections`.
    pub fn build(locations: &[Location], connections: &[Connection]) -> Self {
        let mut by_location: HashMap<&StatementId, Vec<&Location>> = HashMap::new();
        for location in locations {
            by_location
                .entry(location.statement())
                .or_default()
                .push(location);
        }

        let mut index = Self::default();

        for (position, connection) in connections.iter().enumerate() {
            index.record_endpoints(connection);

            let from_locations = by_location
                .get(&connection.from)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let to_locations = by_location
                .get(&connection.to)
                .map(Vec::as_slice)
                .unwrap_or_default();

            if from_locations.is_empty() || to_locations.is_empty() {
                let mut missing = Vec::new();
                if from_locations.is_empty() {
                    missing.push(connection.from.clone());
                }
                if to_locations.is_empty() && connection.to != connection.from {
                    missing.push(connection.to.clone());
                }
                index.warn(BuildWarning::MissingLocations {
                    connection: connection.id.clone(),
                    missing,
                });
                continue;
            }

            if let Some(color) = &connection.color
                && get_type_color(&connection.kind).is_none()
                && Color::from_hex(color).is_none()
            {
                index.warn(BuildWarning::InvalidColor {
                    connection: connection.id.clone(),
                    color: color.clone(),
                });
            }

            let layer = build_layer(
                ConnectionRef(position),
                connection,
                from_locations,
                to_locations,
            );

            if index.layers.insert(connection.id.clone(), layer).is_some() {
                index.warn(BuildWarning::DuplicateId {
                    connection: connection.id.clone(),
                });
            }
        }

        tracing::info!(
            layers = index.layers.len(),
            warnings = index.warnings.len(),
            "Built connection index"
        );
        index
    }

    fn record_endpoints(&mut self, connection: &Connection) {
        let mut push = |statement: &StatementId| {
            let ids = self.by_statement.entry(statement.clone()).or_default();
            if !ids.contains(&connection.id) {
                ids.push(connection.id.clone());
            }
        };
        push(&connection.from);
        push(&connection.to);
    }

    fn warn(&mut self, warning: BuildWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn layer(&self, id: &ConnectionId) -> Option<&ConnectionLayer> {
        self.layers.get(id)
    }

    pub fn layer_mut(&mut self, id: &ConnectionId) -> Option<&mut ConnectionLayer> {
        self.layers.get_mut(id)
    }

    pub fn layers(&self) -> impl Iterator<Item = (&ConnectionId, &ConnectionLayer)> {
        self.layers.iter()
    }

    pub fn layers_mut(&mut self) -> impl Iterator<Item = (&ConnectionId, &mut ConnectionLayer)> {
        self.layers.iter_mut()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.layers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn total_lines(&self) -> usize {
        self.layers.values().map(ConnectionLayer::line_count).sum()
    }

    /// Ids of every connection with `statement` as an endpoint, in dataset
    /// order. Includes connections that were skipped during the build.
    pub fn connections_touching(&self, statement: &StatementId) -> &[ConnectionId] {
        self.by_statement
            .get(statement)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }
}

fn build_layer(
    reference: ConnectionRef,
    connection: &Connection,
    from_locations: &[&Location],
    to_locations: &[&Location],
) -> ConnectionLayer {
    let style = get_line_style(connection);
    let label_color = get_connection_color(connection);
    let mut lines = Vec::with_capacity(from_locations.len() * to_locations.len());
    let mut labels = Vec::new();

    for from in from_locations {
        for to in to_locations {
            if from.index == to.index {
                continue;
            }

            lines.push(ConnectionLine {
                connection: reference,
                from: from.index,
                to: to.index,
                path: [from.coordinate, to.coordinate],
                style: style.clone(),
                opacity: OPACITY_HIDDEN,
            });

            if let Some(text) = &connection.label {
                labels.push(ConnectionLabel {
                    connection: reference,
                    position: from.coordinate.midpoint(&to.coordinate),
                    text: text.clone(),
                    color: label_color,
                    opacity: OPACITY_HIDDEN,
                });
            }
        }
    }

    ConnectionLayer {
        connection: reference,
        lines,
        labels,
    }
}
