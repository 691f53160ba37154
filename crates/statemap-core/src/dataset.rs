use crate::connection::parse_connections;
use crate::location::parse_locations;
use crate::{
    Connection, ConnectionId, ConnectionRef, DatasetError, Location, LocationIndex, StatementId,
};

/// The two loaded resources, immutable for the rest of the session.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    locations: Vec<Location>,
    connections: Vec<Connection>,
}

impl Dataset {
    /// Build a dataset, renumbering locations by their position.
    pub fn new(mut locations: Vec<Location>, connections: Vec<Connection>) -> Self {
        for (i, location) in locations.iter_mut().enumerate() {
            location.index = LocationIndex(i);
        }
        Self {
            locations,
            connections,
        }
    }

    pub fn from_json(locations_json: &str, connections_json: &str) -> Result<Self, DatasetError> {
        let locations = parse_locations(locations_json)?;
        let connections = parse_connections(connections_json)?;
        Ok(Self::new(locations, connections))
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn location(&self, index: LocationIndex) -> Option<&Location> {
        self.locations.get(index.0)
    }

    pub fn connection_at(&self, connection: ConnectionRef) -> Option<&Connection> {
        self.connections.get(connection.0)
    }

    /// Every location recorded for `statement`, in dataset order.
    pub fn locations_for<'a>(
        &'a self,
        statement: &StatementId,
    ) -> impl Iterator<Item = &'a Location> {
        self.locations
            .iter()
            .filter(move |loc| loc.statement() == statement)
    }

    pub fn first_location_for(&self, statement: &StatementId) -> Option<&Location> {
        self.locations_for(statement).next()
    }

    /// Every connection with `statement` as either endpoint, in dataset order.
    pub fn connections_for<'a>(
        &'a self,
        statement: &StatementId,
    ) -> impl Iterator<Item = (ConnectionRef, &'a Connection)> {
        self.connections
            .iter()
            .enumerate()
            .filter(move |(_, conn)| conn.touches(statement))
            .map(|(i, conn)| (ConnectionRef(i), conn))
    }

    /// Look up a connection by id. When ids repeat, the last record wins.
    pub fn connection(&self, id: &ConnectionId) -> Option<(ConnectionRef, &Connection)> {
        self.connections
            .iter()
            .rposition(|conn| &conn.id == id)
            .map(|i| (ConnectionRef(i), &self.connections[i]))
    }
}
