use crate::error::{DatasetError, Resource};
use crate::{ConnectionId, StatementId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship category, used for color coding.
///
/// The vocabulary is small but open: unrecognized tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionType {
    SameStatement,
    Entity,
    Artifact,
    Character,
    Organization,
    Location,
    Timeline,
    Other(String),
}

impl ConnectionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::SameStatement => "same_statement",
            Self::Entity => "entity",
            Self::Artifact => "artifact",
            Self::Character => "character",
            Self::Organization => "organization",
            Self::Location => "location",
            Self::Timeline => "timeline",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for ConnectionType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ConnectionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "same_statement" => Self::SameStatement,
            "entity" => Self::Entity,
            "artifact" => Self::Artifact,
            "character" => Self::Character,
            "organization" => Self::Organization,
            "location" => Self::Location,
            "timeline" => Self::Timeline,
            _ => Self::Other(value),
        }
    }
}

impl From<ConnectionType> for String {
    fn from(value: ConnectionType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength tier of a connection; drives line weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Strength {
    High,
    Medium,
    Low,
    Other(String),
}

impl Strength {
    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for Strength {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for Strength {
    fn from(value: String) -> Self {
        match value.as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Other(value),
        }
    }
}

impl From<Strength> for String {
    fn from(value: Strength) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, labeled relationship between two statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: StatementId,
    pub to: StatementId,
    #[serde(rename = "type", default)]
    pub kind: ConnectionType,
    #[serde(default)]
    pub strength: Strength,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub episodes: Vec<StatementId>,
    /// Color override, consulted only when the type has no table entry.
    #[serde(default)]
    pub color: Option<String>,
}

impl Connection {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        kind: ConnectionType,
    ) -> Self {
        Self {
            id: ConnectionId::new(id),
            from: StatementId::new(from),
            to: StatementId::new(to),
            kind,
            strength: Strength::default(),
            label: None,
            description: String::new(),
            evidence: None,
            characters: Vec::new(),
            episodes: Vec::new(),
            color: None,
        }
    }

    pub fn with_strength(mut self, strength: Strength) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether `statement` is either endpoint.
    pub fn touches(&self, statement: &StatementId) -> bool {
        &self.from == statement || &self.to == statement
    }

    /// The endpoint on the other side of `statement`.
    pub fn other_end(&self, statement: &StatementId) -> &StatementId {
        if &self.from == statement {
            &self.to
        } else {
            &self.from
        }
    }
}

#[derive(Deserialize)]
struct ConnectionsFile {
    #[serde(default)]
    connections: Vec<Connection>,
}

/// Parse the connections resource: an object with a `connections` array.
/// A missing array is treated as zero connections.
pub fn parse_connections(json: &str) -> Result<Vec<Connection>, DatasetError> {
    let file: ConnectionsFile =
        serde_json::from_str(json).map_err(|source| DatasetError::Parse {
            resource: Resource::Connections,
            source,
        })?;
    Ok(file.connections)
}
