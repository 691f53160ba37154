use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the two static resources an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Locations,
    Connections,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locations => write!(f, "locations"),
            Self::Connections => write!(f, "connections"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read {resource} from {}: {source}", path.display())]
    Io {
        resource: Resource,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {resource}: {source}")]
    Parse {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },
    #[error("Feature {feature} has unsupported geometry type {kind:?}")]
    UnsupportedGeometry { feature: usize, kind: String },
    #[error("Feature {feature} has invalid coordinates")]
    InvalidCoordinates { feature: usize },
}

impl DatasetError {
    pub fn resource(&self) -> Resource {
        match self {
            Self::Io { resource, .. } | Self::Parse { resource, .. } => *resource,
            Self::UnsupportedGeometry { .. } | Self::InvalidCoordinates { .. } => {
                Resource::Locations
            }
        }
    }
}
