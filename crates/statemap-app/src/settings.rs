use serde::{Deserialize, Serialize};
use statemap_core::Coordinate;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write settings to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasSettings {
    pub data: DataSettings,
    pub view: ViewSettings,
    pub clusters: ClusterSettings,
    pub jump: JumpSettings,
    pub search: SearchSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub locations: PathBuf,
    pub connections: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            locations: PathBuf::from("data/locations.geojson"),
            connections: PathBuf::from("data/connections.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// `[lat, lng]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub fit_padding: u32,
    pub fit_max_zoom: u8,
}

impl ViewSettings {
    pub fn center_coordinate(&self) -> Coordinate {
        Coordinate::new(self.center[0], self.center[1])
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            center: [54.0, -2.0],
            zoom: 5,
            min_zoom: 2,
            max_zoom: 20,
            fit_padding: 50,
            fit_max_zoom: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSettings {
    pub max_radius: u32,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self { max_radius: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpSettings {
    pub zoom: u8,
    pub fly_duration_ms: u64,
    pub emphasis_duration_ms: u64,
}

impl JumpSettings {
    pub fn fly_duration(&self) -> Duration {
        Duration::from_millis(self.fly_duration_ms)
    }

    pub fn emphasis_duration(&self) -> Duration {
        Duration::from_millis(self.emphasis_duration_ms)
    }
}

impl Default for JumpSettings {
    fn default() -> Self {
        Self {
            zoom: 12,
            fly_duration_ms: 1500,
            emphasis_duration_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub blur_hide_delay_ms: u64,
}

impl SearchSettings {
    pub fn blur_hide_delay(&self) -> Duration {
        Duration::from_millis(self.blur_hide_delay_ms)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            blur_hide_delay_ms: 200,
        }
    }
}

impl AtlasSettings {
    /// `<config dir>/statemap/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("statemap").join("settings.json"))
    }

    /// Load from an explicit file. Any failure is an error.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        tracing::info!("Loading settings from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the per-user config directory, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// `explicit` wins when given; otherwise the per-user file.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Ok(Self::load()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
