//! Connection Line Style System
//!
//! Color, weight and dash lookups for connection lines, their labels, and the
//! entity tags shown in the detail panel.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use statemap_core::{Connection, ConnectionType, Coordinate, Location, Strength};
use std::fmt;

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let mut channels = hex.chars().filter_map(|c| c.to_digit(16)).map(|v| v as u8 * 17);
                Some(Self::rgb(channels.next()?, channels.next()?, channels.next()?))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => None,
        }
    }

    /// `#RRGGBB`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ============================================================================
// Color Constants
// ============================================================================

// Connection types
pub const COLOR_SAME_STATEMENT: Color = Color::rgb(0xFF, 0x6B, 0x6B);
pub const COLOR_ENTITY: Color = Color::rgb(0x8B, 0x00, 0x00);
pub const COLOR_ARTIFACT: Color = Color::rgb(0x8B, 0x45, 0x13);
pub const COLOR_CHARACTER: Color = Color::rgb(0x46, 0x82, 0xB4);
pub const COLOR_ORGANIZATION: Color = Color::rgb(0x32, 0xCD, 0x32);
pub const COLOR_LOCATION: Color = Color::rgb(0x99, 0x32, 0xCC);
pub const COLOR_TIMELINE: Color = Color::rgb(0xFF, 0xD7, 0x00);
pub const COLOR_CONNECTION_DEFAULT: Color = Color::rgb(0x66, 0x66, 0x66);

// Entity tags
pub const COLOR_ENTITY_DEFAULT: Color = Color::rgb(0x8B, 0x00, 0x00);

const ENTITY_COLORS: &[(&str, Color)] = &[
    ("The Spiral", Color::rgb(0x99, 0x32, 0xCC)),
    ("The Stranger", Color::rgb(0x8B, 0x00, 0x00)),
    ("The Eye", Color::rgb(0xFF, 0xD7, 0x00)),
    ("The Lonely", Color::rgb(0x46, 0x82, 0xB4)),
    ("The Buried", Color::rgb(0x8B, 0x45, 0x13)),
    ("The Corruption", Color::rgb(0x32, 0xCD, 0x32)),
    ("The Desolation", Color::rgb(0xFF, 0x45, 0x00)),
    ("The Hunt", Color::rgb(0xA0, 0x52, 0x2D)),
    ("The Slaughter", Color::rgb(0xDC, 0x14, 0x3C)),
    ("The Vast", Color::rgb(0x1E, 0x90, 0xFF)),
    ("The Web", Color::rgb(0x4B, 0x00, 0x82)),
    ("The End", Color::rgb(0x00, 0x00, 0x00)),
    ("The Flesh", Color::rgb(0xFF, 0x69, 0xB4)),
    ("The Dark", Color::rgb(0x2F, 0x4F, 0x4F)),
];

// Opacity levels
pub const OPACITY_HIDDEN: f32 = 0.0;
pub const OPACITY_LINE_HIGHLIGHT: f32 = 0.7;
pub const OPACITY_LABEL_HIGHLIGHT: f32 = 1.0;

/// Dash pattern for every connection type except `same_statement`.
pub const DASH_PATTERN: &str = "10, 10";

// ============================================================================
// Style Functions
// ============================================================================

/// Visual style of one connection line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: Color,
    pub weight: u8,
    /// `None` draws a solid line.
    pub dash: Option<&'static str>,
}

/// Fixed table color for a connection type, if it has one.
pub fn get_type_color(kind: &ConnectionType) -> Option<Color> {
    match kind {
        ConnectionType::SameStatement => Some(COLOR_SAME_STATEMENT),
        ConnectionType::Entity => Some(COLOR_ENTITY),
        ConnectionType::Artifact => Some(COLOR_ARTIFACT),
        ConnectionType::Character => Some(COLOR_CHARACTER),
        ConnectionType::Organization => Some(COLOR_ORGANIZATION),
        ConnectionType::Location => Some(COLOR_LOCATION),
        ConnectionType::Timeline => Some(COLOR_TIMELINE),
        ConnectionType::Other(_) => None,
    }
}

/// Resolve a connection's color: type table, then the record's own override,
/// then the default gray.
pub fn get_connection_color(connection: &Connection) -> Color {
    get_type_color(&connection.kind)
        .or_else(|| connection.color.as_deref().and_then(Color::from_hex))
        .unwrap_or(COLOR_CONNECTION_DEFAULT)
}

pub fn get_line_weight(strength: &Strength) -> u8 {
    match strength {
        Strength::High => 4,
        Strength::Medium => 3,
        _ => 2,
    }
}

pub fn get_dash_pattern(kind: &ConnectionType) -> Option<&'static str> {
    match kind {
        ConnectionType::SameStatement => None,
        _ => Some(DASH_PATTERN),
    }
}

pub fn get_line_style(connection: &Connection) -> LineStyle {
    LineStyle {
        color: get_connection_color(connection),
        weight: get_line_weight(&connection.strength),
        dash: get_dash_pattern(&connection.kind),
    }
}

/// Color of the entity tag in the location panel.
pub fn get_entity_color(entity: &str) -> Color {
    ENTITY_COLORS
        .iter()
        .find(|(name, _)| *name == entity)
        .map(|(_, color)| *color)
        .unwrap_or(COLOR_ENTITY_DEFAULT)
}

/// Marker cluster icon size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterSize {
    Small,
    Medium,
    Large,
}

impl ClusterSize {
    pub fn for_count(count: usize) -> Self {
        if count > 20 {
            Self::Large
        } else if count > 10 {
            Self::Medium
        } else {
            Self::Small
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Small => "marker-cluster-small",
            Self::Medium => "marker-cluster-medium",
            Self::Large => "marker-cluster-large",
        }
    }
}

/// Markers sharing one exact coordinate. They stay clustered at every zoom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStack {
    pub coordinate: Coordinate,
    pub count: usize,
    pub size: ClusterSize,
}

/// Every coordinate holding more than one marker, in first-seen order.
pub fn stack_markers(locations: &[Location]) -> Vec<MarkerStack> {
    let mut counts: IndexMap<(u64, u64), (Coordinate, usize)> = IndexMap::new();
    for location in locations {
        let c = location.coordinate;
        counts
            .entry((c.lat.to_bits(), c.lng.to_bits()))
            .or_insert((c, 0))
            .1 += 1;
    }
    counts
        .into_values()
        .filter(|(_, count)| *count > 1)
        .map(|(coordinate, count)| MarkerStack {
            coordinate,
            count,
            size: ClusterSize::for_count(count),
        })
        .collect()
}
