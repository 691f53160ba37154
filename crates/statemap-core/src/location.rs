use crate::error::{DatasetError, Resource};
use crate::{Coordinate, LocationIndex, StatementId};
use serde::{Deserialize, Serialize};

/// Properties bag of a location feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationProperties {
    #[serde(default)]
    pub statement: StatementId,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub statement_giver: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub supplemental: Option<String>,
    #[serde(default)]
    pub archivist_note: Option<String>,
    #[serde(default)]
    pub location_type: Option<String>,
}

impl LocationProperties {
    pub fn new(statement: impl Into<StatementId>) -> Self {
        Self {
            statement: statement.into(),
            place: None,
            summary: None,
            date: None,
            statement_giver: None,
            entity: None,
            supplemental: None,
            archivist_note: None,
            location_type: None,
        }
    }
}

/// A geotagged point belonging to one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub index: LocationIndex,
    pub coordinate: Coordinate,
    pub properties: LocationProperties,
}

impl Location {
    pub fn new(coordinate: Coordinate, properties: LocationProperties) -> Self {
        Self {
            index: LocationIndex(0),
            coordinate,
            properties,
        }
    }

    pub fn statement(&self) -> &StatementId {
        &self.properties.statement
    }

    pub fn place(&self) -> Option<&str> {
        self.properties.place.as_deref()
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.properties.place = Some(place.into());
        self
    }
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Geometry,
    properties: LocationProperties,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: serde_json::Value,
}

/// Parse a GeoJSON `FeatureCollection` of point features.
///
/// GeoJSON orders coordinates `[lng, lat]`; the returned locations carry
/// their dataset position in `index`.
pub fn parse_locations(json: &str) -> Result<Vec<Location>, DatasetError> {
    let collection: FeatureCollection =
        serde_json::from_str(json).map_err(|source| DatasetError::Parse {
            resource: Resource::Locations,
            source,
        })?;

    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| {
            if feature.geometry.kind != "Point" {
                return Err(DatasetError::UnsupportedGeometry {
                    feature: i,
                    kind: feature.geometry.kind,
                });
            }
            let coords: Vec<f64> = feature
                .geometry
                .coordinates
                .as_array()
                .map(|values| values.iter().filter_map(|v| v.as_f64()).collect())
                .unwrap_or_default();
            let (lng, lat) = match coords.as_slice() {
                [lng, lat, ..] => (*lng, *lat),
                _ => return Err(DatasetError::InvalidCoordinates { feature: i }),
            };
            Ok(Location {
                index: LocationIndex(i),
                coordinate: Coordinate::new(lat, lng),
                properties: feature.properties,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_swaps_to_lat_lng() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-1.5, 53.8] },
                    "properties": { "statement": "MAG-001", "place": "Leeds", "entity": "The Web" }
                }
            ]
        }"#;
        let locations = parse_locations(json).unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].coordinate, Coordinate::new(53.8, -1.5));
        assert_eq!(locations[0].statement().as_str(), "MAG-001");
        assert_eq!(locations[0].place(), Some("Leeds"));
        assert_eq!(locations[0].properties.entity.as_deref(), Some("The Web"));
        assert_eq!(locations[0].properties.date, None);
    }

    #[test]
    fn test_parse_assigns_dataset_positions() {
        let json = r#"{"features": [
            {"geometry": {"type": "Point", "coordinates": [0, 0]}, "properties": {"statement": "MAG-001"}},
            {"geometry": {"type": "Point", "coordinates": [1, 1]}, "properties": {"statement": "MAG-001"}}
        ]}"#;
        let locations = parse_locations(json).unwrap();
        assert_eq!(locations[0].index, LocationIndex(0));
        assert_eq!(locations[1].index, LocationIndex(1));
    }

    #[test]
    fn test_missing_statement_parses_as_empty() {
        let json = r#"{"features": [
            {"geometry": {"type": "Point", "coordinates": [0, 0]}, "properties": {"place": "Hill Top"}}
        ]}"#;
        let locations = parse_locations(json).unwrap();
        assert!(locations[0].statement().as_str().is_empty());
        assert_eq!(locations[0].place(), Some("Hill Top"));
    }

    #[test]
    fn test_parse_rejects_non_point_geometry() {
        let json = r#"{"features": [
            {"geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}, "properties": {"statement": "MAG-001"}}
        ]}"#;
        let err = parse_locations(json).unwrap_err();
        assert!(matches!(err, DatasetError::UnsupportedGeometry { feature: 0, .. }));
    }

    #[test]
    fn test_parse_rejects_short_coordinates() {
        let json = r#"{"features": [
            {"geometry": {"type": "Point", "coordinates": [0]}, "properties": {"statement": "MAG-001"}}
        ]}"#;
        let err = parse_locations(json).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidCoordinates { feature: 0 }));
    }

    #[test]
    fn test_parse_reports_invalid_json_as_locations_error() {
        let err = parse_locations("{ not json").unwrap_err();
        assert_eq!(err.resource(), Resource::Locations);
    }
}
