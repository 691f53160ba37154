use statemap_core::{Dataset, DatasetError, Resource};
use std::path::Path;

async fn read_resource(resource: Resource, path: &Path) -> Result<String, DatasetError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DatasetError::Io {
            resource,
            path: path.to_path_buf(),
            source,
        })
}

/// Read both resources concurrently and parse them together.
///
/// Nothing is returned unless both reads and both parses succeed.
pub async fn load_datasets(
    locations_path: &Path,
    connections_path: &Path,
) -> Result<Dataset, DatasetError> {
    let (locations_json, connections_json) = tokio::try_join!(
        read_resource(Resource::Locations, locations_path),
        read_resource(Resource::Connections, connections_path),
    )?;

    let dataset = Dataset::from_json(&locations_json, &connections_json)?;
    tracing::info!(
        locations = dataset.location_count(),
        connections = dataset.connection_count(),
        "Loaded datasets"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATIONS: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-1.5, 53.8]},
         "properties": {"statement": "MAG-001", "place": "Leeds"}}
    ]}"#;

    #[tokio::test]
    async fn test_loads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let locations = dir.path().join("locations.geojson");
        let connections = dir.path().join("connections.json");
        std::fs::write(&locations, LOCATIONS).unwrap();
        std::fs::write(&connections, r#"{"connections": []}"#).unwrap();

        let dataset = load_datasets(&locations, &connections).await.unwrap();
        assert_eq!(dataset.location_count(), 1);
        assert_eq!(dataset.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_connections_file_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let locations = dir.path().join("locations.geojson");
        std::fs::write(&locations, LOCATIONS).unwrap();

        let err = load_datasets(&locations, &dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Io {
                resource: Resource::Connections,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_reports_resource() {
        let dir = tempfile::tempdir().unwrap();
        let locations = dir.path().join("locations.geojson");
        let connections = dir.path().join("connections.json");
        std::fs::write(&locations, "not json").unwrap();
        std::fs::write(&connections, r#"{"connections": []}"#).unwrap();

        let err = load_datasets(&locations, &connections).await.unwrap_err();
        assert_eq!(err.resource(), Resource::Locations);
    }
}
