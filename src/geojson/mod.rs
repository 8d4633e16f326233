use crate::boundary::{BoundaryData, IndexedBoundary};
use geojson::{Feature, Geometry, Value};
use serde_json::map::Map;
use std::fs::write;
use std::path::Path;

impl IndexedBoundary {
    /// The polygon as a feature, with its id and display name when known.
    pub fn to_feature(&self, data: &BoundaryData) -> Feature {
        let mut properties = Map::new();
        properties.insert("id".to_string(), self.id().into());
        if let Some(props) = data.get(&self.id()) {
            properties.insert("name".to_string(), props.name.clone().into());
            properties.insert("placetype".to_string(), props.placetype.as_str().into());
        }

        let value = Value::from(&self.mp);
        let geometry = Geometry::new(value);

        Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

pub fn write_geojson(
    path: &Path,
    boundaries: &[&IndexedBoundary],
    data: &BoundaryData,
) -> Result<(), std::io::Error> {
    let features = boundaries
        .iter()
        .map(|boundary| boundary.to_feature(data))
        .collect();

    let feature_collection = geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    write(path, feature_collection.to_string())
}
