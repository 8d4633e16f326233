use super::{BoundaryRecord, Hierarchy, PropertyBag, PropertyValue};
use crate::error::SourceError;
use crate::placetype::Placetype;
use geo_types::{Geometry, MultiPolygon};
use geojson::{Feature, GeoJson};
use rayon::prelude::*;
use serde_json::Value;
use std::convert::TryFrom;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where a layer's boundary records come from.
pub trait BoundarySource {
    fn read_layer(&self, layer: Placetype) -> Result<Vec<BoundaryRecord>, SourceError>;
}

/// In-memory records, filtered by placetype.
impl BoundarySource for Vec<BoundaryRecord> {
    fn read_layer(&self, layer: Placetype) -> Result<Vec<BoundaryRecord>, SourceError> {
        Ok(self
            .iter()
            .filter(|record| record.placetype == layer)
            .cloned()
            .collect())
    }
}

/// Reads `<data_path>/<layer>.geojson` feature collections with
/// who's-on-first style properties.
#[derive(Debug, Clone)]
pub struct GeoJsonSource {
    data_path: PathBuf,
}

impl GeoJsonSource {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        GeoJsonSource {
            data_path: data_path.into(),
        }
    }

    pub fn layer_path(&self, layer: Placetype) -> PathBuf {
        self.data_path.join(format!("{}.geojson", layer))
    }
}

impl BoundarySource for GeoJsonSource {
    fn read_layer(&self, layer: Placetype) -> Result<Vec<BoundaryRecord>, SourceError> {
        let path = self.layer_path(layer);
        let features = read_features(&path)?;
        let total = features.len();
        let records: Vec<BoundaryRecord> = features
            .into_par_iter()
            .filter_map(|feature| match record_from_feature(feature, layer) {
                Ok(record) => Some(record),
                Err(reason) => {
                    debug!(%layer, reason, "skipping feature");
                    None
                }
            })
            .collect();
        info!(%layer, total, accepted = records.len(), "read boundary features");
        Ok(records)
    }
}

fn read_features(path: &Path) -> Result<Vec<Feature>, SourceError> {
    let raw = fs::read_to_string(path)?;
    match raw.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection.features),
        _ => Err(SourceError::NotACollection(path.to_path_buf())),
    }
}

fn record_from_feature(feature: Feature, layer: Placetype) -> Result<BoundaryRecord, &'static str> {
    let props = feature.properties.as_ref().ok_or("no properties")?;
    let id = props
        .get("wof:id")
        .and_then(|id| match id {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
        .ok_or("no wof:id")?;
    let placetype: Placetype = props
        .get("wof:placetype")
        .and_then(Value::as_str)
        .and_then(|placetype| placetype.parse().ok())
        .ok_or("unsupported wof:placetype")?;
    if placetype != layer {
        return Err("placetype belongs to another layer");
    }
    let hierarchy = props
        .get("wof:hierarchy")
        .map(Hierarchy::from_json)
        .unwrap_or_default();
    let properties: PropertyBag = props
        .iter()
        .filter(|(key, _)| key.as_str() != "wof:hierarchy")
        .filter_map(|(key, value)| Some((key.as_str(), PropertyValue::from_json(value)?)))
        .collect();

    let geometry = feature.geometry.ok_or("no geometry")?;
    let geometry = Geometry::<f64>::try_from(geometry).map_err(|_| "invalid geometry")?;
    let geometry = match geometry {
        Geometry::MultiPolygon(mp) => mp,
        Geometry::Polygon(p) => MultiPolygon(vec![p]),
        _ => return Err("geometry is not polygonal"),
    };

    Ok(BoundaryRecord {
        id,
        placetype,
        hierarchy,
        geometry,
        properties,
    })
}
