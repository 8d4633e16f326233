use crate::document::Centroid;
use crate::error::CoordsError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A point as it travels to a layer worker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coords {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, CoordsError> {
        if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordsError::OutOfRange(longitude, latitude));
        }
        Ok(Coords {
            longitude,
            latitude,
        })
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.longitude, coords.latitude]
    }
}

impl From<Centroid> for Coords {
    fn from(centroid: Centroid) -> Self {
        Coords {
            longitude: centroid.lon,
            latitude: centroid.lat,
        }
    }
}

impl FromStr for Coords {
    type Err = CoordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(CoordsError::Format(s.to_string()));
        }
        let lng = parts[0].trim().parse::<f64>()?;
        let lat = parts[1].trim().parse::<f64>()?;
        Coords::new(lng, lat)
    }
}
