//! The slice of a geocodable document this crate reads and writes.

use crate::placetype::Placetype;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub lat: f64,
    pub lon: f64,
}

/// Admin level names, one slot per layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminNames {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin0: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_admin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbourhood: Option<String>,
}

impl AdminNames {
    fn slot(&mut self, placetype: Placetype) -> &mut Option<String> {
        match placetype {
            Placetype::Country => &mut self.admin0,
            Placetype::Region => &mut self.admin1,
            Placetype::County => &mut self.admin2,
            Placetype::Locality => &mut self.locality,
            Placetype::LocalAdmin => &mut self.local_admin,
            Placetype::Neighbourhood => &mut self.neighbourhood,
        }
    }

    pub fn get(&self, placetype: Placetype) -> Option<&str> {
        let name = match placetype {
            Placetype::Country => &self.admin0,
            Placetype::Region => &self.admin1,
            Placetype::County => &self.admin2,
            Placetype::Locality => &self.locality,
            Placetype::LocalAdmin => &self.local_admin,
            Placetype::Neighbourhood => &self.neighbourhood,
        };
        name.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        Placetype::all().iter().all(|placetype| self.get(*placetype).is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    pub placetype: Placetype,
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub layer: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<Centroid>,
    #[serde(default, skip_serializing_if = "AdminNames::is_empty")]
    pub admin: AdminNames,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<Parent>,
    /// Fields owned by other pipeline stages, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn new(source: &str, layer: &str, source_id: &str) -> Self {
        Document {
            source: source.to_string(),
            layer: layer.to_string(),
            source_id: source_id.to_string(),
            ..Document::default()
        }
    }

    pub fn with_centroid(mut self, lat: f64, lon: f64) -> Self {
        self.centroid = Some(Centroid { lat, lon });
        self
    }

    pub fn set_admin(&mut self, placetype: Placetype, name: &str) -> &mut Self {
        *self.admin.slot(placetype) = Some(name.to_string());
        self
    }

    pub fn admin(&self, placetype: Placetype) -> Option<&str> {
        self.admin.get(placetype)
    }

    pub fn add_parent(&mut self, placetype: Placetype, name: &str, id: &str) -> &mut Self {
        self.parents.push(Parent {
            placetype,
            name: name.to_string(),
            id: id.to_string(),
        });
        self
    }
}
