use crate::placetype::Placetype;
use geo::algorithm::area::Area;
use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::contains::Contains;
use geo_types::{MultiPolygon, Point};
use rstar::primitives::Rectangle;
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub mod source;

pub type Point2D = [f64; 2];

/// Values that count as "no usable value" in language properties.
const SENTINELS: [&str; 2] = ["unk", "und"];

/// A raw boundary property: either a single string or an ordered list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    List(Vec<String>),
}

impl PropertyValue {
    /// Converts a json property. Objects and nulls carry nothing we use.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(PropertyValue::List(
                items.iter().filter_map(scalar_text).collect(),
            )),
            other => scalar_text(other).map(PropertyValue::Text),
        }
    }

    /// The scalar, or the first list element.
    pub fn first(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            PropertyValue::List(items) => items.first().map(String::as_str),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            PropertyValue::Text(text) => text.is_empty(),
            PropertyValue::List(items) => items.is_empty(),
        }
    }

    /// "unk"/"und" either bare or as the only list element.
    pub fn is_sentinel(&self) -> bool {
        match self {
            PropertyValue::Text(text) => SENTINELS.contains(&text.as_str()),
            PropertyValue::List(items) => {
                items.len() == 1 && SENTINELS.contains(&items[0].as_str())
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        PropertyValue::Text(text.to_string())
    }
}

impl From<Vec<&str>> for PropertyValue {
    fn from(items: Vec<&str>) -> Self {
        PropertyValue::List(items.into_iter().map(String::from).collect())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PropertyBag(BTreeMap<String, PropertyValue>);

impl PropertyBag {
    pub fn new() -> Self {
        PropertyBag::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<PropertyValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    /// Present, non-empty and not a sentinel.
    pub fn usable(&self, key: &str) -> Option<&PropertyValue> {
        self.get(key)
            .filter(|value| !value.is_empty() && !value.is_sentinel())
    }

    /// First string of a property, skipping empty strings.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(PropertyValue::first)
            .filter(|text| !text.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        PropertyBag(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Ancestor ids per placetype. A boundary may sit in several hierarchies.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Hierarchy(pub Vec<BTreeMap<Placetype, i64>>);

impl Hierarchy {
    /// Reads `[{"country_id": 85633111, ...}, ...]`, dropping unknown
    /// placetypes and the non-positive ids used for "unset".
    pub fn from_json(value: &Value) -> Self {
        let branches = match value {
            Value::Array(branches) => branches,
            _ => return Hierarchy::default(),
        };
        let branches = branches
            .iter()
            .filter_map(Value::as_object)
            .map(|branch| {
                branch
                    .iter()
                    .filter_map(|(key, id)| {
                        let placetype: Placetype = key.strip_suffix("_id")?.parse().ok()?;
                        let id = id.as_i64().filter(|id| *id > 0)?;
                        Some((placetype, id))
                    })
                    .collect::<BTreeMap<Placetype, i64>>()
            })
            .filter(|branch| !branch.is_empty())
            .collect();
        Hierarchy(branches)
    }

    pub fn primary(&self) -> Option<&BTreeMap<Placetype, i64>> {
        self.0.first()
    }
}

/// One administrative polygon as read from the boundary source.
#[derive(Debug, Clone)]
pub struct BoundaryRecord {
    pub id: i64,
    pub placetype: Placetype,
    pub hierarchy: Hierarchy,
    pub geometry: MultiPolygon<f64>,
    pub properties: PropertyBag,
}

/// The query-path payload of an indexed polygon. Only good for hierarchy
/// linkage; the full bag lives in [`BoundaryProperties`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReducedProperties {
    pub id: i64,
    pub hierarchy: Hierarchy,
}

/// Everything known about a boundary, keyed by id in the layer's side mapping.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BoundaryProperties {
    pub id: i64,
    pub placetype: Placetype,
    pub name: String,
    pub hierarchy: Hierarchy,
    pub properties: PropertyBag,
}

pub type BoundaryData = BTreeMap<i64, BoundaryProperties>;

#[derive(Serialize, Deserialize, Debug)]
pub struct IndexedBoundary {
    rect: Rectangle<Point2D>,
    pub area: f64,
    pub mp: MultiPolygon<f64>,
    pub properties: ReducedProperties,
}

impl IndexedBoundary {
    /// `None` for empty geometries, which have no envelope.
    pub fn new(mp: MultiPolygon<f64>, properties: ReducedProperties) -> Option<Self> {
        let rect = mp.bounding_rect()?;
        let lower = [rect.min().x, rect.min().y];
        let upper = [rect.max().x, rect.max().y];
        let aabb = AABB::from_corners(lower, upper);
        let rect = Rectangle::from_aabb(aabb);
        let area = mp.unsigned_area();
        Some(IndexedBoundary {
            rect,
            area,
            mp,
            properties,
        })
    }

    pub fn id(&self) -> i64 {
        self.properties.id
    }

    pub fn contains(&self, point: &Point2D) -> bool {
        let [x, y] = point;
        self.mp.contains(&Point::new(*x, *y))
    }
}

impl RTreeObject for IndexedBoundary {
    type Envelope = AABB<Point2D>;

    fn envelope(&self) -> Self::Envelope {
        self.rect.envelope()
    }
}

impl PointDistance for IndexedBoundary {
    fn distance_2(&self, point: &Point2D) -> f64 {
        self.rect.distance_2(point)
    }
}
