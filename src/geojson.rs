//! GeoJSON feature model (RFC 7946 subset: Polygon and MultiPolygon).

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single coordinate position, `[lon, lat]` (extra ordinates are ignored).
pub type Position = Vec<f64>;

/// A linear ring of positions.
pub type Ring = Vec<Position>;

/// Feature geometry. Only the polygonal types appear in district and
/// precinct boundary files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

/// A geometry plus a mapping of named properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default, deserialize_with = "properties_or_empty")]
    pub properties: Map<String, Value>,
}

/// RFC 7946 allows `"properties": null`; treat it as an empty map.
fn properties_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// An ordered sequence of features. Order is insertion order from the
/// source file and is preserved through every transformation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl Geometry {
    /// Convert to a `geo::MultiPolygon`, closing any ring whose first and
    /// last coordinates differ. Positions with fewer than two ordinates are
    /// skipped; a degenerate geometry yields an empty MultiPolygon rather
    /// than an error.
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        match self {
            Geometry::Polygon { coordinates } => MultiPolygon(vec![rings_to_polygon(coordinates)]),
            Geometry::MultiPolygon { coordinates } => {
                MultiPolygon(coordinates.iter().map(|rings| rings_to_polygon(rings)).collect())
            }
        }
    }

    /// Build a GeoJSON MultiPolygon geometry from a `geo::MultiPolygon`.
    pub fn from_multi_polygon(mp: &MultiPolygon<f64>) -> Self {
        let coordinates = mp.0.iter().map(|polygon| {
            let mut rings: Vec<Ring> = Vec::with_capacity(1 + polygon.interiors().len());
            rings.push(line_string_to_ring(polygon.exterior()));
            rings.extend(polygon.interiors().iter().map(line_string_to_ring));
            rings
        }).collect();
        Geometry::MultiPolygon { coordinates }
    }
}

fn ring_to_line_string(ring: &[Position]) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = ring.iter()
        .filter(|position| position.len() >= 2)
        .map(|position| Coord { x: position[0], y: position[1] })
        .collect();
    // Ensure the ring is closed (first point == last point)
    if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
        coords.push(coords[0]);
    }
    LineString(coords)
}

fn rings_to_polygon(rings: &[Ring]) -> Polygon<f64> {
    let exterior = rings.first()
        .map(|ring| ring_to_line_string(ring))
        .unwrap_or_else(|| LineString(vec![]));
    let interiors = rings.iter().skip(1).map(|ring| ring_to_line_string(ring)).collect();
    Polygon::new(exterior, interiors)
}

fn line_string_to_ring(ls: &LineString<f64>) -> Ring {
    ls.coords().map(|c| vec![c.x, c.y]).collect()
}

impl Feature {
    /// Construct a feature with an empty property map.
    pub fn new(geometry: Geometry) -> Self {
        Feature { geometry, properties: Map::new() }
    }

    #[inline]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Property as a string slice, if present and a string.
    #[inline]
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Property as an integer, if present and numeric.
    #[inline]
    pub fn property_i64(&self, key: &str) -> Option<i64> {
        self.properties.get(key).and_then(Value::as_i64)
    }

    /// Property as a float, if present and numeric.
    #[inline]
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }

    pub fn set_property(&mut self, key: &str, value: impl Into<Value>) {
        self.properties.insert(key.to_string(), value.into());
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureCollection { features }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
