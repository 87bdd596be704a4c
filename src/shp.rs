//! TIGER shapefile ingest: VTD (precinct) boundaries plus attribute
//! normalization onto the precinct property schema.

use std::path::Path;

use anyhow::{Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{PolygonRing, Shape};

use crate::geojson::{Feature, FeatureCollection, Geometry};

/// Census attribute names mapped onto the precinct property schema. Each
/// target property takes the first source field present in the record.
const PROPERTY_ALIASES: &[(&str, &[&str])] = &[
    ("geoid", &["GEOID20", "GEOID"]),
    ("name", &["NAME20", "NAMELSAD20", "NAME"]),
    ("statefp", &["STATEFP20", "STATEFP"]),
    ("countyfp", &["COUNTYFP20", "COUNTYFP"]),
    ("vtdst", &["VTDST20", "VTDST"]),
];

/// Read a TIGER VTD shapefile into a precinct FeatureCollection.
///
/// Non-polygonal shapes are skipped with a warning rather than aborting;
/// everything else in the run stays fail-fast.
pub fn read_precinct_shapefile(path: &Path) -> Result<FeatureCollection> {
    let mut reader = shapefile::Reader::from_path(path)
        .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

    let mut features = Vec::new();
    for (index, pair) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = pair
            .with_context(|| format!("Failed to read shape {index} from {}", path.display()))?;
        let mp = match shape {
            Shape::Polygon(polygon) => rings_to_multi_polygon(&polygon),
            other => {
                eprintln!("[shp] skipping non-polygon shape {index} ({})", other.shapetype());
                continue;
            }
        };

        let mut feature = Feature::new(Geometry::from_multi_polygon(&mp));
        for (property, sources) in PROPERTY_ALIASES {
            if let Some(value) = first_field(&record, sources) {
                feature.set_property(property, value);
            }
        }
        if feature.property("name").is_none() {
            feature.set_property("name", "Precinct");
        }
        features.push(feature);
    }
    Ok(FeatureCollection::new(features))
}

fn first_field(record: &Record, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| match record.get(name) {
        Some(FieldValue::Character(Some(text))) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(FieldValue::Numeric(Some(number))) => Some(number.to_string()),
        _ => None,
    })
}

/// Regroup a shapefile polygon's flat ring list into a `geo::MultiPolygon`.
/// Shapefiles store each exterior ring followed by its holes; ring closure
/// is enforced on the way in.
fn rings_to_multi_polygon(polygon: &shapefile::Polygon) -> MultiPolygon<f64> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes: Vec<LineString<f64>> = Vec::new();

    for ring in polygon.rings() {
        match ring {
            PolygonRing::Outer(points) => {
                if let Some(ext) = exterior.take() {
                    polygons.push(Polygon::new(ext, std::mem::take(&mut holes)));
                }
                exterior = Some(closed_line_string(points));
            }
            PolygonRing::Inner(points) => holes.push(closed_line_string(points)),
        }
    }
    if let Some(ext) = exterior {
        polygons.push(Polygon::new(ext, holes));
    }
    MultiPolygon(polygons)
}

fn closed_line_string(points: &[shapefile::Point]) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = points.iter()
        .map(|point| Coord { x: point.x, y: point.y })
        .collect();
    if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
        coords.push(coords[0]);
    }
    LineString(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use shapefile::Point;

    fn ring(points: &[(f64, f64)]) -> Vec<Point> {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn outer_and_inner_rings_group_into_polygons_with_holes() {
        let polygon = shapefile::Polygon::with_rings(vec![
            PolygonRing::Outer(ring(&[
                (0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0), (0.0, 0.0),
            ])),
            PolygonRing::Inner(ring(&[
                (1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0), (1.0, 1.0),
            ])),
            PolygonRing::Outer(ring(&[
                (10.0, 0.0), (10.0, 1.0), (11.0, 1.0), (11.0, 0.0), (10.0, 0.0),
            ])),
        ]);
        let mp = rings_to_multi_polygon(&polygon);
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert_eq!(mp.0[1].interiors().len(), 0);
        assert!((mp.unsigned_area() - (16.0 - 4.0 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn unclosed_ring_is_closed() {
        let ls = closed_line_string(&ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]));
        assert_eq!(ls.0.first(), ls.0.last());
        assert_eq!(ls.0.len(), 4);
    }
}
