//! Precinct-to-district spatial join.

use geo::{BoundingRect, Centroid, Contains, MultiPolygon, Point, Rect};
use rstar::{AABB, RTree, RTreeObject};

use crate::geojson::{Feature, FeatureCollection};

#[derive(Debug, Clone)]
struct DistrictBounds {
    idx: usize, // Index into the districts collection
    bbox: Rect<f64>,
}

impl RTreeObject for DistrictBounds {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Assign each precinct to the congressional district containing its
/// centroid, dropping precincts that fall in no district (e.g. water-only
/// precincts).
///
/// Containment uses `geo::Contains` semantics: a centroid exactly on a
/// district boundary is treated as outside. If the centroid lies inside more
/// than one district (topology error from simplified boundaries), the first
/// district in collection order wins and a warning names the others.
///
/// The result is a stable filter: retained precincts keep their input order,
/// each stamped with a numeric `district` property. An empty districts
/// collection yields an empty result, not an error. Pure apart from the
/// multi-match warning.
pub fn assign_districts(
    districts: &FeatureCollection,
    precincts: &FeatureCollection,
) -> FeatureCollection {
    // District features without a numeric id or with empty geometry can't
    // participate in the join; they are skipped, not fatal.
    let prepared: Vec<(i64, MultiPolygon<f64>)> = districts.features.iter()
        .filter_map(|feature| {
            let id = feature.property_i64("district")?;
            Some((id, feature.geometry.to_multi_polygon()))
        })
        .collect();

    let rtree = RTree::bulk_load(
        prepared.iter().enumerate()
            .filter_map(|(idx, (_, mp))| Some(DistrictBounds { idx, bbox: mp.bounding_rect()? }))
            .collect(),
    );

    let features = precincts.features.iter()
        .filter_map(|precinct| {
            let center = feature_centroid(precinct)?;

            // Candidate districts from the R-tree, restored to collection
            // order so the first-match tie-break stays deterministic.
            let mut candidates: Vec<usize> = rtree
                .locate_in_envelope_intersecting(&AABB::from_point([center.x(), center.y()]))
                .map(|bounds| bounds.idx)
                .collect();
            candidates.sort_unstable();

            let matched: Vec<usize> = candidates.into_iter()
                .filter(|&idx| prepared[idx].1.contains(&center))
                .collect();

            let &first = matched.first()?;
            if matched.len() > 1 {
                let label = precinct.property_str("geoid").unwrap_or("<unknown>");
                let ids: Vec<i64> = matched.iter().map(|&idx| prepared[idx].0).collect();
                eprintln!(
                    "[join] precinct {} centroid matched districts {:?}; keeping {}",
                    label, ids, prepared[first].0
                );
            }

            let mut assigned = precinct.clone();
            assigned.set_property("district", prepared[first].0);
            Some(assigned)
        })
        .collect();

    FeatureCollection::new(features)
}

/// Area-weighted centroid of a precinct's geometry. Degenerate geometry
/// (zero area, malformed ring) falls back to the mean of the ring vertices;
/// a geometry with no vertices at all has no centroid.
pub fn feature_centroid(feature: &Feature) -> Option<Point<f64>> {
    let mp = feature.geometry.to_multi_polygon();
    if let Some(center) = mp.centroid() {
        if center.x().is_finite() && center.y().is_finite() {
            return Some(center);
        }
    }
    vertex_mean(&mp)
}

fn vertex_mean(mp: &MultiPolygon<f64>) -> Option<Point<f64>> {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut count = 0usize;
    for polygon in &mp.0 {
        for coord in polygon.exterior().coords() {
            sum_x += coord.x;
            sum_y += coord.y;
            count += 1;
        }
    }
    (count > 0).then(|| Point::new(sum_x / count as f64, sum_y / count as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::Geometry;

    fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Geometry {
        Geometry::Polygon {
            coordinates: vec![vec![
                vec![min_x, min_y],
                vec![max_x, min_y],
                vec![max_x, max_y],
                vec![min_x, max_y],
                vec![min_x, min_y],
            ]],
        }
    }

    fn district(id: i64, geometry: Geometry) -> Feature {
        let mut feature = Feature::new(geometry);
        feature.set_property("district", id);
        feature.set_property("name", format!("District {id}"));
        feature
    }

    fn precinct(geoid: &str, geometry: Geometry) -> Feature {
        let mut feature = Feature::new(geometry);
        feature.set_property("geoid", geoid);
        feature
    }

    /// Two unit-square districts side by side, three precincts: one in each
    /// district and one far outside both.
    fn fixture() -> (FeatureCollection, FeatureCollection) {
        let districts = FeatureCollection::new(vec![
            district(1, square(0.0, 0.0, 1.0, 1.0)),
            district(2, square(1.0, 0.0, 2.0, 1.0)),
        ]);
        let precincts = FeatureCollection::new(vec![
            precinct("p1", square(0.4, 0.4, 0.6, 0.6)),
            precinct("p2", square(1.4, 0.4, 1.6, 0.6)),
            precinct("p3", square(4.9, 4.9, 5.1, 5.1)),
        ]);
        (districts, precincts)
    }

    #[test]
    fn assigns_each_precinct_to_containing_district() {
        let (districts, precincts) = fixture();
        let joined = assign_districts(&districts, &precincts);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.features[0].property_str("geoid"), Some("p1"));
        assert_eq!(joined.features[0].property_i64("district"), Some(1));
        assert_eq!(joined.features[1].property_str("geoid"), Some("p2"));
        assert_eq!(joined.features[1].property_i64("district"), Some(2));
    }

    #[test]
    fn drops_precincts_outside_every_district() {
        let (districts, precincts) = fixture();
        let joined = assign_districts(&districts, &precincts);
        assert!(joined.features.iter().all(|f| f.property_str("geoid") != Some("p3")));
    }

    #[test]
    fn retained_centroids_verify_against_assigned_polygons() {
        let (districts, precincts) = fixture();
        let joined = assign_districts(&districts, &precincts);
        for feature in &joined.features {
            let assigned = feature.property_i64("district").unwrap();
            let center = feature_centroid(feature).unwrap();
            let holder = districts.features.iter()
                .find(|d| d.property_i64("district") == Some(assigned))
                .unwrap();
            assert!(holder.geometry.to_multi_polygon().contains(&center));
        }
    }

    #[test]
    fn join_is_idempotent_and_order_preserving() {
        let (districts, precincts) = fixture();
        let first = assign_districts(&districts, &precincts);
        let second = assign_districts(&districts, &precincts);
        assert_eq!(first, second);

        let rejoined = assign_districts(&districts, &first);
        assert_eq!(rejoined, first);
    }

    #[test]
    fn empty_districts_drop_everything() {
        let (_, precincts) = fixture();
        let joined = assign_districts(&FeatureCollection::default(), &precincts);
        assert!(joined.is_empty());
    }

    #[test]
    fn overlapping_districts_resolve_to_first_in_order() {
        let districts = FeatureCollection::new(vec![
            district(7, square(0.0, 0.0, 1.0, 1.0)),
            district(3, square(0.0, 0.0, 1.0, 1.0)),
        ]);
        let precincts = FeatureCollection::new(vec![
            precinct("p1", square(0.4, 0.4, 0.6, 0.6)),
        ]);
        let joined = assign_districts(&districts, &precincts);
        assert_eq!(joined.features[0].property_i64("district"), Some(7));
    }

    #[test]
    fn degenerate_precinct_uses_vertex_mean_fallback() {
        // Zero-area "ring": all vertices on a vertical segment at x = 0.5.
        let districts = FeatureCollection::new(vec![
            district(1, square(0.0, 0.0, 1.0, 1.0)),
        ]);
        let degenerate = precinct("flat", Geometry::Polygon {
            coordinates: vec![vec![
                vec![0.5, 0.2], vec![0.5, 0.4], vec![0.5, 0.6], vec![0.5, 0.2],
            ]],
        });
        let center = feature_centroid(&degenerate).unwrap();
        assert!(center.x().is_finite() && center.y().is_finite());

        let joined = assign_districts(&districts, &FeatureCollection::new(vec![degenerate]));
        assert_eq!(joined.len(), 1);
        assert_eq!(joined.features[0].property_i64("district"), Some(1));
    }

    #[test]
    fn district_without_numeric_id_is_skipped() {
        let mut anonymous = Feature::new(square(0.0, 0.0, 1.0, 1.0));
        anonymous.set_property("name", "no id");
        let districts = FeatureCollection::new(vec![anonymous]);
        let precincts = FeatureCollection::new(vec![
            precinct("p1", square(0.4, 0.4, 0.6, 0.6)),
        ]);
        assert!(assign_districts(&districts, &precincts).is_empty());
    }
}
