// End-to-end data-preparation pipeline over in-memory collections:
// district assignment, attribute join, file round trip, and choropleth
// range derivation at load time.

use geo::Contains;

use districtlens::{
    ColorScale, Feature, FeatureCollection, Geometry, MetricRange, PrecinctStats, StatsById,
    assign_districts, feature_centroid, join_attributes, read_feature_collection,
    write_feature_collection,
};

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

fn districts() -> FeatureCollection {
    let mut d1 = Feature::new(square(0.0, 0.0, 1.0, 1.0));
    d1.set_property("district", 1);
    let mut d2 = Feature::new(square(1.0, 0.0, 2.0, 1.0));
    d2.set_property("district", 2);
    FeatureCollection::new(vec![d1, d2])
}

fn precincts() -> FeatureCollection {
    let mut p1 = Feature::new(square(0.4, 0.4, 0.6, 0.6));
    p1.set_property("geoid", "280010001");
    let mut p2 = Feature::new(square(1.4, 0.4, 1.6, 0.6));
    p2.set_property("geoid", "280010002");
    let mut offshore = Feature::new(square(4.9, 4.9, 5.1, 5.1));
    offshore.set_property("geoid", "280019999");
    FeatureCollection::new(vec![p1, p2, offshore])
}

fn stats() -> StatsById {
    let mut records = StatsById::default();
    records.insert("280010001".into(), PrecinctStats {
        minority_pct: Some(64.0),
        dem_pct: Some(72.0),
    });
    // Total votes cast was zero here: demPct must stay absent.
    records.insert("280010002".into(), PrecinctStats {
        minority_pct: Some(28.0),
        dem_pct: None,
    });
    records
}

#[test]
fn join_then_attributes_then_round_trip() {
    let joined = assign_districts(&districts(), &precincts());
    assert_eq!(joined.len(), 2);
    assert_eq!(joined.features[0].property_i64("district"), Some(1));
    assert_eq!(joined.features[1].property_i64("district"), Some(2));

    let annotated = join_attributes(&joined, &stats());
    assert_eq!(annotated.features[0].property_f64("demPct"), Some(72.0));
    assert!(annotated.features[1].property("demPct").is_none());
    assert_eq!(annotated.features[1].property_f64("minorityPct"), Some(28.0));

    // Output written to disk reads back identically.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("MS-precincts.json");
    write_feature_collection(&path, &annotated, false).unwrap();
    let reloaded = read_feature_collection(&path).unwrap();
    assert_eq!(reloaded, annotated);
}

#[test]
fn every_retained_centroid_is_inside_its_assigned_district() {
    let districts = districts();
    let joined = assign_districts(&districts, &precincts());
    for precinct in &joined.features {
        let assigned = precinct.property_i64("district").unwrap();
        let center = feature_centroid(precinct).unwrap();
        // Independent containment check against the assigned polygon, and
        // against no other.
        for district in &districts.features {
            let contains = district.geometry.to_multi_polygon().contains(&center);
            let is_assigned = district.property_i64("district") == Some(assigned);
            assert_eq!(contains, is_assigned);
        }
    }
}

#[test]
fn load_time_range_drives_the_choropleth() {
    let annotated = join_attributes(&assign_districts(&districts(), &precincts()), &stats());

    // Consumers re-derive the range from the file contents, never from
    // stored bounds.
    let range = MetricRange::from_values(
        annotated.features.iter().filter_map(|f| f.property_f64("minorityPct")),
    )
    .unwrap();
    assert_eq!(range.as_tuple(), (28.0, 64.0));

    let scale = ColorScale::sequential_blues();
    let low = scale.color_for(28.0, range.as_tuple());
    let high = scale.color_for(64.0, range.as_tuple());
    assert_eq!(low, scale.stops()[0].color);
    assert_eq!(high, scale.stops()[scale.stops().len() - 1].color);
    assert_ne!(low, high);
}
