// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use gml_energy_core::{BuildingCache, BuildingRecord, Rgba};
use gml_energy_geometry::{bounding_box, parse_coordinates, Containment, GeometryIndex, Point3};
use serde_json::json;

fn cached(entries: &[(&str, Option<i64>, serde_json::Value)]) -> BuildingCache {
    let mut cache = BuildingCache::new();
    for (id, numeric_id, coordinates) in entries {
        let record = BuildingRecord::new(*id, "", Rgba::FALLBACK)
            .with_rings(parse_coordinates(coordinates));
        cache.upsert(record, *numeric_id).unwrap();
    }
    cache
}

#[test]
fn bounding_box_spans_all_rings() {
    let rings = parse_coordinates(&json!([
        [[3512000.25, 5404000.5, 250.0], [3512010.0, 5404000.5, 250.0], [3512010.0, 5404012.75, 252.5]],
        [[3511990.0, 5404001.0, 249.0], [3511995.0, 5404001.0, 249.0], [3511995.0, 5404005.0, 249.0]]
    ]));
    let bounds = bounding_box(&rings).unwrap();

    assert_relative_eq!(bounds.min.x, 3511990.0);
    assert_relative_eq!(bounds.min.y, 5404000.5);
    assert_relative_eq!(bounds.min.z, 249.0);
    assert_relative_eq!(bounds.max.x, 3512010.0);
    assert_relative_eq!(bounds.max.y, 5404012.75);
    assert_relative_eq!(bounds.max.z, 252.5);

    assert!(bounding_box(&[]).is_none());
}

#[test]
fn geojson_polygon_round_trips_through_the_index() {
    let cache = cached(&[(
        "DEBW_0010001",
        None,
        json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
        }),
    )]);
    let index = GeometryIndex::new(&cache);

    assert!(index.validate(&Point3::new(5.0, 5.0, 0.0), "DEBW_0010001"));
    assert!(index.validate(&Point3::new(5.0, 5.0, 0.0), "DEBWL0010001"));
    assert!(!index.validate(&Point3::new(15.0, 5.0, 0.0), "DEBW_0010001"));
    assert_eq!(
        index.reverse_lookup(&Point3::new(2.0, 8.0, 0.0)),
        Some("DEBW_0010001")
    );
}

#[test]
fn malformed_coordinates_store_a_record_without_geometry() {
    let cache = cached(&[("DEBW_BAD", None, json!("garbage"))]);
    let index = GeometryIndex::new(&cache);

    assert!(cache.get("DEBW_BAD").is_some());
    assert_eq!(
        index.classify(&Point3::new(0.0, 0.0, 0.0), "DEBW_BAD"),
        Containment::NoGeometry
    );
    assert_eq!(index.reverse_lookup(&Point3::new(0.0, 0.0, 0.0)), None);
}

#[test]
fn first_geometry_in_insertion_order_wins() {
    let overlap = json!([[0, 0], [10, 0], [10, 10], [0, 10]]);
    let cache = cached(&[
        ("FIRST_1", None, overlap.clone()),
        ("SECOND_2", None, overlap),
    ]);
    let index = GeometryIndex::new(&cache);
    assert_eq!(index.reverse_lookup(&Point3::new(5.0, 5.0, 0.0)), Some("FIRST_1"));
}

#[test]
fn compound_geometry_found_by_point_reports_base_id() {
    let cache = cached(&[
        ("A_1", Some(10), json!("0,0 4,0 4,4 0,4")),
        ("A_1", Some(11), json!("20,0 24,0 24,4 20,4")),
    ]);
    let index = GeometryIndex::new(&cache);

    assert_eq!(index.reverse_lookup(&Point3::new(22.0, 2.0, 0.0)), Some("A_1"));
    assert!(index.validate(&Point3::new(22.0, 2.0, 0.0), "A_1"));

    let combined = index.bounding_box("A_1").unwrap();
    assert_relative_eq!(combined.size().x, 24.0);
}
