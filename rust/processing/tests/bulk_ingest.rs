// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use gml_energy_core::{BuildingCache, MatchStage, Rgba};
use gml_energy_geometry::{GeometryIndex, Point3};
use gml_energy_processing::{ingest_bulk, Error};
use serde_json::json;

fn energy(specific_before: f64, specific_after: f64, color: &str) -> serde_json::Value {
    json!({
        "begin": {"result": {
            "energy_demand_specific": {"value": specific_before},
            "energy_demand": {"value": 12000},
            "co2_from_energy_demand": {"value": 4500}
        }},
        "end": {
            "color": {"energy_demand_specific_color": color},
            "result": {
                "energy_demand_specific": {"value": specific_after},
                "energy_demand": {"value": null},
                "co2_from_energy_demand": {"value": 1500}
            }
        }
    })
}

fn community_payload() -> String {
    json!([
        {
            "modified_gml_id": "A_1",
            "gml_id": "AL1",
            "id": 10,
            "energy_result": energy(210.0, 90.0, "#ff0000"),
            "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10]]]
        },
        {
            "modified_gml_id": "A_1",
            "gml_id": "AL1",
            "id": 11,
            "energy_result": energy(150.0, 60.0, "#00ff00"),
            "coordinates": [[[20, 0], [30, 0], [30, 10], [20, 10]]]
        },
        {
            "modified_gml_id": "DEBW_0020002",
            "energy_data": energy(120.0, 80.0, "not-a-color"),
            "geom": "40,0 50,0 50,10 40,10"
        },
        {"modified_gml_id": "NO_ENERGY"}
    ])
    .to_string()
}

#[test]
fn compound_key_dedup() {
    let mut cache = BuildingCache::new();
    let report = ingest_bulk(&mut cache, &community_payload()).unwrap();

    assert_eq!(report.ingested, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.compound_entries, 2);

    let keys: Vec<_> = cache.keys().collect();
    assert_eq!(keys, ["A_1", "A_1#10", "A_1#11", "DEBW_0020002"]);

    let bare = cache.get("A_1").unwrap();
    assert!(bare.display_text().contains("Before Renovation: 210"));
    assert_eq!(bare.color(), Rgba::opaque(255, 0, 0));
    assert!(cache
        .get("A_1#11")
        .unwrap()
        .display_text()
        .contains("Before Renovation: 150"));
}

#[test]
fn display_text_and_color_fallback() {
    let mut cache = BuildingCache::new();
    ingest_bulk(&mut cache, &community_payload()).unwrap();

    let record = cache.get("DEBW_0020002").unwrap();
    assert_eq!(record.color(), Rgba::FALLBACK);
    assert_eq!(
        record.display_text(),
        "Building ID: DEBW_0020002\n\n\
         CO2 [t CO2/a]\n\
         Before Renovation: 4.500\n\
         After Renovation: 1.500\n\n\
         Energy Demand Specific [kWh/m\u{b2}a]\n\
         Before Renovation: 120\n\
         After Renovation: 80\n\n\
         Energy Demand [kWh/a]\n\
         Before Renovation: 12000\n\
         After Renovation: No data"
    );
}

#[test]
fn idempotent_refresh() {
    let payload = community_payload();

    let mut once = BuildingCache::new();
    ingest_bulk(&mut once, &payload).unwrap();

    let mut twice = BuildingCache::new();
    ingest_bulk(&mut twice, &payload).unwrap();
    ingest_bulk(&mut twice, &payload).unwrap();

    let dump = |cache: &BuildingCache| {
        let entries: Vec<_> = cache.iter().collect();
        serde_json::to_string(&entries).unwrap()
    };
    assert_eq!(dump(&once), dump(&twice));
    assert_eq!(once.stats(), twice.stats());
}

#[test]
fn ingested_ids_resolve_through_every_stage() {
    let mut cache = BuildingCache::new();
    ingest_bulk(&mut cache, &community_payload()).unwrap();

    assert_eq!(cache.lookup("A_1").unwrap().stage, MatchStage::Exact);
    assert_eq!(cache.lookup("AL1").unwrap().stage, MatchStage::Alias);
    assert_eq!(cache.lookup("DEBWL0020002").unwrap().stage, MatchStage::Variant);
    assert_eq!(cache.lookup("0020002").unwrap().stage, MatchStage::Substring);
}

#[test]
fn ingested_geometry_is_queryable() {
    let mut cache = BuildingCache::new();
    ingest_bulk(&mut cache, &community_payload()).unwrap();
    let index = GeometryIndex::new(&cache);

    assert!(index.validate(&Point3::new(25.0, 5.0, 0.0), "A_1"));
    assert_eq!(index.reverse_lookup(&Point3::new(25.0, 5.0, 0.0)), Some("A_1"));
    assert_eq!(
        index.reverse_lookup(&Point3::new(45.0, 5.0, 0.0)),
        Some("DEBW_0020002")
    );
}

#[test]
fn rejected_payload_keeps_previous_contents() {
    let mut cache = BuildingCache::new();
    ingest_bulk(&mut cache, &community_payload()).unwrap();

    let err = ingest_bulk(&mut cache, r#"{"detail": "Invalid token"}"#).unwrap_err();
    assert!(matches!(err, Error::NotAnArray));
    assert_eq!(cache.len(), 4);
}
