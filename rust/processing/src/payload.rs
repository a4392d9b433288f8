// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of the bulk and incremental energy payloads.
//!
//! Both payloads are handled as loosely typed [`serde_json::Value`] trees
//! because the upstream schema varies between deployments. Missing nested
//! objects are resolved through fixed fallback chains.

use gml_energy_core::Rgba;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::{Error, Result};

/// Energy structure container names, in priority order.
const ENERGY_KEYS: [&str; 3] = ["energy_result", "energy_data", "result"];
const BEFORE_KEYS: [&str; 2] = ["begin", "before"];
const AFTER_KEYS: [&str; 2] = ["end", "after"];
const COORDINATE_KEYS: [&str; 3] = ["coordinates", "geom", "position"];
const COLOR_FIELD: &str = "energy_demand_specific_color";

/// Why a bulk entry was skipped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    #[error("entry is not a JSON object")]
    NotAnObject,
    #[error("entry has no modified_gml_id")]
    MissingId,
    #[error("entry has no energy structure")]
    MissingEnergy,
}

/// Energy figures of one renovation phase. `None` renders as "No data".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseValues {
    pub energy_demand: Option<f64>,
    pub energy_demand_specific: Option<f64>,
    pub co2_from_energy_demand: Option<f64>,
}

impl PhaseValues {
    fn from_phase(phase: &Map<String, Value>) -> Self {
        let result = object_field(phase, "result").unwrap_or(phase);
        Self {
            energy_demand: field_value(result, "energy_demand"),
            energy_demand_specific: field_value(result, "energy_demand_specific"),
            co2_from_energy_demand: field_value(result, "co2_from_energy_demand"),
        }
    }
}

/// One building of the bulk payload.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkEntry<'a> {
    pub id: &'a str,
    pub gml_id: Option<&'a str>,
    pub numeric_id: Option<i64>,
    pub before: PhaseValues,
    pub after: PhaseValues,
    /// Raw hex color as sent, if any.
    pub color_hex: Option<&'a str>,
    pub coordinates: Option<&'a Value>,
}

impl<'a> BulkEntry<'a> {
    pub fn decode(value: &'a Value) -> std::result::Result<Self, SkipReason> {
        let entry = value.as_object().ok_or(SkipReason::NotAnObject)?;

        let id = non_empty_str(entry, "modified_gml_id").ok_or(SkipReason::MissingId)?;

        let energy = first_object(entry, &ENERGY_KEYS).ok_or(SkipReason::MissingEnergy)?;
        let begin = first_object(energy, &BEFORE_KEYS).ok_or(SkipReason::MissingEnergy)?;
        let end = first_object(energy, &AFTER_KEYS).ok_or(SkipReason::MissingEnergy)?;

        let color_hex = color_of(end).or_else(|| object_field(end, "result").and_then(color_of));

        Ok(Self {
            id,
            gml_id: non_empty_str(entry, "gml_id"),
            numeric_id: entry.get("id").and_then(Value::as_i64),
            before: PhaseValues::from_phase(begin),
            after: PhaseValues::from_phase(end),
            color_hex,
            coordinates: coordinates_of(entry),
        })
    }

    /// Color to store, falling back to the default fill on missing or invalid hex.
    pub fn color(&self) -> Rgba {
        self.color_hex
            .map(Rgba::from_hex_or_fallback)
            .unwrap_or(Rgba::FALLBACK)
    }
}

/// Top-level array of a bulk payload.
pub fn bulk_entries(body: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(body)? {
        Value::Array(entries) => Ok(entries),
        _ => Err(Error::NotAnArray),
    }
}

/// The `results` array of an incremental poll payload.
pub fn poll_results(body: &str) -> Result<Vec<Value>> {
    let mut root = serde_json::from_str::<Value>(body)?;
    match root.get_mut("results").map(Value::take) {
        Some(Value::Array(results)) => Ok(results),
        _ => Err(Error::MissingResults),
    }
}

/// One result of an incremental poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PollEntry<'a> {
    /// `gml_id`, or `modified_gml_id` when absent.
    pub id: &'a str,
    /// The other of the two IDs, when both are present and differ.
    pub alternate_id: Option<&'a str>,
    pub numeric_id: Option<i64>,
    pub energy_consumption: Option<f64>,
    pub electricity_consumption: Option<f64>,
    pub heating_consumption: Option<f64>,
    /// Only a valid hex color; otherwise the cached color is kept.
    pub color: Option<Rgba>,
    pub coordinates: Option<&'a Value>,
    /// Compact JSON with sorted keys, compared against the snapshot.
    pub serialized: String,
}

impl<'a> PollEntry<'a> {
    /// `None` when the result is not an object or carries no ID.
    pub fn decode(value: &'a Value) -> Option<Self> {
        let entry = value.as_object()?;
        let gml_id = non_empty_str(entry, "gml_id");
        let modified = non_empty_str(entry, "modified_gml_id");
        let id = gml_id.or(modified)?;
        let alternate_id = gml_id.and(modified).filter(|m| *m != id);

        let color = object_field(entry, "end")
            .and_then(color_of)
            .and_then(|hex| Rgba::from_hex(hex).ok());

        Some(Self {
            id,
            alternate_id,
            numeric_id: entry.get("id").and_then(Value::as_i64),
            energy_consumption: entry.get("energy_consumption").and_then(Value::as_f64),
            electricity_consumption: entry.get("electricity_consumption").and_then(Value::as_f64),
            heating_consumption: entry.get("heating_consumption").and_then(Value::as_f64),
            color,
            coordinates: coordinates_of(entry),
            serialized: value.to_string(),
        })
    }
}

fn object_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

fn first_object<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Map<String, Value>> {
    keys.iter().find_map(|key| object_field(map, key))
}

fn non_empty_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// `<field>.value`, `None` when missing or null.
fn field_value(map: &Map<String, Value>, field: &str) -> Option<f64> {
    object_field(map, field)
        .and_then(|f| f.get("value"))
        .and_then(Value::as_f64)
}

fn color_of(phase: &Map<String, Value>) -> Option<&str> {
    object_field(phase, "color")
        .and_then(|color| color.get(COLOR_FIELD))
        .and_then(Value::as_str)
}

fn coordinates_of(map: &Map<String, Value>) -> Option<&Value> {
    COORDINATE_KEYS
        .iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()))
}
