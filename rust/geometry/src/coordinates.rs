// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate payload parsing.
//!
//! The upstream APIs are inconsistent about how footprints are encoded. A
//! payload may be a single point, a flat ring, a polygon (list of rings) or a
//! multipolygon (list of polygons); the shape is decided purely by array
//! nesting depth. A 2- or 3-element numeric array is a point, and Z defaults
//! to `0.0` when absent.
//!
//! Besides bare arrays the parser accepts GeoJSON-like objects carrying a
//! `coordinates` member and strings holding either JSON or a loose
//! `x,y,x,y,...` list.
//!
//! Parsing is all-or-nothing: if any part of the payload is malformed the
//! result is an empty ring list.

use gml_energy_core::{Point3, Ring, Rings};
use serde_json::Value;

/// Parse a coordinate payload into polygon rings.
pub fn parse_coordinates(payload: &Value) -> Rings {
    match payload {
        Value::Array(items) => parse_nested(items).unwrap_or_default(),
        Value::Object(map) => map
            .get("coordinates")
            .map(parse_coordinates)
            .unwrap_or_default(),
        Value::String(s) => parse_coordinate_str(s),
        _ => Rings::new(),
    }
}

/// Parse a string payload: embedded JSON first, then a loose number list.
pub fn parse_coordinate_str(s: &str) -> Rings {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Rings::new();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => parse_coordinates(&value),
        _ => parse_loose_list(trimmed).unwrap_or_default(),
    }
}

fn parse_nested(items: &[Value]) -> Option<Rings> {
    if let Some(point) = parse_point(items) {
        return Some(Rings::from_elem(vec![point], 1));
    }
    if let Some(ring) = parse_ring(items) {
        return Some(Rings::from_elem(ring, 1));
    }
    if let Some(rings) = parse_polygon(items) {
        return Some(rings.into_iter().collect());
    }
    parse_multipolygon(items)
}

fn parse_point(items: &[Value]) -> Option<Point3> {
    match items {
        [x, y] => Some(Point3::new(x.as_f64()?, y.as_f64()?, 0.0)),
        [x, y, z] => Some(Point3::new(x.as_f64()?, y.as_f64()?, z.as_f64()?)),
        _ => None,
    }
}

fn parse_ring(items: &[Value]) -> Option<Ring> {
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|item| item.as_array().and_then(|p| parse_point(p)))
        .collect()
}

fn parse_polygon(items: &[Value]) -> Option<Vec<Ring>> {
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|item| item.as_array().and_then(|r| parse_ring(r)))
        .collect()
}

fn parse_multipolygon(items: &[Value]) -> Option<Rings> {
    if items.is_empty() {
        return None;
    }
    let polygons = items
        .iter()
        .map(|item| item.as_array().and_then(|p| parse_polygon(p)))
        .collect::<Option<Vec<_>>>()?;
    Some(polygons.into_iter().flatten().collect())
}

/// `"x,y,x,y"` or whitespace separated, always read as 2D pairs.
fn parse_loose_list(s: &str) -> Option<Rings> {
    let values = s
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    if values.is_empty() || values.len() % 2 != 0 {
        return None;
    }

    let ring: Ring = values
        .chunks_exact(2)
        .map(|pair| Point3::new(pair[0], pair[1], 0.0))
        .collect();
    Some(Rings::from_elem(ring, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_point() {
        let rings = parse_coordinates(&json!([1.0, 2.0]));
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0], vec![Point3::new(1.0, 2.0, 0.0)]);
    }

    #[test]
    fn flat_ring_with_optional_z() {
        let rings = parse_coordinates(&json!([[0, 0], [10, 0, 5], [10, 10]]));
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 3);
        assert_eq!(rings[0][1], Point3::new(10.0, 0.0, 5.0));
        assert_eq!(rings[0][2].z, 0.0);
    }

    #[test]
    fn polygon_and_multipolygon() {
        let polygon = json!([
            [[0, 0], [4, 0], [4, 4], [0, 4]],
            [[1, 1], [2, 1], [2, 2]]
        ]);
        assert_eq!(parse_coordinates(&polygon).len(), 2);

        let multi = json!([
            [[[0, 0], [4, 0], [4, 4]]],
            [[[10, 0], [14, 0], [14, 4]], [[11, 1], [12, 1], [12, 2]]]
        ]);
        let rings = parse_coordinates(&multi);
        assert_eq!(rings.len(), 3);
        assert_eq!(rings[1][0], Point3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn geojson_object() {
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1]]]
        });
        let rings = parse_coordinates(&geom);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn string_payloads() {
        let embedded = parse_coordinates(&json!("[[0,0],[3,0],[3,3]]"));
        assert_eq!(embedded[0].len(), 3);

        let loose = parse_coordinate_str("0,0, 3,0 3,3");
        assert_eq!(loose.len(), 1);
        assert_eq!(loose[0][2], Point3::new(3.0, 3.0, 0.0));
    }

    #[test]
    fn malformed_payloads_are_empty() {
        assert!(parse_coordinates(&json!(null)).is_empty());
        assert!(parse_coordinates(&json!([])).is_empty());
        assert!(parse_coordinates(&json!([1])).is_empty());
        assert!(parse_coordinates(&json!([1, 2, 3, 4])).is_empty());
        assert!(parse_coordinates(&json!([[0, 0], [1, "x"]])).is_empty());
        assert!(parse_coordinates(&json!([[0, 0], [[1, 1], [2, 2]]])).is_empty());
        assert!(parse_coordinates(&json!({"type": "Point"})).is_empty());
        assert!(parse_coordinate_str("1,2,3").is_empty());
        assert!(parse_coordinate_str("not coordinates").is_empty());
        assert!(parse_coordinate_str("\"[0,0]\"").is_empty());
    }
}
