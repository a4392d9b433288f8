// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GML-Energy Geometry
//!
//! Footprint coordinate parsing and point containment queries over the
//! building cache. Every operation is total: malformed input produces empty
//! rings, `false` or `None` instead of an error.

pub mod coordinates;
pub mod index;
pub mod polygon;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use coordinates::{parse_coordinate_str, parse_coordinates};
pub use gml_energy_core::{BoundingBox, Ring, Rings};
pub use index::{Containment, GeometryIndex};
pub use polygon::{point_in_polygon, point_in_rings};

/// Component-wise envelope of every point in `rings`, `None` when there are no points.
#[inline]
pub fn bounding_box(rings: &[Ring]) -> Option<BoundingBox> {
    BoundingBox::from_rings(rings)
}
