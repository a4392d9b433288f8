// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Even-odd point-in-polygon tests on the XY plane.

use gml_energy_core::{Point3, Ring};

/// Check if a point is inside a ring using ray casting. Z is ignored.
///
/// Rings with fewer than three points never contain anything.
pub fn point_in_polygon(point: &Point3, ring: &[Point3]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = ring.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &ring[i];
        let pj = &ring[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// True if any of the rings contains the point.
pub fn point_in_rings<'a, I>(point: &Point3, rings: I) -> bool
where
    I: IntoIterator<Item = &'a Ring>,
{
    rings.into_iter().any(|ring| point_in_polygon(point, ring))
}
