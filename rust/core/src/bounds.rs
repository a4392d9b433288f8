// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Points, rings and axis-aligned bounds of building footprints.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A footprint vertex. Z is `0.0` when the source only provides X/Y.
pub type Point3 = nalgebra::Point3<f64>;

/// One closed polygon boundary. Valid rings have at least three points.
pub type Ring = Vec<Point3>;

/// All rings of one geometry. Nearly every building has exactly one.
pub type Rings = SmallVec<[Ring; 1]>;

/// Axis-aligned envelope of a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox {
    /// Degenerate box around a single point.
    pub fn from_point(p: &Point3) -> Self {
        Self { min: *p, max: *p }
    }

    /// Envelope of all points, or `None` when there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3>,
    {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for p in iter {
            bounds.expand(p);
        }
        Some(bounds)
    }

    /// Envelope of every point of every ring.
    pub fn from_rings(rings: &[Ring]) -> Option<Self> {
        Self::from_points(rings.iter().flatten())
    }

    /// Expand bounds to include a point
    #[inline]
    pub fn expand(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        out.expand(&other.min);
        out.expand(&other.max);
        out
    }

    /// Inclusive containment on all three axes.
    #[inline]
    pub fn contains(&self, p: &Point3) -> bool {
        self.contains_xy(p) && p.z >= self.min.z && p.z <= self.max.z
    }

    /// Inclusive containment ignoring Z.
    #[inline]
    pub fn contains_xy(&self, p: &Point3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[inline]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    #[inline]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 2.0),
            Point3::new(0.0, 10.0, 0.0),
        ]
    }

    #[test]
    fn envelope_of_rings() {
        let far = vec![Point3::new(-5.0, 20.0, -1.0)];
        let bounds = BoundingBox::from_rings(&[square(), far]).unwrap();
        assert_eq!(bounds.min, Point3::new(-5.0, 0.0, -1.0));
        assert_eq!(bounds.max, Point3::new(10.0, 20.0, 2.0));
        assert_eq!(bounds.center(), Point3::new(2.5, 10.0, 0.5));
        assert_eq!(bounds.size(), Vector3::new(15.0, 20.0, 3.0));
    }

    #[test]
    fn empty_rings_have_no_bounds() {
        assert!(BoundingBox::from_rings(&[]).is_none());
        assert!(BoundingBox::from_rings(&[Vec::new()]).is_none());
    }

    #[test]
    fn containment_is_inclusive() {
        let bounds = BoundingBox::from_rings(&[square()]).unwrap();
        assert!(bounds.contains(&Point3::new(10.0, 10.0, 2.0)));
        assert!(bounds.contains(&Point3::new(5.0, 5.0, 1.0)));
        assert!(!bounds.contains(&Point3::new(5.0, 5.0, 3.0)));
        assert!(bounds.contains_xy(&Point3::new(5.0, 5.0, 3.0)));
        assert!(!bounds.contains_xy(&Point3::new(10.5, 5.0, 0.0)));
    }

    #[test]
    fn union_covers_both() {
        let a = BoundingBox::from_point(&Point3::new(0.0, 0.0, 0.0));
        let b = BoundingBox::from_point(&Point3::new(3.0, -1.0, 4.0));
        let u = a.union(&b);
        assert_eq!(u.min, Point3::new(0.0, -1.0, 0.0));
        assert_eq!(u.max, Point3::new(3.0, 0.0, 4.0));
    }
}
