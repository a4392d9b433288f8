// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point containment queries over cached building footprints.
//!
//! The index is a borrowed view of a [`BuildingCache`]. It holds no state of
//! its own; bounding boxes come from the records, which recompute them
//! whenever their rings are replaced. A query against an ID combines the bare
//! entry with every compound entry that shares its base ID.

use gml_energy_core::{base_id, BoundingBox, BuildingCache, BuildingRecord, Point3};
use serde::Serialize;

use crate::polygon::point_in_rings;

/// Outcome of a containment check, finer grained than [`GeometryIndex::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Containment {
    /// The ID does not resolve to any cached record.
    UnknownBuilding,
    /// The record exists but has no usable rings.
    NoGeometry,
    /// Rejected by the bounding box, no ring was evaluated.
    OutsideBounds,
    /// Inside the bounding box but outside every ring.
    Outside,
    Inside,
}

impl Containment {
    #[inline]
    pub fn is_inside(self) -> bool {
        self == Containment::Inside
    }
}

/// Read-only spatial view over the building cache.
#[derive(Debug, Clone, Copy)]
pub struct GeometryIndex<'a> {
    cache: &'a BuildingCache,
}

impl<'a> GeometryIndex<'a> {
    pub fn new(cache: &'a BuildingCache) -> Self {
        Self { cache }
    }

    /// Base ID that `id` refers to, resolved without the substring stage.
    pub fn resolve_base(&self, id: &str) -> Option<&'a str> {
        self.cache.resolve_key(id).map(base_id)
    }

    /// The bare entry and every compound entry stored under `base`.
    fn geometries_of(&self, base: &'a str) -> impl Iterator<Item = &'a BuildingRecord> + 'a {
        self.cache.geometries_for(base).map(|(_, record)| record)
    }

    /// Combined envelope of all geometries of `id`.
    pub fn bounding_box(&self, id: &str) -> Option<BoundingBox> {
        let base = self.resolve_base(id)?;
        self.geometries_of(base)
            .filter_map(BuildingRecord::bounds)
            .copied()
            .reduce(|acc, bounds| acc.union(&bounds))
    }

    /// Two-phase containment test against every geometry of `id`.
    ///
    /// The bounding box check is three-dimensional, so a point above or below
    /// the footprint's Z range is rejected before any ring is evaluated.
    pub fn classify(&self, point: &Point3, id: &str) -> Containment {
        let Some(base) = self.resolve_base(id) else {
            return Containment::UnknownBuilding;
        };

        let geometries: Vec<&BuildingRecord> = self
            .geometries_of(base)
            .filter(|record| record.has_geometry())
            .collect();

        let bounds = geometries
            .iter()
            .filter_map(|record| record.bounds())
            .copied()
            .reduce(|acc, bounds| acc.union(&bounds));
        let Some(bounds) = bounds else {
            return Containment::NoGeometry;
        };

        if !bounds.contains(point) {
            return Containment::OutsideBounds;
        }

        let inside = geometries
            .iter()
            .any(|record| point_in_rings(point, record.rings()));
        if inside {
            Containment::Inside
        } else {
            Containment::Outside
        }
    }

    /// True if `point` lies inside any ring associated with `id`.
    pub fn validate(&self, point: &Point3, id: &str) -> bool {
        self.classify(point, id).is_inside()
    }

    /// Base ID of the first cached geometry containing `point`, in insertion order.
    ///
    /// A linear scan: each entry is rejected on its XY bounds before its
    /// rings are tested.
    pub fn reverse_lookup(&self, point: &Point3) -> Option<&'a str> {
        self.cache
            .iter()
            .find(|(_, record)| {
                record
                    .bounds()
                    .is_some_and(|bounds| bounds.contains_xy(point))
                    && point_in_rings(point, record.rings())
            })
            .map(|(key, _)| base_id(key))
    }
}
