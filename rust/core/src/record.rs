// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-building energy records.

use serde::Serialize;

use crate::bounds::{BoundingBox, Rings};
use crate::color::Rgba;

/// Latest known state of one building (or one geometry of a building).
///
/// Records are immutable once built: an update constructs a new record and
/// replaces the cached one as a whole. The bounding box is derived from the
/// rings at construction and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingRecord {
    canonical_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    alternate_id: Option<String>,
    display_text: String,
    color: Rgba,
    rings: Rings,
    bounds: Option<BoundingBox>,
}

impl BuildingRecord {
    pub fn new(canonical_id: impl Into<String>, display_text: impl Into<String>, color: Rgba) -> Self {
        Self {
            canonical_id: canonical_id.into(),
            alternate_id: None,
            display_text: display_text.into(),
            color,
            rings: Rings::new(),
            bounds: None,
        }
    }

    /// Attach the alternate ID. It is only kept when it differs from the canonical ID.
    pub fn with_alternate_id(mut self, alternate_id: impl Into<String>) -> Self {
        let alternate_id = alternate_id.into();
        self.alternate_id = (!alternate_id.is_empty() && alternate_id != self.canonical_id)
            .then_some(alternate_id);
        self
    }

    /// Replace the geometry, recomputing the bounding box.
    pub fn with_rings(mut self, rings: Rings) -> Self {
        self.bounds = BoundingBox::from_rings(&rings);
        self.rings = rings;
        self
    }

    pub fn with_display_text(mut self, display_text: impl Into<String>) -> Self {
        self.display_text = display_text.into();
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn canonical_id(&self) -> &str {
        &self.canonical_id
    }

    #[inline]
    pub fn alternate_id(&self) -> Option<&str> {
        self.alternate_id.as_deref()
    }

    #[inline]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    #[inline]
    pub fn color(&self) -> Rgba {
        self.color
    }

    #[inline]
    pub fn rings(&self) -> &Rings {
        &self.rings
    }

    #[inline]
    pub fn bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref()
    }

    /// True when at least one ring can bound an area.
    pub fn has_geometry(&self) -> bool {
        self.rings.iter().any(|ring| ring.len() >= 3)
    }
}
