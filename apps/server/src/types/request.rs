// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use gml_energy_geometry::Point3;
use serde::Deserialize;

/// A world-space point. Z defaults to 0.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointRequest {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl PointRequest {
    pub fn to_point(self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Polling cadence overrides.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct IntervalRequest {
    /// Manual interval in seconds, clamped to the allowed range.
    #[serde(default)]
    pub interval_secs: Option<f64>,
    #[serde(default)]
    pub adaptive: Option<bool>,
}
