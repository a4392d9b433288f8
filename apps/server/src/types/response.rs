// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use gml_energy_core::{BoundingBox, CacheStats, MatchStage};
use gml_energy_geometry::Containment;
use gml_energy_processing::DetectorStatus;
use serde::Serialize;

/// One cached building as resolved from a requested ID.
#[derive(Debug, Clone, Serialize)]
pub struct BuildingView {
    /// Cache key the request resolved to.
    pub key: String,
    pub canonical_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_id: Option<String>,
    /// ID format expected by the attributes API.
    pub attributes_id: String,
    pub display_text: String,
    /// `#RRGGBB`
    pub color: String,
    pub match_stage: MatchStage,
    /// Combined bounds of every geometry of the building.
    pub bounds: Option<BoundingBox>,
    pub geometry_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub containment: Containment,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocateResponse {
    pub building_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangesResponse {
    pub changed: Vec<String>,
    pub total_changes: u64,
    pub style_revision: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub loaded: bool,
    pub cache: CacheStats,
    pub detector: DetectorStatus,
    pub style_rules: usize,
    pub has_credential: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayResponse {
    pub id: Option<String>,
    pub text: Option<String>,
}
