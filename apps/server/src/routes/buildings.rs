// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building lookup, point validation and display endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use gml_energy_core::{base_id, MatchStage};
use gml_energy_geometry::Containment;
use gml_energy_processing::ShowOutcome;

use crate::error::ApiError;
use crate::types::{BuildingView, DisplayResponse, LocateResponse, PointRequest, ValidateResponse};
use crate::AppState;

fn checked_point(point: PointRequest) -> Result<PointRequest, ApiError> {
    if point.is_finite() {
        Ok(point)
    } else {
        Err(ApiError::BadRequest("coordinates must be finite numbers".into()))
    }
}

/// GET /api/v1/buildings/:id - Cached record for either ID format.
pub async fn get_building(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BuildingView>, ApiError> {
    let host = state.host.lock().await;
    let monitor = &host.monitor;
    if !monitor.is_loaded() {
        return Err(ApiError::NotLoaded);
    }

    let cache = monitor.cache();
    let hit = cache
        .lookup(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Building not found: {}", id)))?;
    if hit.stage == MatchStage::Substring {
        tracing::warn!(id = %id, key = hit.key, "Resolved through legacy substring match");
    }

    let record = hit.record;
    let base = base_id(hit.key);
    Ok(Json(BuildingView {
        key: hit.key.to_string(),
        canonical_id: record.canonical_id().to_string(),
        alternate_id: record.alternate_id().map(str::to_string),
        attributes_id: cache.resolver().to_alternate(record.canonical_id()),
        display_text: record.display_text().to_string(),
        color: record.color().to_hex(),
        match_stage: hit.stage,
        bounds: monitor.geometry().bounding_box(base),
        geometry_count: cache
            .geometries_for(base)
            .filter(|(_, r)| r.has_geometry())
            .count(),
    }))
}

/// POST /api/v1/buildings/:id/validate - Point-in-footprint check.
pub async fn validate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(point): Json<PointRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let point = checked_point(point)?.to_point();
    let host = state.host.lock().await;

    let containment = host.monitor.geometry().classify(&point, &id);
    if containment == Containment::UnknownBuilding {
        return Err(ApiError::NotFound(format!("Building not found: {}", id)));
    }

    tracing::debug!(id = %id, ?containment, "Point validated");
    Ok(Json(ValidateResponse {
        valid: containment.is_inside(),
        containment,
    }))
}

/// POST /api/v1/locate - Building containing a point, if any.
pub async fn locate(
    State(state): State<AppState>,
    Json(point): Json<PointRequest>,
) -> Result<Json<LocateResponse>, ApiError> {
    let point = checked_point(point)?.to_point();
    let host = state.host.lock().await;
    let building_id = host
        .monitor
        .geometry()
        .reverse_lookup(&point)
        .map(str::to_string);
    Ok(Json(LocateResponse { building_id }))
}

/// POST /api/v1/buildings/:id/display - Show a building in the display slot.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DisplayResponse>, ApiError> {
    let now = state.started.elapsed().as_secs_f64();
    let mut guard = state.host.lock().await;
    let host = &mut *guard;

    match host.monitor.show(&id, &mut host.display, now) {
        ShowOutcome::NotFound => Err(ApiError::NotFound(format!("Building not found: {}", id))),
        ShowOutcome::Presented { .. } | ShowOutcome::Debounced => Ok(Json(DisplayResponse {
            id: host.display.id.clone(),
            text: host.display.text.clone(),
        })),
    }
}

/// GET /api/v1/display - Currently displayed building.
pub async fn current_display(State(state): State<AppState>) -> Json<DisplayResponse> {
    let host = state.host.lock().await;
    Json(DisplayResponse {
        id: host.display.id.clone(),
        text: host.display.text.clone(),
    })
}
