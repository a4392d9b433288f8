// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change feed, statistics, polling control and reload endpoints.

use axum::{extract::State, Json};
use gml_energy_processing::{DetectorStatus, IngestReport};

use crate::error::ApiError;
use crate::host;
use crate::types::{ChangesResponse, IntervalRequest, StatsResponse};
use crate::AppState;

/// GET /api/v1/changes - Buildings changed by the last update cycle.
pub async fn changes(State(state): State<AppState>) -> Json<ChangesResponse> {
    let host = state.host.lock().await;
    Json(ChangesResponse {
        changed: host.monitor.last_changed().to_vec(),
        total_changes: host.changes.total_changes(),
        style_revision: host.monitor.style_revision(),
    })
}

/// GET /api/v1/stats - Cache and detector statistics.
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let host = state.host.lock().await;
    Json(StatsResponse {
        loaded: host.monitor.is_loaded(),
        cache: host.monitor.cache().stats(),
        detector: host.monitor.detector().status(),
        style_rules: host.style.rule_count(),
        has_credential: state.client.has_credential(),
    })
}

/// POST /api/v1/polling - Change the manual interval or toggle adaptive polling.
pub async fn polling(
    State(state): State<AppState>,
    Json(request): Json<IntervalRequest>,
) -> Result<Json<DetectorStatus>, ApiError> {
    let mut host = state.host.lock().await;
    let detector = host.monitor.detector_mut();

    if let Some(adaptive) = request.adaptive {
        detector.set_adaptive(adaptive);
    }
    if let Some(secs) = request.interval_secs {
        if !secs.is_finite() {
            return Err(ApiError::BadRequest("interval_secs must be a finite number".into()));
        }
        let applied = detector.set_interval(secs);
        tracing::info!(requested = secs, applied, "Polling interval set");
    }
    Ok(Json(detector.status()))
}

/// POST /api/v1/refresh - Clear and reload every building.
pub async fn refresh(State(state): State<AppState>) -> Result<Json<IngestReport>, ApiError> {
    tracing::info!("Full reload requested");
    host::full_load(&state)
        .await?
        .map(Json)
        .ok_or(ApiError::Superseded)
}

/// DELETE /api/v1/buildings - Drop every cached building and stop applying in-flight polls.
pub async fn clear(State(state): State<AppState>) -> Json<StatsResponse> {
    let mut host = state.host.lock().await;
    host.monitor.clear();
    Json(StatsResponse {
        loaded: host.monitor.is_loaded(),
        cache: host.monitor.cache().stats(),
        detector: host.monitor.detector().status(),
        style_rules: host.style.rule_count(),
        has_credential: state.client.has_credential(),
    })
}
