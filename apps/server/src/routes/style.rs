// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Style document endpoint.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::AppState;

/// GET /api/v1/style - Latest 3D Tiles style document.
pub async fn get_style(State(state): State<AppState>) -> Json<Value> {
    let host = state.host.lock().await;
    Json(host.style.document().clone())
}
