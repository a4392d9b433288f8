// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "gml-energy-server",
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "gml-energy-server",
        version: env!("CARGO_PKG_VERSION"),
        description: "Building energy cache with real-time change detection",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/api/v1/health",
                description: "Health check endpoint",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/buildings/:id",
                description: "Cached energy record for a building (either ID format)",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/buildings/:id/validate",
                description: "Check whether a point lies inside the building footprint",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/buildings/:id/display",
                description: "Show the building in the display slot",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/display",
                description: "Currently displayed building",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/locate",
                description: "Find the building containing a point",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/style",
                description: "3D Tiles style with per-building colors",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/changes",
                description: "Buildings changed by the last update",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/stats",
                description: "Cache and polling statistics",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/polling",
                description: "Adjust the polling interval or adaptive mode",
            },
            EndpointInfo {
                method: "DELETE",
                path: "/api/v1/buildings",
                description: "Clear the building cache",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/refresh",
                description: "Reload all buildings from the energy API",
            },
        ],
    })
}
