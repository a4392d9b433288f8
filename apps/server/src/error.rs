// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gml_energy_processing::FetchError;
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Building data has not been loaded yet")]
    NotLoaded,

    #[error("A newer reload superseded this one")]
    Superseded,

    #[error("Energy API error: {0}")]
    Upstream(#[from] FetchError),

    #[error("Processing error: {0}")]
    Processing(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NotLoaded => (StatusCode::SERVICE_UNAVAILABLE, "NOT_LOADED"),
            ApiError::Superseded => (StatusCode::CONFLICT, "SUPERSEDED"),
            ApiError::Upstream(FetchError::Unauthorized) => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAUTHORIZED"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Processing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PROCESSING_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<gml_energy_processing::Error> for ApiError {
    fn from(err: gml_energy_processing::Error) -> Self {
        match err {
            gml_energy_processing::Error::Fetch(fetch) => ApiError::Upstream(fetch),
            other => ApiError::Processing(other.to_string()),
        }
    }
}
