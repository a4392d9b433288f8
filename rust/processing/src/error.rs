// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for processing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole ingest or poll cycle.
///
/// Problems with a single entry never surface here; the entry is skipped and
/// logged instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bulk payload is not a JSON array")]
    NotAnArray,

    #[error("Poll payload has no results array")]
    MissingResults,

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Cache error: {0}")]
    Core(#[from] gml_energy_core::Error),
}

/// Failure reported by the transport that fetches payloads.
///
/// Timeouts are reported as `Transport`, never as a hang.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("access credential rejected")]
    Unauthorized,

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("empty response body")]
    EmptyBody,
}

/// Completion value handed back by the transport.
pub type FetchResult = std::result::Result<String, FetchError>;
