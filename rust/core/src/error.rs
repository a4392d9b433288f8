// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for cache operations.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or storing records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A record was submitted without a canonical ID.
    #[error("building record has an empty canonical id")]
    EmptyId,

    /// A color string is not a `#RRGGBB` hex triplet.
    #[error("invalid hex color: {0:?}")]
    InvalidColor(String),
}
