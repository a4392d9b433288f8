// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # GML-Energy Core
//!
//! Building identity and the in-memory record cache shared by the geometry,
//! processing and server crates.
//!
//! ## Overview
//!
//! Two upstream sources describe the same buildings with different GML ID
//! spellings. The energy API uses an underscore delimiter (`DEBW_0010001`),
//! the attributes API a marker letter (`DEBWL0010001`). This crate provides:
//!
//! - **Identity**: [`IdentityResolver`] converts between the two spellings
//!   and builds compound keys for buildings with several geometries
//! - **Records**: [`BuildingRecord`] holds display text, fill color and
//!   footprint rings with their precomputed bounds
//! - **Cache**: [`BuildingCache`] stores records in insertion order and
//!   resolves IDs through exact, alias, variant and substring stages
//!
//! ## Quick Start
//!
//! ```rust
//! use gml_energy_core::{BuildingCache, BuildingRecord, MatchStage, Rgba};
//!
//! let mut cache = BuildingCache::new();
//! let record = BuildingRecord::new("DEBW_0010001", "Specific Demand: 120 kWh/m2a", Rgba::FALLBACK);
//! cache.upsert(record, None).unwrap();
//!
//! let hit = cache.lookup("DEBWL0010001").unwrap();
//! assert_eq!(hit.key, "DEBW_0010001");
//! assert_eq!(hit.stage, MatchStage::Variant);
//! ```

pub mod bounds;
pub mod cache;
pub mod color;
pub mod error;
pub mod id;
pub mod record;

pub use bounds::{BoundingBox, Point3, Ring, Rings};
pub use cache::{BuildingCache, CacheStats, LookupHit, MatchStage};
pub use color::Rgba;
pub use error::{Error, Result};
pub use id::{base_id, compound_key, is_compound, IdentityResolver, COMPOUND_SEPARATOR};
pub use record::BuildingRecord;
