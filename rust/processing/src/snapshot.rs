// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last-known serialized state of every polled building.

use gml_energy_core::{BuildingCache, Rgba};
use rustc_hash::FxHashMap;

/// Serialized forms and colors the change detector diffs against.
///
/// Captured once when monitoring starts and updated in place afterwards.
/// Poll rows carrying a numeric ID are stored under their compound key.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    data: FxHashMap<String, String>,
    colors: FxHashMap<String, Rgba>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the bare entries of the cache.
    pub fn capture(cache: &BuildingCache) -> Self {
        let mut snapshot = Self::default();
        for (key, record) in cache.buildings() {
            let serialized = serde_json::to_string(record).unwrap_or_default();
            snapshot.data.insert(key.to_string(), serialized);
            snapshot.colors.insert(key.to_string(), record.color());
        }
        snapshot
    }

    /// True if `id` is unknown or its serialized form differs.
    pub fn is_changed(&self, id: &str, serialized: &str) -> bool {
        self.data.get(id).map_or(true, |previous| previous != serialized)
    }

    /// Overwrite the entry for `id`. The color is only replaced when given.
    pub fn record(&mut self, id: &str, serialized: String, color: Option<Rgba>) {
        self.data.insert(id.to_string(), serialized);
        if let Some(color) = color {
            self.colors.insert(id.to_string(), color);
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.data.get(id).map(String::as_str)
    }

    pub fn color(&self, id: &str) -> Option<Rgba> {
        self.colors.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.colors.clear();
    }
}
