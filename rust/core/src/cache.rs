// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory building record cache.
//!
//! Records are keyed by canonical ID. When several geometries share one
//! canonical ID (the energy API returns one row per footprint, each with its
//! own numeric `id`), every geometry is kept under a compound key
//! `"{canonical}#{numeric}"` and the first one seen also stays under the bare
//! canonical ID so that plain lookups keep working.
//!
//! ## Lookup stages
//!
//! [`BuildingCache::lookup`] stops at the first stage that hits:
//!
//! 1. **Exact**: the ID is a cache key.
//! 2. **Alias**: the ID is the alternate ID recorded on a cached building.
//! 3. **Variant**: the delimiter-swapped forms of the ID and of a cached key
//!    coincide. First match in insertion order wins.
//! 4. **Substring** (legacy): the ID contains a cached key or a cached key
//!    contains the ID. This stage only exists to bridge historical ID drift
//!    between the two upstream producers and can return the wrong building;
//!    callers that write to the cache must use [`BuildingCache::resolve`],
//!    which never runs it.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::id::{base_id, compound_key, is_compound, IdentityResolver};
use crate::record::BuildingRecord;

/// Which lookup stage produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    Exact,
    Alias,
    Variant,
    Substring,
}

/// A successful lookup.
#[derive(Debug, Clone, Copy)]
pub struct LookupHit<'a> {
    /// Cache key the record is stored under.
    pub key: &'a str,
    pub record: &'a BuildingRecord,
    pub stage: MatchStage,
}

/// Entry counts, replacing ad-hoc cache statistics logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// All keys, bare and compound.
    pub entries: usize,
    /// Bare canonical keys.
    pub buildings: usize,
    pub compound_entries: usize,
    pub aliases: usize,
    /// Entries with at least one usable ring.
    pub with_geometry: usize,
}

/// Building records keyed by canonical ID, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct BuildingCache {
    entries: IndexMap<String, BuildingRecord>,
    /// Alternate ID to canonical ID.
    aliases: FxHashMap<String, String>,
    /// Numeric ID of the geometry a bare entry was first stored from.
    bare_sources: FxHashMap<String, i64>,
    resolver: IdentityResolver,
}

impl BuildingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(resolver: IdentityResolver) -> Self {
        Self {
            resolver,
            ..Self::default()
        }
    }

    #[inline]
    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Insert or fully replace a record.
    ///
    /// Without `numeric_id` the record replaces whatever is stored under its
    /// canonical ID (last write wins). With `numeric_id` the record replaces
    /// the compound entry `"{canonical}#{numeric_id}"`, and is also stored
    /// under the bare canonical ID only if nothing is there yet. In that case
    /// `numeric_id` is remembered as the bare entry's source geometry.
    pub fn upsert(&mut self, record: BuildingRecord, numeric_id: Option<i64>) -> Result<()> {
        if record.canonical_id().is_empty() {
            return Err(Error::EmptyId);
        }

        match numeric_id {
            None => self.insert_bare(record),
            Some(numeric_id) => {
                let key = compound_key(record.canonical_id(), numeric_id);
                if !self.entries.contains_key(record.canonical_id()) {
                    self.bare_sources
                        .insert(record.canonical_id().to_string(), numeric_id);
                    self.insert_bare(record.clone());
                }
                self.entries.insert(key, record);
            }
        }
        Ok(())
    }

    fn insert_bare(&mut self, record: BuildingRecord) {
        let canonical = record.canonical_id().to_string();

        let stale_alias = self
            .entries
            .get(&canonical)
            .and_then(|previous| previous.alternate_id())
            .map(str::to_string);
        if let Some(alias) = stale_alias {
            if self.aliases.get(&alias) == Some(&canonical) {
                self.aliases.remove(&alias);
            }
        }

        if let Some(alias) = record.alternate_id() {
            self.aliases.insert(alias.to_string(), canonical.clone());
        }
        self.entries.insert(canonical, record);
    }

    /// Exact key lookup, no fallbacks.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&BuildingRecord> {
        self.entries.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Numeric ID of the compound geometry the bare entry `base` was copied
    /// from, or `None` if it was stored without one.
    #[inline]
    pub fn bare_source(&self, base: &str) -> Option<i64> {
        self.bare_sources.get(base).copied()
    }

    /// Full lookup including the legacy substring stage.
    pub fn lookup(&self, id: &str) -> Option<LookupHit<'_>> {
        self.resolve(id).or_else(|| self.substring_match(id))
    }

    /// Exact, alias and variant stages only.
    pub fn resolve(&self, id: &str) -> Option<LookupHit<'_>> {
        self.exact_match(id)
            .or_else(|| self.alias_match(id))
            .or_else(|| self.variant_match(id))
    }

    /// Cache key `id` resolves to without the substring stage.
    pub fn resolve_key(&self, id: &str) -> Option<&str> {
        self.resolve(id).map(|hit| hit.key)
    }

    fn hit<'a>(&'a self, key: &str, stage: MatchStage) -> Option<LookupHit<'a>> {
        self.entries
            .get_key_value(key)
            .map(|(key, record)| LookupHit {
                key: key.as_str(),
                record,
                stage,
            })
    }

    fn exact_match(&self, id: &str) -> Option<LookupHit<'_>> {
        self.hit(id, MatchStage::Exact)
    }

    fn alias_match(&self, id: &str) -> Option<LookupHit<'_>> {
        let canonical = self.aliases.get(id)?;
        self.hit(canonical, MatchStage::Alias)
    }

    fn variant_match(&self, id: &str) -> Option<LookupHit<'_>> {
        let wanted = self.resolver.variants(id);
        self.entries
            .iter()
            .find(|(key, _)| {
                let cached = self.resolver.variants(key);
                wanted.iter().any(|w| cached.contains(w))
            })
            .map(|(key, record)| LookupHit {
                key: key.as_str(),
                record,
                stage: MatchStage::Variant,
            })
    }

    fn substring_match(&self, id: &str) -> Option<LookupHit<'_>> {
        if id.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(key, _)| id.contains(key.as_str()) || key.contains(id))
            .map(|(key, record)| LookupHit {
                key: key.as_str(),
                record,
                stage: MatchStage::Substring,
            })
    }

    /// The bare entry of `base` and every compound entry sharing that base.
    pub fn geometries_for<'a>(
        &'a self,
        base: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a BuildingRecord)> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| base_id(key) == base)
            .map(|(key, record)| (key.as_str(), record))
    }

    /// All entries, bare and compound, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BuildingRecord)> {
        self.entries.iter().map(|(key, record)| (key.as_str(), record))
    }

    /// Bare entries only.
    pub fn buildings(&self) -> impl Iterator<Item = (&str, &BuildingRecord)> {
        self.iter().filter(|(key, _)| !is_compound(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every record and alias.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.aliases.clear();
        self.bare_sources.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let compound_entries = self.keys().filter(|key| is_compound(key)).count();
        CacheStats {
            entries: self.entries.len(),
            buildings: self.entries.len() - compound_entries,
            compound_entries,
            aliases: self.aliases.len(),
            with_geometry: self.entries.values().filter(|r| r.has_geometry()).count(),
        }
    }
}
