// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identifier resolution between the two GML ID encodings.
//!
//! The energy API publishes `modified_gml_id` values that use an underscore
//! delimiter (`DEBW_001000wrHDD`), while the attributes API expects the
//! original `gml_id` with a marker letter in the same position
//! (`DEBWL001000wrHDD`). Both forms name the same building.
//!
//! All transforms are case-sensitive: `G` and `g` are different characters
//! and no trimming or case folding is ever applied.

/// Separator between a base ID and the numeric suffix of a compound key.
pub const COMPOUND_SEPARATOR: char = '#';

/// Converts IDs between the underscore form and the marker-letter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityResolver {
    delimiter: char,
    marker: char,
}

impl IdentityResolver {
    /// Create a resolver substituting `delimiter` (canonical) with `marker` (alternate).
    pub const fn new(delimiter: char, marker: char) -> Self {
        Self { delimiter, marker }
    }

    /// The delimiter used by canonical (energy API) IDs.
    #[inline]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// The marker letter used by alternate (attributes API) IDs.
    #[inline]
    pub fn marker(&self) -> char {
        self.marker
    }

    /// Canonical form to alternate form: every delimiter becomes the marker.
    pub fn to_alternate(&self, id: &str) -> String {
        swap_char(id, self.delimiter, self.marker)
    }

    /// Alternate form to canonical form: every marker becomes the delimiter.
    pub fn to_canonical(&self, id: &str) -> String {
        swap_char(id, self.marker, self.delimiter)
    }

    /// The ID itself followed by its canonical and alternate rewrites.
    pub fn variants(&self, id: &str) -> [String; 3] {
        [id.to_string(), self.to_canonical(id), self.to_alternate(id)]
    }

    /// True when any delimiter-swapped form of `a` equals any form of `b`.
    pub fn is_variant_of(&self, a: &str, b: &str) -> bool {
        let left = self.variants(a);
        let right = self.variants(b);
        left.iter().any(|l| right.iter().any(|r| l == r))
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new('_', 'L')
    }
}

fn swap_char(id: &str, from: char, to: char) -> String {
    id.chars().map(|c| if c == from { to } else { c }).collect()
}

/// Build the cache key for one of several geometries sharing a base ID.
pub fn compound_key(base: &str, numeric_id: i64) -> String {
    format!("{}{}{}", base, COMPOUND_SEPARATOR, numeric_id)
}

/// Strip a compound-key suffix, returning the base ID.
#[inline]
pub fn base_id(key: &str) -> &str {
    match key.find(COMPOUND_SEPARATOR) {
        Some(idx) => &key[..idx],
        None => key,
    }
}

/// True when `key` carries a compound-key suffix.
#[inline]
pub fn is_compound(key: &str) -> bool {
    key.contains(COMPOUND_SEPARATOR)
}
