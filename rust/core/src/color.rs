// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display colors derived from energy classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An 8-bit sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Color used when the energy API sends no usable classification color.
    pub const FALLBACK: Rgba = Rgba::opaque(0x66, 0xb0, 0x32);

    /// Default for features without a rule.
    pub const WHITE: Rgba = Rgba::opaque(0xff, 0xff, 0xff);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse `#RRGGBB` or `RRGGBB`. Hex digits may be either case.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| Error::InvalidColor(hex.to_string()))
        };

        Ok(Self::opaque(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Parse a hex color, substituting [`Rgba::FALLBACK`] when it is malformed.
    pub fn from_hex_or_fallback(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or(Self::FALLBACK)
    }

    /// `#RRGGBB` (alpha is dropped).
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// CSS-style `rgba(r,g,b,a)` with alpha in `[0, 1]`.
    pub fn to_css_rgba(&self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            self.r,
            self.g,
            self.b,
            f64::from(self.a) / 255.0
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
