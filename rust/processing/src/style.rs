// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Declarative `{id -> color}` rules for the styling renderer.

use gml_energy_core::{BuildingCache, Rgba};
use serde::Serialize;
use serde_json::{json, Value};

/// Color applied to features that match no rule.
pub const DEFAULT_STYLE_COLOR: &str = "rgba(255,255,255,1.0)";

/// Feature property the tile style matches IDs against.
const FEATURE_ID_PROPERTY: &str = "gml:id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRule {
    pub id: String,
    pub color: Rgba,
}

/// Ordered color rules, one per canonical ID plus one per alternate ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleRules {
    rules: Vec<StyleRule>,
}

impl StyleRules {
    pub fn from_cache(cache: &BuildingCache) -> Self {
        let mut rules = Vec::with_capacity(cache.len());
        for (key, record) in cache.buildings() {
            rules.push(StyleRule {
                id: key.to_string(),
                color: record.color(),
            });
            if let Some(alternate) = record.alternate_id() {
                rules.push(StyleRule {
                    id: alternate.to_string(),
                    color: record.color(),
                });
            }
        }
        Self { rules }
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule matching `id` exactly.
    pub fn color_of(&self, id: &str) -> Option<Rgba> {
        self.rules.iter().find(|r| r.id == id).map(|r| r.color)
    }

    /// `{id: "#RRGGBB"}` table.
    pub fn color_table(&self) -> serde_json::Map<String, Value> {
        self.rules
            .iter()
            .map(|r| (r.id.clone(), Value::String(r.color.to_hex())))
            .collect()
    }

    /// 3D Tiles style document with one condition per rule and a default.
    pub fn to_tiles_style(&self) -> Value {
        let mut conditions: Vec<Value> = self
            .rules
            .iter()
            .map(|rule| {
                let condition = format!(
                    "${{feature['{}']}} === {}",
                    FEATURE_ID_PROPERTY,
                    Value::String(rule.id.clone())
                );
                json!([condition, rule.color.to_css_rgba()])
            })
            .collect();
        conditions.push(json!(["true", DEFAULT_STYLE_COLOR]));

        json!({ "color": { "conditions": conditions } })
    }
}
