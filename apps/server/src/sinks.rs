// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server-side collaborators: the latest style document, the change log and
//! the currently displayed building.

use gml_energy_processing::{ChangeNotifier, Presenter, StyleRenderer, StyleRules};
use serde::Serialize;
use serde_json::Value;

/// Holds the most recently published 3D Tiles style.
#[derive(Debug, Clone)]
pub struct StyleStore {
    document: Value,
    rule_count: usize,
}

impl Default for StyleStore {
    fn default() -> Self {
        Self {
            document: StyleRules::default().to_tiles_style(),
            rule_count: 0,
        }
    }
}

impl StyleStore {
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn rule_count(&self) -> usize {
        self.rule_count
    }
}

impl StyleRenderer for StyleStore {
    fn apply_style(&mut self, rules: &StyleRules) {
        self.document = rules.to_tiles_style();
        self.rule_count = rules.len();
        tracing::debug!(rules = self.rule_count, "Style rules published");
    }
}

/// Counts building updates across cycles. The latest list lives on the monitor.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    total_changes: u64,
}

impl ChangeLog {
    pub fn total_changes(&self) -> u64 {
        self.total_changes
    }
}

impl ChangeNotifier for ChangeLog {
    fn notify_changed(&mut self, changed: &[String]) {
        tracing::info!(count = changed.len(), ids = ?changed, "Buildings updated");
        self.total_changes += changed.len() as u64;
    }
}

/// What the display slot currently shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayBoard {
    pub id: Option<String>,
    pub text: Option<String>,
}

impl Presenter for DisplayBoard {
    fn present(&mut self, id: &str, text: &str) {
        self.id = Some(id.to_string());
        self.text = Some(text.to_string());
    }

    fn retire(&mut self, id: &str) {
        if self.id.as_deref() == Some(id) {
            self.id = None;
            self.text = None;
        }
    }
}
