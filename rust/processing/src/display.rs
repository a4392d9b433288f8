// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-slot presentation of a building's display text.

use gml_energy_core::{base_id, BuildingCache, MatchStage};

use crate::sink::Presenter;

/// Repeated requests for the shown ID within this window are ignored, in seconds.
pub const REPEAT_DEBOUNCE_SECS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowOutcome {
    /// Presented the record stored under `key`.
    Presented { key: String, stage: MatchStage },
    Debounced,
    NotFound,
}

/// Tracks which building the presenter currently shows.
#[derive(Debug, Clone, Default)]
pub struct DisplaySlot {
    current: Option<String>,
    shown_at: f64,
}

impl DisplaySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Present the record `id` resolves to, retiring the previous one.
    ///
    /// `now` is the host clock in seconds.
    pub fn show(
        &mut self,
        id: &str,
        cache: &BuildingCache,
        presenter: &mut dyn Presenter,
        now: f64,
    ) -> ShowOutcome {
        if self.current.as_deref() == Some(id) && now - self.shown_at < REPEAT_DEBOUNCE_SECS {
            return ShowOutcome::Debounced;
        }

        let Some(hit) = cache.lookup(id) else {
            tracing::debug!(id, "No cached record to display");
            return ShowOutcome::NotFound;
        };
        match hit.stage {
            MatchStage::Substring => {
                tracing::warn!(id, key = hit.key, "Legacy substring match used for display")
            }
            MatchStage::Variant => tracing::debug!(id, key = hit.key, "Variant match"),
            MatchStage::Exact | MatchStage::Alias => {}
        }

        if let Some(previous) = self.current.take() {
            if previous != id {
                presenter.retire(&previous);
            }
        }
        presenter.present(id, hit.record.display_text());
        self.current = Some(id.to_string());
        self.shown_at = now;

        ShowOutcome::Presented {
            key: hit.key.to_string(),
            stage: hit.stage,
        }
    }

    /// Re-present the current building if a cycle rewrote it.
    pub fn refresh(
        &mut self,
        cache: &BuildingCache,
        presenter: &mut dyn Presenter,
        changed: &[String],
    ) -> bool {
        let Some(id) = self.current.as_deref() else {
            return false;
        };
        let Some(hit) = cache.lookup(id) else {
            return false;
        };
        if !changed.iter().any(|c| c == base_id(hit.key)) {
            return false;
        }
        presenter.present(id, hit.record.display_text());
        true
    }

    /// Retire whatever is shown.
    pub fn clear(&mut self, presenter: &mut dyn Presenter) {
        if let Some(previous) = self.current.take() {
            presenter.retire(&previous);
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}
