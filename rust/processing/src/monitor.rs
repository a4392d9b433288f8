// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The cache, the change detector and the display slot wired together.
//!
//! [`EnergyMonitor`] is the single owner of all mutable state. The host
//! drives it from one logical thread: it calls [`EnergyMonitor::tick`] on
//! every frame, runs the fetches it is asked to run, and hands each response
//! back with the token it was issued.

use gml_energy_core::BuildingCache;
use gml_energy_geometry::GeometryIndex;

use crate::detector::{ChangeDetector, CycleOutcome, PollGate, PollingConfig, RequestToken};
use crate::display::{DisplaySlot, ShowOutcome};
use crate::error::{FetchResult, Result};
use crate::ingest::{ingest_bulk, IngestReport};
use crate::sink::{Presenter, Sinks, StyleRenderer};
use crate::style::StyleRules;

#[derive(Debug, Clone)]
pub struct EnergyMonitor {
    cache: BuildingCache,
    detector: ChangeDetector,
    display: DisplaySlot,
    data_loaded: bool,
    last_full_load: u64,
    full_load_in_flight: Option<RequestToken>,
    last_changed: Vec<String>,
    style_revision: u64,
}

impl Default for EnergyMonitor {
    fn default() -> Self {
        Self::new(PollingConfig::default())
    }
}

impl EnergyMonitor {
    pub fn new(config: PollingConfig) -> Self {
        Self {
            cache: BuildingCache::new(),
            detector: ChangeDetector::new(config),
            display: DisplaySlot::new(),
            data_loaded: false,
            last_full_load: 0,
            full_load_in_flight: None,
            last_changed: Vec::new(),
            style_revision: 0,
        }
    }

    /// Issue the token for a full reload. A previous reload still in flight becomes stale.
    pub fn begin_full_load(&mut self) -> RequestToken {
        self.last_full_load += 1;
        let token = RequestToken::new(self.last_full_load);
        self.full_load_in_flight = Some(token);
        tracing::info!(token = token.value(), "Full load requested");
        token
    }

    /// Apply a full reload: clear, re-ingest and restart monitoring.
    ///
    /// Returns `Ok(None)` for a stale token. On failure the previous cache
    /// contents stay in place.
    pub fn complete_full_load(
        &mut self,
        token: RequestToken,
        response: FetchResult,
        renderer: &mut dyn StyleRenderer,
    ) -> Result<Option<IngestReport>> {
        if self.full_load_in_flight != Some(token) {
            tracing::debug!(token = token.value(), "Discarding stale full load response");
            return Ok(None);
        }
        self.full_load_in_flight = None;

        let body = response?;
        // A poll started against the old contents must not be applied to the new ones.
        self.detector.invalidate();
        let report = ingest_bulk(&mut self.cache, &body)?;

        self.data_loaded = true;
        self.last_changed.clear();
        self.detector.start(&self.cache);
        self.publish_style(renderer);
        Ok(Some(report))
    }

    /// Advance the scheduler; returns a token when a poll should be fetched.
    pub fn tick(&mut self, dt: f64, has_credential: bool) -> Option<RequestToken> {
        let gate = PollGate {
            data_loaded: self.data_loaded,
            has_credential,
        };
        self.detector.tick(dt, gate)
    }

    /// Apply a poll completion and push any changes to the collaborators.
    pub fn complete_poll(
        &mut self,
        token: RequestToken,
        response: FetchResult,
        sinks: Sinks<'_>,
    ) -> CycleOutcome {
        let outcome = self.detector.complete(token, response, &mut self.cache);
        if let CycleOutcome::Changed(changed) = &outcome {
            self.publish_style(sinks.renderer);
            sinks.notifier.notify_changed(changed);
            self.display.refresh(&self.cache, sinks.presenter, changed);
            self.last_changed.clone_from(changed);
        }
        outcome
    }

    /// Show a building's text through the presenter.
    pub fn show(&mut self, id: &str, presenter: &mut dyn Presenter, now: f64) -> ShowOutcome {
        self.display.show(id, &self.cache, presenter, now)
    }

    /// Empty the cache and stop applying in-flight polls.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.detector.invalidate();
        self.data_loaded = false;
        self.last_changed.clear();
        tracing::info!("Building cache cleared");
    }

    fn publish_style(&mut self, renderer: &mut dyn StyleRenderer) {
        let rules = StyleRules::from_cache(&self.cache);
        renderer.apply_style(&rules);
        self.style_revision += 1;
    }

    pub fn cache(&self) -> &BuildingCache {
        &self.cache
    }

    pub fn geometry(&self) -> GeometryIndex<'_> {
        GeometryIndex::new(&self.cache)
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut ChangeDetector {
        &mut self.detector
    }

    pub fn is_loaded(&self) -> bool {
        self.data_loaded
    }

    /// Base IDs changed by the most recent cycle that had changes.
    pub fn last_changed(&self) -> &[String] {
        &self.last_changed
    }

    /// Bumped every time new style rules are published.
    pub fn style_revision(&self) -> u64 {
        self.style_revision
    }

    pub fn displayed(&self) -> Option<&str> {
        self.display.current()
    }
}
