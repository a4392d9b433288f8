// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adaptive change detection for incremental polling.
//!
//! The detector is driven by the host's tick loop and never performs I/O
//! itself. [`ChangeDetector::tick`] decides when a poll should start and
//! hands out a [`RequestToken`]; the host runs the fetch and passes the
//! response back to [`ChangeDetector::complete`] together with that token.
//!
//! ## Cadence
//!
//! Every cycle that detects a change snaps the interval back to the fast
//! interval. Consecutive cycles without changes are counted; once the count
//! reaches the slow-down threshold the interval becomes the slow interval
//! and stays there until the next change.
//!
//! ## Correlation
//!
//! At most one poll is in flight. A completion is only applied when its
//! token is the one currently in flight; anything else (a late response
//! after [`ChangeDetector::invalidate`], a duplicate completion) is discarded
//! as stale without touching the cache, the snapshot or the counters.

use gml_energy_core::{base_id, compound_key, BuildingCache};
use serde::{Deserialize, Serialize};

use crate::error::{FetchResult, Result};
use crate::ingest::apply_poll_entry;
use crate::payload::{poll_results, PollEntry};
use crate::snapshot::Snapshot;

/// Bounds for a manually set poll interval, in seconds.
pub const MIN_INTERVAL_SECS: f64 = 0.5;
pub const MAX_INTERVAL_SECS: f64 = 60.0;

/// Poll cadence settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Interval after a cycle with changes, in seconds.
    pub fast_interval: f64,
    /// Interval once the no-change threshold is reached, in seconds.
    pub slow_interval: f64,
    /// Consecutive unchanged cycles before slowing down.
    pub slow_down_threshold: u32,
    /// Switch between the fast and slow interval automatically.
    pub adaptive: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            fast_interval: 1.0,
            slow_interval: 5.0,
            slow_down_threshold: 10,
            adaptive: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Idle,
    Polling,
}

/// Correlates a fetch with its completion. Tokens increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Preconditions owned by the caller for starting a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollGate {
    /// The initial bulk load has completed.
    pub data_loaded: bool,
    /// An access credential is available.
    pub has_credential: bool,
}

impl PollGate {
    #[inline]
    pub fn is_open(self) -> bool {
        self.data_loaded && self.has_credential
    }
}

/// Result of handing a completion to the detector.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The token was not the one in flight. Nothing was applied.
    Stale,
    /// Transport or decode failure. The cadence is left as it was.
    Failed(String),
    Unchanged { no_change_cycles: u32 },
    /// Base IDs whose records were rewritten, in result order.
    Changed(Vec<String>),
}

/// Point-in-time view for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectorStatus {
    pub monitoring: bool,
    pub state: PollState,
    pub interval: f64,
    pub adaptive: bool,
    pub no_change_cycles: u32,
    pub in_flight: Option<RequestToken>,
    pub snapshot_entries: usize,
}

#[derive(Debug, Clone)]
pub struct ChangeDetector {
    config: PollingConfig,
    monitoring: bool,
    state: PollState,
    interval: f64,
    elapsed: f64,
    no_change_cycles: u32,
    last_issued: u64,
    in_flight: Option<RequestToken>,
    snapshot: Snapshot,
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new(PollingConfig::default())
    }
}

impl ChangeDetector {
    pub fn new(config: PollingConfig) -> Self {
        Self {
            config,
            monitoring: false,
            state: PollState::Idle,
            interval: config.fast_interval,
            elapsed: 0.0,
            no_change_cycles: 0,
            last_issued: 0,
            in_flight: None,
            snapshot: Snapshot::new(),
        }
    }

    /// Begin monitoring, capturing a fresh snapshot of `cache`.
    pub fn start(&mut self, cache: &BuildingCache) {
        self.snapshot = Snapshot::capture(cache);
        self.monitoring = true;
        self.state = PollState::Idle;
        self.in_flight = None;
        self.elapsed = 0.0;
        self.no_change_cycles = 0;
        if self.config.adaptive {
            self.interval = self.config.fast_interval;
        }
        tracing::info!(
            interval = self.interval,
            snapshot_entries = self.snapshot.len(),
            "Real-time monitoring started"
        );
    }

    /// Stop monitoring. Any in-flight completion becomes stale.
    pub fn stop(&mut self) {
        self.monitoring = false;
        self.state = PollState::Idle;
        self.in_flight = None;
        self.elapsed = 0.0;
        self.no_change_cycles = 0;
        tracing::info!("Real-time monitoring stopped");
    }

    /// Discard whatever poll is in flight, e.g. after a full cache clear.
    pub fn invalidate(&mut self) {
        if let Some(token) = self.in_flight.take() {
            tracing::debug!(token = token.value(), "Invalidated in-flight poll");
        }
        self.last_issued += 1;
        self.state = PollState::Idle;
    }

    /// Advance the scheduler by `dt` seconds.
    ///
    /// Time only accumulates while idle. When it reaches the interval it is
    /// reset, and a poll starts if `gate` is open. Returns the token of the
    /// started poll.
    pub fn tick(&mut self, dt: f64, gate: PollGate) -> Option<RequestToken> {
        if !self.monitoring || self.state == PollState::Polling {
            return None;
        }

        self.elapsed += dt;
        if self.elapsed < self.interval {
            return None;
        }
        self.elapsed = 0.0;

        if !gate.is_open() {
            tracing::debug!(
                data_loaded = gate.data_loaded,
                has_credential = gate.has_credential,
                "Poll skipped"
            );
            return None;
        }

        self.last_issued += 1;
        let token = RequestToken::new(self.last_issued);
        self.in_flight = Some(token);
        self.state = PollState::Polling;
        tracing::debug!(token = token.value(), "Poll started");
        Some(token)
    }

    /// Apply the completion of the poll identified by `token`.
    pub fn complete(
        &mut self,
        token: RequestToken,
        response: FetchResult,
        cache: &mut BuildingCache,
    ) -> CycleOutcome {
        if self.in_flight != Some(token) {
            tracing::debug!(token = token.value(), "Discarding stale poll response");
            return CycleOutcome::Stale;
        }
        self.in_flight = None;
        self.state = PollState::Idle;

        let body = match response {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(%error, "Real-time fetch failed");
                return CycleOutcome::Failed(error.to_string());
            }
        };

        match self.apply(&body, cache) {
            Ok(changed) => self.finish_cycle(changed),
            Err(error) => {
                tracing::warn!(%error, "Real-time payload rejected");
                CycleOutcome::Failed(error.to_string())
            }
        }
    }

    /// Diff every result against the snapshot and write the changed ones.
    fn apply(&mut self, body: &str, cache: &mut BuildingCache) -> Result<Vec<String>> {
        let results = poll_results(body)?;
        let mut changed: Vec<String> = Vec::new();

        for value in &results {
            let Some(entry) = PollEntry::decode(value) else {
                tracing::debug!("Skipping poll result without an id");
                continue;
            };

            let key = cache
                .resolve_key(entry.id)
                .map(base_id)
                .unwrap_or(entry.id)
                .to_string();
            // Rows for separate geometries of one building are tracked separately.
            let snapshot_key = match entry.numeric_id {
                Some(numeric_id) => compound_key(&key, numeric_id),
                None => key.clone(),
            };

            if !self.snapshot.is_changed(&snapshot_key, &entry.serialized) {
                continue;
            }

            if let Err(error) = apply_poll_entry(cache, &key, &entry) {
                tracing::warn!(id = entry.id, %error, "Skipping poll result");
                continue;
            }
            self.snapshot
                .record(&snapshot_key, entry.serialized.clone(), entry.color);

            if !changed.contains(&key) {
                changed.push(key);
            }
        }

        Ok(changed)
    }

    fn finish_cycle(&mut self, changed: Vec<String>) -> CycleOutcome {
        if !changed.is_empty() {
            self.no_change_cycles = 0;
            if self.config.adaptive {
                self.interval = self.config.fast_interval;
            }
            tracing::info!(changed = changed.len(), interval = self.interval, "Changes detected");
            return CycleOutcome::Changed(changed);
        }

        self.no_change_cycles = self.no_change_cycles.saturating_add(1);
        if self.config.adaptive
            && self.no_change_cycles >= self.config.slow_down_threshold
            && self.interval != self.config.slow_interval
        {
            self.interval = self.config.slow_interval;
            tracing::info!(
                no_change_cycles = self.no_change_cycles,
                interval = self.interval,
                "No recent changes, slowing down polling"
            );
        }
        tracing::debug!(no_change_cycles = self.no_change_cycles, "No changes detected");
        CycleOutcome::Unchanged {
            no_change_cycles: self.no_change_cycles,
        }
    }

    /// Set the interval manually, clamped to `[0.5, 60]` seconds.
    ///
    /// With adaptive polling on, the next cycle overrides it again.
    pub fn set_interval(&mut self, secs: f64) -> f64 {
        if !secs.is_nan() {
            self.interval = secs.clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS);
        }
        self.interval
    }

    /// Turn adaptive polling on or off. Enabling resets to the fast interval.
    pub fn set_adaptive(&mut self, adaptive: bool) {
        self.config.adaptive = adaptive;
        if adaptive {
            self.no_change_cycles = 0;
            self.interval = self.config.fast_interval;
        }
    }

    #[inline]
    pub fn state(&self) -> PollState {
        self.state
    }

    #[inline]
    pub fn interval(&self) -> f64 {
        self.interval
    }

    #[inline]
    pub fn no_change_cycles(&self) -> u32 {
        self.no_change_cycles
    }

    #[inline]
    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    #[inline]
    pub fn in_flight(&self) -> Option<RequestToken> {
        self.in_flight
    }

    pub fn config(&self) -> &PollingConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn status(&self) -> DetectorStatus {
        DetectorStatus {
            monitoring: self.monitoring,
            state: self.state,
            interval: self.interval,
            adaptive: self.config.adaptive,
            no_change_cycles: self.no_change_cycles,
            in_flight: self.in_flight,
            snapshot_entries: self.snapshot.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    const OPEN: PollGate = PollGate {
        data_loaded: true,
        has_credential: true,
    };

    fn started() -> (ChangeDetector, BuildingCache) {
        let cache = BuildingCache::new();
        let mut detector = ChangeDetector::default();
        detector.start(&cache);
        (detector, cache)
    }

    #[test]
    fn does_nothing_until_started() {
        let mut detector = ChangeDetector::default();
        assert_eq!(detector.tick(10.0, OPEN), None);
    }

    #[test]
    fn waits_for_interval() {
        let (mut detector, _) = started();
        assert_eq!(detector.tick(0.5, OPEN), None);
        assert!(detector.tick(0.5, OPEN).is_some());
        assert_eq!(detector.state(), PollState::Polling);
    }

    #[test]
    fn closed_gate_resets_timer_without_polling() {
        let (mut detector, _) = started();
        let closed = PollGate {
            data_loaded: true,
            has_credential: false,
        };
        assert_eq!(detector.tick(1.0, closed), None);
        assert_eq!(detector.state(), PollState::Idle);
        // Timer was reset, a short tick is not enough
        assert_eq!(detector.tick(0.5, OPEN), None);
    }

    #[test]
    fn transport_failure_keeps_cadence() {
        let (mut detector, mut cache) = started();
        detector.set_adaptive(false);
        detector.set_interval(5.0);
        for _ in 0..3 {
            let token = detector.tick(5.0, OPEN).unwrap();
            let outcome = detector.complete(token, Ok(r#"{"results":[]}"#.into()), &mut cache);
            assert_eq!(outcome, CycleOutcome::Unchanged { no_change_cycles: detector.no_change_cycles() });
        }

        let token = detector.tick(5.0, OPEN).unwrap();
        let outcome = detector.complete(token, Err(FetchError::Status(503)), &mut cache);
        assert!(matches!(outcome, CycleOutcome::Failed(_)));
        assert_eq!(detector.no_change_cycles(), 3);
        assert_eq!(detector.interval(), 5.0);
        assert_eq!(detector.state(), PollState::Idle);
    }

    #[test]
    fn malformed_body_is_a_failure() {
        let (mut detector, mut cache) = started();
        let token = detector.tick(1.0, OPEN).unwrap();
        let outcome = detector.complete(token, Ok("{}".into()), &mut cache);
        assert!(matches!(outcome, CycleOutcome::Failed(_)));
        assert_eq!(detector.no_change_cycles(), 0);
    }

    #[test]
    fn set_interval_clamps() {
        let mut detector = ChangeDetector::default();
        assert_eq!(detector.set_interval(0.1), MIN_INTERVAL_SECS);
        assert_eq!(detector.set_interval(600.0), MAX_INTERVAL_SECS);
        assert_eq!(detector.set_interval(f64::NAN), MAX_INTERVAL_SECS);
        assert_eq!(detector.set_interval(2.5), 2.5);
    }

    #[test]
    fn enabling_adaptive_snaps_to_fast() {
        let mut detector = ChangeDetector::default();
        detector.set_adaptive(false);
        detector.set_interval(30.0);
        detector.set_adaptive(true);
        assert_eq!(detector.interval(), 1.0);
        assert_eq!(detector.no_change_cycles(), 0);
    }

    #[test]
    fn invalidate_makes_in_flight_stale() {
        let (mut detector, mut cache) = started();
        let token = detector.tick(1.0, OPEN).unwrap();
        detector.invalidate();

        let body = r#"{"results":[{"gml_id":"A_1","energy_consumption":1}]}"#;
        assert_eq!(detector.complete(token, Ok(body.into()), &mut cache), CycleOutcome::Stale);
        assert!(cache.is_empty());

        let next = detector.tick(1.0, OPEN).unwrap();
        assert!(next > token);
    }
}
