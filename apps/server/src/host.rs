// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The tick loop driving the energy monitor.
//!
//! All monitor state sits behind one async mutex, so tick handling and fetch
//! completions run one at a time. Fetches themselves run as spawned tasks
//! without holding the lock.

use std::time::{Duration, Instant};

use gml_energy_processing::{
    CycleOutcome, EnergyMonitor, IngestReport, RequestToken, Result as ProcessingResult, Sinks,
};
use tokio::time::MissedTickBehavior;

use crate::sinks::{ChangeLog, DisplayBoard, StyleStore};
use crate::AppState;

/// Monitor plus the collaborators it reports to.
#[derive(Debug)]
pub struct HostState {
    pub monitor: EnergyMonitor,
    pub style: StyleStore,
    pub changes: ChangeLog,
    pub display: DisplayBoard,
}

impl HostState {
    pub fn new(monitor: EnergyMonitor) -> Self {
        Self {
            monitor,
            style: StyleStore::default(),
            changes: ChangeLog::default(),
            display: DisplayBoard::default(),
        }
    }

    /// Apply a poll completion, reporting to this host's collaborators.
    pub fn complete_poll(
        &mut self,
        token: RequestToken,
        response: gml_energy_processing::FetchResult,
    ) -> CycleOutcome {
        self.monitor.complete_poll(
            token,
            response,
            Sinks {
                renderer: &mut self.style,
                notifier: &mut self.changes,
                presenter: &mut self.display,
            },
        )
    }

    pub fn complete_full_load(
        &mut self,
        token: RequestToken,
        response: gml_energy_processing::FetchResult,
    ) -> ProcessingResult<Option<IngestReport>> {
        self.monitor
            .complete_full_load(token, response, &mut self.style)
    }
}

/// Run the scheduler forever at the configured tick period.
pub async fn run(state: AppState) {
    let period = Duration::from_millis(state.config.tick_interval_ms.max(1));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(tick_ms = period.as_millis() as u64, "Host loop started");
    let mut last = Instant::now();
    loop {
        ticker.tick().await;
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        let token = {
            let mut host = state.host.lock().await;
            host.monitor.tick(dt, state.client.has_credential())
        };
        if let Some(token) = token {
            spawn_poll(state.clone(), token);
        }
    }
}

fn spawn_poll(state: AppState, token: RequestToken) {
    tokio::spawn(async move {
        let response = state.client.fetch_updates().await;
        let outcome = state.host.lock().await.complete_poll(token, response);
        match outcome {
            CycleOutcome::Changed(changed) => {
                tracing::debug!(token = token.value(), changed = changed.len(), "Poll applied")
            }
            CycleOutcome::Unchanged { no_change_cycles } => {
                tracing::trace!(token = token.value(), no_change_cycles, "Poll unchanged")
            }
            CycleOutcome::Failed(reason) => {
                tracing::debug!(token = token.value(), %reason, "Poll failed")
            }
            CycleOutcome::Stale => {}
        }
    });
}

/// Fetch and apply a full reload, waiting for the result.
pub async fn full_load(state: &AppState) -> ProcessingResult<Option<IngestReport>> {
    let token = state.host.lock().await.monitor.begin_full_load();
    let response = state.client.fetch_buildings().await;
    state.host.lock().await.complete_full_load(token, response)
}

/// Initial load at startup. Failures are logged; `POST /api/v1/refresh` retries.
pub fn spawn_initial_load(state: AppState) {
    tokio::spawn(async move {
        match full_load(&state).await {
            Ok(Some(report)) => tracing::info!(
                ingested = report.ingested,
                skipped = report.skipped,
                "Initial building load complete"
            ),
            Ok(None) => tracing::debug!("Initial load superseded"),
            Err(error) => tracing::warn!(%error, "Initial building load failed"),
        }
    });
}
