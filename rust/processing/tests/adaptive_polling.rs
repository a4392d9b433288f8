// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use gml_energy_core::Rgba;
use gml_energy_processing::{
    ChangeNotifier, CycleOutcome, EnergyMonitor, FetchError, NullSink, PollState, PollingConfig,
    Presenter, RequestToken, Sinks, StyleRenderer, StyleRules,
};
use serde_json::json;

#[derive(Default)]
struct Recorder {
    styles: usize,
    changed: Vec<Vec<String>>,
    presented: Vec<(String, String)>,
}

impl StyleRenderer for Recorder {
    fn apply_style(&mut self, _rules: &StyleRules) {
        self.styles += 1;
    }
}

impl ChangeNotifier for Recorder {
    fn notify_changed(&mut self, changed: &[String]) {
        self.changed.push(changed.to_vec());
    }
}

impl Presenter for Recorder {
    fn present(&mut self, id: &str, text: &str) {
        self.presented.push((id.to_string(), text.to_string()));
    }
    fn retire(&mut self, _id: &str) {}
}

fn bulk() -> String {
    json!([
        {
            "modified_gml_id": "A_1",
            "energy_result": {"begin": {}, "end": {"color": {"energy_demand_specific_color": "#102030"}}},
            "coordinates": [[0, 0], [10, 0], [10, 10], [0, 10]]
        },
        {
            "modified_gml_id": "B_2",
            "energy_result": {"begin": {}, "end": {}}
        }
    ])
    .to_string()
}

fn poll(a_consumption: f64) -> String {
    json!({
        "results": [
            {"gml_id": "A_1", "energy_consumption": a_consumption},
            {"gml_id": "BL2", "heating_consumption": 7.5}
        ]
    })
    .to_string()
}

/// One building with two footprints, told apart by their numeric `id`.
fn compound_bulk() -> String {
    json!([
        {
            "modified_gml_id": "A_1",
            "id": 10,
            "energy_result": {"begin": {}, "end": {}},
            "coordinates": [[0, 0], [10, 0], [10, 10], [0, 10]]
        },
        {
            "modified_gml_id": "A_1",
            "id": 11,
            "energy_result": {"begin": {}, "end": {}},
            "coordinates": [[20, 0], [30, 0], [30, 10], [20, 10]]
        }
    ])
    .to_string()
}

fn compound_poll() -> String {
    json!({
        "results": [
            {"gml_id": "A_1", "id": 10, "energy_consumption": 1.0},
            {"gml_id": "A_1", "id": 11, "energy_consumption": 2.0}
        ]
    })
    .to_string()
}

fn monitor_with(body: String) -> EnergyMonitor {
    let mut monitor = EnergyMonitor::new(PollingConfig::default());
    let token = monitor.begin_full_load();
    monitor
        .complete_full_load(token, Ok(body), &mut NullSink)
        .unwrap()
        .unwrap();
    monitor
}

fn loaded_monitor() -> EnergyMonitor {
    monitor_with(bulk())
}

/// Tick exactly one interval and return the issued token.
fn next_poll(monitor: &mut EnergyMonitor) -> RequestToken {
    let dt = monitor.detector().interval();
    monitor.tick(dt, true).unwrap()
}

fn run_cycle(monitor: &mut EnergyMonitor, body: String, recorder: &mut Recorder) -> CycleOutcome {
    let token = next_poll(monitor);
    let (mut renderer, mut notifier) = (NullSink, NullSink);
    monitor.complete_poll(
        token,
        Ok(body),
        Sinks {
            renderer: &mut renderer,
            notifier: &mut notifier,
            presenter: recorder,
        },
    )
}

#[test]
fn first_cycle_reports_every_polled_building() {
    let mut monitor = loaded_monitor();
    let mut recorder = Recorder::default();

    let outcome = run_cycle(&mut monitor, poll(1.0), &mut recorder);
    assert_eq!(
        outcome,
        CycleOutcome::Changed(vec!["A_1".to_string(), "B_2".to_string()])
    );

    let a = monitor.cache().get("A_1").unwrap();
    assert_eq!(a.display_text(), "Real-time Energy Data\nEnergy Consumption: 1.00 kWh\n");
    assert_eq!(a.color(), Rgba::opaque(0x10, 0x20, 0x30));
    assert!(a.has_geometry());

    let b = monitor.cache().get("B_2").unwrap();
    assert_eq!(b.display_text(), "Real-time Energy Data\nHeating Consumption: 7.50 kWh\n");
    assert!(monitor.cache().get("BL2").is_none());
}

#[test]
fn no_change_stability() {
    let mut monitor = loaded_monitor();
    let mut recorder = Recorder::default();
    run_cycle(&mut monitor, poll(1.0), &mut recorder);
    assert_eq!(monitor.detector().interval(), 1.0);

    let mut transitions = 0;
    let mut previous = monitor.detector().interval();
    for cycle in 1..=10 {
        let outcome = run_cycle(&mut monitor, poll(1.0), &mut recorder);
        assert_eq!(outcome, CycleOutcome::Unchanged { no_change_cycles: cycle });

        let interval = monitor.detector().interval();
        if cycle < 10 {
            assert_eq!(interval, 1.0, "cycle {cycle}");
        }
        if interval != previous {
            transitions += 1;
            previous = interval;
        }
    }
    assert_eq!(monitor.detector().interval(), 5.0);

    for _ in 0..5 {
        run_cycle(&mut monitor, poll(1.0), &mut recorder);
        if monitor.detector().interval() != previous {
            transitions += 1;
            previous = monitor.detector().interval();
        }
    }
    assert_eq!(transitions, 1);
    assert_eq!(monitor.detector().interval(), 5.0);
}

#[test]
fn rows_for_separate_geometries_settle_and_slow_down() {
    let mut monitor = monitor_with(compound_bulk());
    let mut recorder = Recorder::default();

    let outcome = run_cycle(&mut monitor, compound_poll(), &mut recorder);
    assert_eq!(outcome, CycleOutcome::Changed(vec!["A_1".to_string()]));

    let mut transitions = 0;
    let mut previous = monitor.detector().interval();
    for cycle in 1..=15 {
        let outcome = run_cycle(&mut monitor, compound_poll(), &mut recorder);
        assert_eq!(outcome, CycleOutcome::Unchanged { no_change_cycles: cycle });
        if monitor.detector().interval() != previous {
            transitions += 1;
            previous = monitor.detector().interval();
        }
    }
    assert_eq!(transitions, 1);
    assert_eq!(monitor.detector().interval(), 5.0);

    let cache = monitor.cache();
    assert_eq!(
        cache.get("A_1").unwrap().display_text(),
        "Real-time Energy Data\nEnergy Consumption: 1.00 kWh\n"
    );
    assert_eq!(
        cache.get("A_1#11").unwrap().display_text(),
        "Real-time Energy Data\nEnergy Consumption: 2.00 kWh\n"
    );
}

#[test]
fn change_resets_cadence() {
    let mut monitor = loaded_monitor();
    let mut recorder = Recorder::default();
    run_cycle(&mut monitor, poll(1.0), &mut recorder);
    for _ in 0..12 {
        run_cycle(&mut monitor, poll(1.0), &mut recorder);
    }
    assert_eq!(monitor.detector().interval(), 5.0);

    let outcome = run_cycle(&mut monitor, poll(2.0), &mut recorder);
    assert_eq!(outcome, CycleOutcome::Changed(vec!["A_1".to_string()]));
    assert_eq!(monitor.detector().interval(), 1.0);
    assert_eq!(monitor.detector().no_change_cycles(), 0);
    assert_eq!(monitor.last_changed(), ["A_1".to_string()]);
}

#[test]
fn single_poll_in_flight() {
    let mut monitor = loaded_monitor();
    let token = next_poll(&mut monitor);
    assert_eq!(monitor.detector().state(), PollState::Polling);

    // Ticks while polling neither start a second poll nor accumulate time.
    for _ in 0..50 {
        assert_eq!(monitor.tick(1.0, true), None);
    }

    let mut sink = (NullSink, NullSink, NullSink);
    let outcome = monitor.complete_poll(
        token,
        Err(FetchError::Transport("timed out".into())),
        Sinks {
            renderer: &mut sink.0,
            notifier: &mut sink.1,
            presenter: &mut sink.2,
        },
    );
    assert!(matches!(outcome, CycleOutcome::Failed(_)));
    assert_eq!(monitor.detector().state(), PollState::Idle);
    assert_eq!(monitor.tick(0.5, true), None);
    assert!(monitor.tick(0.5, true).is_some());
}

#[test]
fn stale_response_after_clear_is_discarded() {
    let mut monitor = loaded_monitor();
    let token = next_poll(&mut monitor);
    monitor.clear();

    let mut recorder = Recorder::default();
    let (mut renderer, mut notifier) = (NullSink, NullSink);
    let outcome = monitor.complete_poll(
        token,
        Ok(poll(3.0)),
        Sinks {
            renderer: &mut renderer,
            notifier: &mut notifier,
            presenter: &mut recorder,
        },
    );
    assert_eq!(outcome, CycleOutcome::Stale);
    assert!(monitor.cache().is_empty());
    assert!(!monitor.is_loaded());
    // Not loaded, so no further polls start.
    assert_eq!(monitor.tick(10.0, true), None);
}

#[test]
fn stale_full_load_is_ignored() {
    let mut monitor = EnergyMonitor::default();
    let first = monitor.begin_full_load();
    let second = monitor.begin_full_load();

    let stale = monitor
        .complete_full_load(first, Ok(bulk()), &mut NullSink)
        .unwrap();
    assert!(stale.is_none());
    assert!(monitor.cache().is_empty());

    let report = monitor
        .complete_full_load(second, Ok(bulk()), &mut NullSink)
        .unwrap()
        .unwrap();
    assert_eq!(report.ingested, 2);
    assert!(monitor.is_loaded());
}

#[test]
fn polling_requires_credential() {
    let mut monitor = loaded_monitor();
    assert_eq!(monitor.tick(1.0, false), None);
    assert_eq!(monitor.detector().state(), PollState::Idle);
}

#[test]
fn collaborators_receive_changes() {
    let mut monitor = loaded_monitor();
    let mut presenter = Recorder::default();
    monitor.show("A_1", &mut presenter, 0.0);

    let token = next_poll(&mut monitor);
    let mut renderer = Recorder::default();
    let mut notifier = Recorder::default();
    monitor.complete_poll(
        token,
        Ok(poll(4.0)),
        Sinks {
            renderer: &mut renderer,
            notifier: &mut notifier,
            presenter: &mut presenter,
        },
    );

    assert_eq!(renderer.styles, 1);
    assert_eq!(notifier.changed, [vec!["A_1".to_string(), "B_2".to_string()]]);
    assert_eq!(presenter.presented.len(), 2);
    assert!(presenter.presented[1].1.contains("4.00 kWh"));
    assert_eq!(monitor.style_revision(), 2);
}
