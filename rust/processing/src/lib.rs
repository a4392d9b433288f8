// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # GML-Energy Processing
//!
//! Everything between a raw energy API response and the building cache:
//!
//! - **Ingest**: bulk payload decoding with fallback field names, display
//!   text generation and cache population ([`ingest_bulk`])
//! - **Change detection**: incremental polling with snapshot diffing, an
//!   adaptive fast/slow cadence and request correlation ([`ChangeDetector`])
//! - **Collaborator boundary**: style rules for the renderer, changed-ID
//!   notification and a single display slot ([`sink`], [`StyleRules`])
//! - **Composition**: [`EnergyMonitor`] owns the cache and drives the rest
//!
//! The crate performs no I/O. Fetches are run by the host, which passes the
//! response body (or a [`FetchError`]) back with the [`RequestToken`] it
//! was issued.
//!
//! ```rust,ignore
//! use gml_energy_processing::{EnergyMonitor, NullSink, Sinks};
//!
//! let mut monitor = EnergyMonitor::default();
//! let token = monitor.begin_full_load();
//! monitor.complete_full_load(token, Ok(bulk_body), &mut NullSink)?;
//!
//! // once per frame
//! if let Some(token) = monitor.tick(dt, true) {
//!     let response = fetch_updates();
//!     let (mut r, mut n, mut p) = (NullSink, NullSink, NullSink);
//!     monitor.complete_poll(token, response, Sinks { renderer: &mut r, notifier: &mut n, presenter: &mut p });
//! }
//! ```

pub mod detector;
pub mod display;
pub mod error;
pub mod ingest;
pub mod monitor;
pub mod payload;
pub mod sink;
pub mod snapshot;
pub mod style;
pub mod summary;

pub use detector::{
    ChangeDetector, CycleOutcome, DetectorStatus, PollGate, PollState, PollingConfig,
    RequestToken, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS,
};
pub use display::{DisplaySlot, ShowOutcome, REPEAT_DEBOUNCE_SECS};
pub use error::{Error, FetchError, FetchResult, Result};
pub use ingest::{apply_poll_entry, ingest_bulk, IngestReport};
pub use monitor::EnergyMonitor;
pub use payload::{BulkEntry, PhaseValues, PollEntry, SkipReason};
pub use sink::{ChangeNotifier, NullSink, Presenter, Sinks, StyleRenderer};
pub use snapshot::Snapshot;
pub use style::{StyleRule, StyleRules, DEFAULT_STYLE_COLOR};
pub use summary::{bulk_display_text, poll_display_text};
