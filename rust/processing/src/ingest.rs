// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Writing decoded payloads into the building cache.

use gml_energy_core::{compound_key, BuildingCache, BuildingRecord, Rgba};
use gml_energy_geometry::parse_coordinates;
use serde::Serialize;

use crate::error::Result;
use crate::payload::{bulk_entries, BulkEntry, PollEntry};
use crate::summary::{bulk_display_text, poll_display_text};

/// Counts from one bulk ingest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub ingested: usize,
    pub skipped: usize,
    pub compound_entries: usize,
}

/// Replace the cache contents with a bulk payload.
///
/// The payload is parsed before the cache is touched, so a body that is not
/// a JSON array leaves the previous contents in place. Individual entries
/// that cannot be decoded are skipped and logged.
pub fn ingest_bulk(cache: &mut BuildingCache, body: &str) -> Result<IngestReport> {
    let entries = bulk_entries(body)?;
    cache.clear();

    let mut report = IngestReport::default();
    for (index, value) in entries.iter().enumerate() {
        let entry = match BulkEntry::decode(value) {
            Ok(entry) => entry,
            Err(reason) => {
                tracing::warn!(index, %reason, "Skipping bulk entry");
                report.skipped += 1;
                continue;
            }
        };

        let text = bulk_display_text(entry.id, &entry.before, &entry.after);
        let mut record = BuildingRecord::new(entry.id, text, entry.color());
        if let Some(gml_id) = entry.gml_id {
            record = record.with_alternate_id(gml_id);
        }
        if let Some(coordinates) = entry.coordinates {
            record = record.with_rings(parse_coordinates(coordinates));
        }

        match cache.upsert(record, entry.numeric_id) {
            Ok(()) => report.ingested += 1,
            Err(error) => {
                tracing::warn!(index, id = entry.id, %error, "Skipping bulk entry");
                report.skipped += 1;
            }
        }
    }

    report.compound_entries = cache.stats().compound_entries;
    tracing::info!(
        ingested = report.ingested,
        skipped = report.skipped,
        compound_entries = report.compound_entries,
        "Bulk ingest complete"
    );
    Ok(report)
}

/// Apply one changed poll result under `key`.
///
/// Without a numeric ID the bare record is replaced as a whole: new display
/// text, the polled color or else the cached one, and new rings when
/// coordinates arrive. With a numeric ID only the compound entry is
/// replaced. The bare record then takes the new text and color only when it
/// is missing or was first stored from that same geometry; its rings are
/// left alone. Geometry is never dropped when coordinates are omitted.
pub fn apply_poll_entry(cache: &mut BuildingCache, key: &str, entry: &PollEntry<'_>) -> Result<()> {
    let text = poll_display_text(entry);
    let rings = entry.coordinates.map(parse_coordinates);

    let Some(numeric_id) = entry.numeric_id else {
        let mut record = updated_record(cache.get(key), key, text, entry);
        if let Some(rings) = rings {
            record = record.with_rings(rings);
        }
        cache.upsert(record, None)?;
        return Ok(());
    };

    let compound = compound_key(key, numeric_id);
    let existing = cache.get(&compound).or_else(|| cache.get(key));
    let mut record = updated_record(existing, key, text, entry);
    if let Some(rings) = rings {
        record = record.with_rings(rings);
    }

    if cache.bare_source(key) == Some(numeric_id) {
        if let Some(bare) = cache.get(key) {
            let bare = bare
                .clone()
                .with_display_text(record.display_text())
                .with_color(record.color());
            cache.upsert(bare, None)?;
        }
    }
    // Also creates the bare entry when the building is new.
    cache.upsert(record, Some(numeric_id))?;
    Ok(())
}

fn updated_record(
    existing: Option<&BuildingRecord>,
    key: &str,
    text: String,
    entry: &PollEntry<'_>,
) -> BuildingRecord {
    let color = entry
        .color
        .or_else(|| existing.map(BuildingRecord::color))
        .unwrap_or(Rgba::FALLBACK);
    match existing {
        Some(record) => record.clone().with_display_text(text).with_color(color),
        None => BuildingRecord::new(key, text, color)
            .with_alternate_id(entry.alternate_id.unwrap_or_default()),
    }
}
