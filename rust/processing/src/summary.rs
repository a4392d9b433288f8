// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Human-readable energy summaries shown by the UI presenter.

use std::fmt::Write;

use crate::payload::{PhaseValues, PollEntry};

const NO_DATA: &str = "No data";

/// Summary for a building from the bulk payload.
///
/// Values are truncated to integers before formatting. CO2 arrives in kg and
/// is shown in tonnes.
pub fn bulk_display_text(id: &str, before: &PhaseValues, after: &PhaseValues) -> String {
    let co2 = |v: Option<f64>| {
        v.map(|kg| format!("{:.3}", truncate(kg) as f64 / 1000.0))
            .unwrap_or_else(|| NO_DATA.to_string())
    };
    let whole = |v: Option<f64>| {
        v.map(|n| truncate(n).to_string())
            .unwrap_or_else(|| NO_DATA.to_string())
    };

    let mut text = String::with_capacity(256);
    let _ = write!(
        text,
        "Building ID: {id}\n\n\
         CO2 [t CO2/a]\n\
         Before Renovation: {}\n\
         After Renovation: {}\n\n\
         Energy Demand Specific [kWh/m\u{b2}a]\n\
         Before Renovation: {}\n\
         After Renovation: {}\n\n\
         Energy Demand [kWh/a]\n\
         Before Renovation: {}\n\
         After Renovation: {}",
        co2(before.co2_from_energy_demand),
        co2(after.co2_from_energy_demand),
        whole(before.energy_demand_specific),
        whole(after.energy_demand_specific),
        whole(before.energy_demand),
        whole(after.energy_demand),
    );
    text
}

/// Summary for a building updated by an incremental poll. Absent fields are omitted.
pub fn poll_display_text(entry: &PollEntry<'_>) -> String {
    let mut text = String::from("Real-time Energy Data\n");
    let lines = [
        ("Energy Consumption", entry.energy_consumption),
        ("Electricity Consumption", entry.electricity_consumption),
        ("Heating Consumption", entry.heating_consumption),
    ];
    for (label, value) in lines {
        if let Some(value) = value {
            let _ = writeln!(text, "{label}: {value:.2} kWh");
        }
    }
    text
}

#[inline]
fn truncate(v: f64) -> i64 {
    v.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bulk_text_layout() {
        let before = PhaseValues {
            energy_demand: Some(45210.9),
            energy_demand_specific: Some(182.6),
            co2_from_energy_demand: Some(12345.0),
        };
        let after = PhaseValues {
            energy_demand_specific: Some(75.0),
            ..PhaseValues::default()
        };

        let text = bulk_display_text("DEBW_001", &before, &after);
        let expected = "Building ID: DEBW_001\n\n\
                        CO2 [t CO2/a]\n\
                        Before Renovation: 12.345\n\
                        After Renovation: No data\n\n\
                        Energy Demand Specific [kWh/m\u{b2}a]\n\
                        Before Renovation: 182\n\
                        After Renovation: 75\n\n\
                        Energy Demand [kWh/a]\n\
                        Before Renovation: 45210\n\
                        After Renovation: No data";
        assert_eq!(text, expected);
    }

    #[test]
    fn co2_is_truncated_before_conversion() {
        let phase = PhaseValues {
            co2_from_energy_demand: Some(999.9),
            ..PhaseValues::default()
        };
        let text = bulk_display_text("A", &phase, &phase);
        assert!(text.contains("Before Renovation: 0.999\n"));
    }

    #[test]
    fn poll_text_lists_present_fields() {
        let value = json!({"gml_id": "A_1", "energy_consumption": 12.346, "heating_consumption": 2});
        let entry = PollEntry::decode(&value).unwrap();
        assert_eq!(
            poll_display_text(&entry),
            "Real-time Energy Data\nEnergy Consumption: 12.35 kWh\nHeating Consumption: 2.00 kWh\n"
        );
    }
}
