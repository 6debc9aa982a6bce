//! Demo data for development builds

use chrono::{Duration, TimeZone, Utc};
use revenue_core::{colors, ChartData, Charge, SeriesConfig};

/// Days of generated charge history
pub const DEMO_DAYS: i64 = 120;

/// Connected accounts shown on the overview
pub fn demo_series() -> Vec<SeriesConfig> {
    ["Web Store", "Mobile App", "Marketplace"]
        .iter()
        .enumerate()
        .map(|(i, name)| SeriesConfig::new(format!("acct_{}", i + 1), *name, colors::palette(i)))
        .collect()
}

/// Deterministic daily charges for every demo account
pub fn demo_charges() -> Vec<Charge> {
    let Some(start) = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).single() else {
        return Vec::new();
    };
    let bases = [42_000.0, 18_500.0, 9_800.0];

    let mut charges = Vec::with_capacity(bases.len() * DEMO_DAYS as usize);
    for day in 0..DEMO_DAYS {
        let created = start + Duration::days(day);
        for (k, base) in bases.iter().enumerate() {
            let wave = (day as f64 * 0.21 + k as f64 * 1.7).sin() * 0.35;
            let growth = 1.0 + day as f64 * 0.004;
            let amount = base * (1.0 + wave) * growth;
            charges.push(Charge::new(format!("acct_{}", k + 1), amount.round() as i64, created));
        }
    }
    charges
}

/// Quarterly report payload as a host page would embed it
pub const REPORT_JSON: &str = r##"{
    "series": [
        { "id": "emea", "name": "EMEA", "color": "#6366f1" },
        { "id": "apac", "name": "APAC", "color": "#22c55e" }
    ],
    "data": [
        { "label": "Q1 2025", "values": [{ "value": 182000 }, { "value": 96000 }] },
        { "label": "Q2 2025", "values": [{ "value": 201500 }, { "value": 104250, "displayValue": "£104K (est.)" }] },
        { "label": "Q3 2025", "values": [{ "value": 176400 }, { "value": 131900 }] },
        { "label": "Q4 2025", "values": [{ "value": 243800 }, { "value": 158300 }] }
    ]
}"##;

/// Parse [`REPORT_JSON`], falling back to an empty chart
pub fn report_data() -> ChartData {
    ChartData::from_json(REPORT_JSON).unwrap_or_else(|e| {
        tracing::error!("Failed to parse report data: {}", e);
        ChartData::default()
    })
}
