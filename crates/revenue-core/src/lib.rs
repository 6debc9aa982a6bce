//! # revenue-core
//!
//! Core domain types for the Revenue Dashboard charts.
//! Implements Strategy pattern for currency formatting.

pub mod aggregate;
pub mod error;

pub use aggregate::*;
pub use error::*;

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// STRATEGY PATTERN: Formatters
// ============================================================================

/// Strategy trait for money formatting
pub trait MoneyFormatter: Send + Sync {
    /// Full precision label (tooltips)
    fn format(&self, amount: f64) -> String;

    /// Short label with K/M/B suffixes (axis ticks)
    fn format_compact(&self, amount: f64) -> String;
}

/// Currency formatter keyed by ISO 4217 code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormatter {
    code: String,
}

impl CurrencyFormatter {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into().to_ascii_uppercase(),
        }
    }

    /// Display prefix for the currency
    pub fn symbol(&self) -> String {
        match self.code.as_str() {
            "USD" => "$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            "JPY" | "CNY" => "¥".to_string(),
            "INR" => "₹".to_string(),
            "CAD" => "CA$".to_string(),
            "AUD" => "A$".to_string(),
            other => format!("{} ", other),
        }
    }

    /// Minor unit digits shown in full labels
    pub fn decimals(&self) -> usize {
        match self.code.as_str() {
            "JPY" | "KRW" => 0,
            _ => 2,
        }
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl MoneyFormatter for CurrencyFormatter {
    fn format(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let fixed = format!("{:.prec$}", amount.abs(), prec = self.decimals());

        let (whole, frac) = match fixed.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (fixed.as_str(), None),
        };

        let whole = whole
            .parse::<u64>()
            .map(|n| n.to_formatted_string(&Locale::en))
            .unwrap_or_else(|_| whole.to_string());

        let mut out = format!("{}{}{}", sign, self.symbol(), whole);
        if let Some(frac) = frac {
            out.push('.');
            out.push_str(frac);
        }
        out
    }

    fn format_compact(&self, amount: f64) -> String {
        let abs = amount.abs();
        let sign = if amount < 0.0 { "-" } else { "" };
        let symbol = self.symbol();

        let mut unit = COMPACT_UNITS
            .iter()
            .rposition(|&(div, _)| abs >= div)
            .unwrap_or(0);
        // Rounding can carry into the next unit (999_960 -> 1000K)
        while unit + 1 < COMPACT_UNITS.len()
            && round_to(abs / COMPACT_UNITS[unit].0, if unit == 0 { 2 } else { 1 }) >= 1_000.0
        {
            unit += 1;
        }
        let (div, suffix) = COMPACT_UNITS[unit];
        let scaled = abs / div;

        let digits = if suffix.is_empty() && scaled.fract() != 0.0 {
            format!("{:.2}", scaled)
        } else {
            trim_zero_fraction(format!("{:.1}", scaled))
        };

        format!("{}{}{}{}", sign, symbol, digits, suffix)
    }
}

const COMPACT_UNITS: [(f64, &str); 4] = [
    (1.0, ""),
    (1_000.0, "K"),
    (1_000_000.0, "M"),
    (1_000_000_000.0, "B"),
];

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10.0_f64.powi(places);
    (value * factor).round() / factor
}

fn trim_zero_fraction(s: String) -> String {
    match s.strip_suffix(".0") {
        Some(trimmed) => trimmed.to_string(),
        None => s,
    }
}

// ============================================================================
// CORE VALUE TYPES
// ============================================================================

/// One line on the chart (typically one connected account)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub id: String,
    pub name: String,
    /// Hex color, e.g. `#6366f1`
    pub color: String,
}

impl SeriesConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }

    /// `#rgb` or `#rrggbb`
    pub fn has_hex_color(&self) -> bool {
        is_hex_color(&self.color)
    }
}

pub fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// A single series value at one data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesValue {
    pub value: f64,
    /// Preformatted label; the chart formats `value` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

impl SeriesValue {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            display_value: None,
        }
    }

    pub fn with_display(value: f64, display: impl Into<String>) -> Self {
        Self {
            value,
            display_value: Some(display.into()),
        }
    }
}

/// Time-ordered chart input: one label, one value per configured series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub values: Vec<SeriesValue>,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, values: Vec<SeriesValue>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    /// Convenience constructor from raw numbers
    pub fn from_values(label: impl Into<String>, values: &[f64]) -> Self {
        Self::new(label, values.iter().copied().map(SeriesValue::new).collect())
    }

    /// Copy of this point with an empty label (used for padding)
    pub fn unlabeled(&self) -> Self {
        Self {
            label: String::new(),
            values: self.values.clone(),
        }
    }
}

/// Full chart payload as handed over by a host page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub series: Vec<SeriesConfig>,
    pub data: Vec<DataPoint>,
}

impl ChartData {
    pub fn from_json(json: &str) -> Result<Self, ChartDataError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty() || self.data.is_empty()
    }
}

/// Check series configuration at the component boundary
pub fn validate_series(series: &[SeriesConfig]) -> Result<(), ChartConfigError> {
    let mut seen = HashSet::new();
    for s in series {
        if !seen.insert(s.id.as_str()) {
            return Err(ChartConfigError::DuplicateSeriesId(s.id.clone()));
        }
        if !s.has_hex_color() {
            return Err(ChartConfigError::InvalidColor {
                id: s.id.clone(),
                color: s.color.clone(),
            });
        }
    }
    Ok(())
}

/// Repair series configuration, returning every problem found.
///
/// Later duplicates of an id are dropped and non-hex colors are replaced with
/// [`colors::NEUTRAL`].
pub fn sanitize_series(series: &[SeriesConfig]) -> (Vec<SeriesConfig>, Vec<ChartConfigError>) {
    let mut seen = HashSet::new();
    let mut problems = Vec::new();
    let mut clean = Vec::with_capacity(series.len());

    for s in series {
        if !seen.insert(s.id.clone()) {
            problems.push(ChartConfigError::DuplicateSeriesId(s.id.clone()));
            continue;
        }
        let mut s = s.clone();
        if !s.has_hex_color() {
            problems.push(ChartConfigError::InvalidColor {
                id: s.id.clone(),
                color: s.color.clone(),
            });
            s.color = colors::NEUTRAL.to_string();
        }
        clean.push(s);
    }

    (clean, problems)
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    pub const BG_DEFAULT: &str = "#111827";
    pub const BG_TOOLTIP: &str = "#1f2937";
    pub const BORDER: &str = "#374151";
    pub const GRID: &str = "#1f2937";
    pub const TEXT_PRIMARY: &str = "#f9fafb";
    pub const TEXT_MUTED: &str = "#9ca3af";
    pub const NEUTRAL: &str = "#6b7280";
    /// Synthetic total line
    pub const TOTAL: &str = "#fbbf24";

    /// Default palette for connected accounts
    pub const PALETTE: [&str; 6] = [
        "#6366f1", "#22c55e", "#06b6d4", "#f43f5e", "#a855f7", "#f97316",
    ];

    pub fn palette(index: usize) -> &'static str {
        PALETTE[index % PALETTE.len()]
    }

    /// `#rrggbb` (or `#rgb`) to `rgba(r, g, b, a)`; unknown input falls back to neutral gray
    pub fn hex_alpha(hex: &str, alpha: f64) -> String {
        let (r, g, b) = parse_hex(hex).unwrap_or((107, 114, 128));
        format!("rgba({}, {}, {}, {:.2})", r, g, b, alpha)
    }

    fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.strip_prefix('#')?;
        match hex.len() {
            6 => Some((
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            )),
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
                Some((digit(0)?, digit(1)?, digit(2)?))
            }
            _ => None,
        }
    }
}
