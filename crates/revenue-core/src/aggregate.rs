//! Charge bucketing for revenue charts
//!
//! Merges charges from several connected accounts into time-ordered
//! [`DataPoint`]s, one value per series.

use crate::{CurrencyFormatter, DataPoint, MoneyFormatter, SeriesConfig, SeriesValue};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Bucket size for aggregated revenue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "day")]
    #[default]
    Day,
    #[serde(rename = "month")]
    Month,
}

impl Granularity {
    /// Start of the bucket containing `date`
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Start of the bucket after `start`
    pub fn next_bucket(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Day => start.succ_opt(),
            Self::Month => {
                let (year, month) = if start.month() == 12 {
                    (start.year() + 1, 1)
                } else {
                    (start.year(), start.month() + 1)
                };
                NaiveDate::from_ymd_opt(year, month, 1)
            }
        }
    }

    /// Axis label for a bucket
    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            Self::Day => start.format("%b %d").to_string(),
            Self::Month => start.format("%b %Y").to_string(),
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Day, Self::Month]
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Month => write!(f, "month"),
        }
    }
}

/// A settled charge on one connected account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    pub connection_id: String,
    /// Amount in the currency's minor unit (cents for USD)
    pub amount_minor: i64,
    pub created: DateTime<Utc>,
}

impl Charge {
    pub fn new(connection_id: impl Into<String>, amount_minor: i64, created: DateTime<Utc>) -> Self {
        Self {
            connection_id: connection_id.into(),
            amount_minor,
            created,
        }
    }

    /// Amount in major units for the given currency
    pub fn amount(&self, currency: &CurrencyFormatter) -> f64 {
        self.amount_minor as f64 / 10f64.powi(currency.decimals() as i32)
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Bucket charges into chart points.
///
/// Series ids are connection ids. Buckets run from the earliest to the latest
/// matching charge with gaps filled by zero; charges on connections without a
/// series are ignored.
pub fn aggregate_charges(
    charges: &[Charge],
    series: &[SeriesConfig],
    granularity: Granularity,
    currency: &CurrencyFormatter,
) -> Vec<DataPoint> {
    let index: HashMap<&str, usize> = series
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.as_str(), i))
        .collect();

    let mut buckets: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for charge in charges {
        let Some(&slot) = index.get(charge.connection_id.as_str()) else {
            continue;
        };
        let start = granularity.bucket_start(charge.created.date_naive());
        let sums = buckets
            .entry(start)
            .or_insert_with(|| vec![0.0; series.len()]);
        sums[slot] += charge.amount(currency);
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    let mut points = Vec::new();
    let mut cursor = Some(first);
    while let Some(start) = cursor {
        if start > last {
            break;
        }
        let values = match buckets.get(&start) {
            Some(sums) => sums
                .iter()
                .map(|&v| SeriesValue::with_display(v, currency.format(v)))
                .collect(),
            None => (0..series.len())
                .map(|_| SeriesValue::with_display(0.0, currency.format(0.0)))
                .collect(),
        };
        points.push(DataPoint::new(granularity.label(start), values));
        cursor = granularity.next_bucket(start);
    }

    points
}
