//! Data to pixel-space normalization
//!
//! Everything here is a pure function of (data, series, dimensions); the chart
//! recomputes it whenever any of those change.

use crate::{
    chartkit::{lerp_point, LinearScale, NiceBounds, Scale},
    ChartDimensions,
};
use revenue_core::{DataPoint, MoneyFormatter, SeriesConfig};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Key of the synthetic sum-of-all-series entry
pub const TOTAL_SERIES_ID: &str = "__total__";

/// Display name of the synthetic total row
pub const TOTAL_SERIES_NAME: &str = "Total";

/// Approximate horizontal room one X-axis label needs
const X_LABEL_SPACING: f64 = 60.0;

/// One series value placed in pixel space
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub display_value: String,
}

impl NormalizedPoint {
    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// All series at one input point
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDataPoint {
    pub label: String,
    pub x: f64,
    pub series: BTreeMap<String, NormalizedPoint>,
}

impl NormalizedDataPoint {
    pub fn get(&self, series_id: &str) -> Option<&NormalizedPoint> {
        self.series.get(series_id)
    }

    pub fn total(&self) -> Option<&NormalizedPoint> {
        self.series.get(TOTAL_SERIES_ID)
    }
}

/// Y-axis tick with its pixel position and label
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub y: f64,
    pub label: String,
}

/// Render-ready chart geometry
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedChart {
    pub dims: ChartDimensions,
    pub bounds: NiceBounds,
    pub series: Vec<SeriesConfig>,
    pub points: Vec<NormalizedDataPoint>,
    pub ticks: Vec<AxisTick>,
    pub has_total: bool,
}

/// Flank a lone point with two unlabeled copies so it draws as a flat line
pub fn pad_single_point(data: &[DataPoint]) -> Cow<'_, [DataPoint]> {
    match data {
        [only] => Cow::Owned(vec![only.unlabeled(), only.clone(), only.unlabeled()]),
        _ => Cow::Borrowed(data),
    }
}

/// Finite value of series `index` at `point`, if present
fn series_value(point: &DataPoint, index: usize) -> Option<f64> {
    point
        .values
        .get(index)
        .map(|v| v.value)
        .filter(|v| v.is_finite())
}

/// Normalize chart input into pixel space.
///
/// Returns `None` when there is nothing to draw (no points or no series).
/// Missing or non-finite values are skipped for that point and series.
pub fn normalize(
    data: &[DataPoint],
    series: &[SeriesConfig],
    dims: &ChartDimensions,
    grid_lines: usize,
    formatter: &dyn MoneyFormatter,
) -> Option<NormalizedChart> {
    if data.is_empty() || series.is_empty() {
        return None;
    }

    let data = pad_single_point(data);
    let has_total = series.len() > 1;

    let totals: Vec<Option<f64>> = data
        .iter()
        .map(|point| {
            if !has_total {
                return None;
            }
            (0..series.len())
                .filter_map(|i| series_value(point, i))
                .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
        })
        .collect();

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let scanned = data
        .iter()
        .flat_map(|point| (0..series.len()).filter_map(move |i| series_value(point, i)))
        .chain(totals.iter().flatten().copied());
    for v in scanned {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        min = 0.0;
        max = 0.0;
    }

    let bounds = NiceBounds::compute(min, max, grid_lines);
    let y_scale = LinearScale::new()
        .domain(bounds.min, bounds.max)
        .range(dims.plot_bottom(), dims.plot_top());

    let steps = (data.len() - 1).max(1) as f64;
    let x_step = dims.inner_width() / steps;

    let points = data
        .iter()
        .zip(&totals)
        .enumerate()
        .map(|(i, (point, total))| {
            let x = dims.plot_left() + i as f64 * x_step;

            let mut placed = BTreeMap::new();
            for (index, config) in series.iter().enumerate() {
                let Some(entry) = point.values.get(index) else {
                    continue;
                };
                if !entry.value.is_finite() {
                    continue;
                }
                let display_value = entry
                    .display_value
                    .clone()
                    .unwrap_or_else(|| formatter.format(entry.value));
                placed.insert(
                    config.id.clone(),
                    NormalizedPoint {
                        x,
                        y: y_scale.scale(entry.value),
                        value: entry.value,
                        display_value,
                    },
                );
            }

            if let Some(total) = *total {
                placed.insert(
                    TOTAL_SERIES_ID.to_string(),
                    NormalizedPoint {
                        x,
                        y: y_scale.scale(total),
                        value: total,
                        display_value: formatter.format(total),
                    },
                );
            }

            NormalizedDataPoint {
                label: point.label.clone(),
                x,
                series: placed,
            }
        })
        .collect();

    let ticks = bounds
        .ticks()
        .into_iter()
        .map(|value| AxisTick {
            value,
            y: y_scale.scale(value),
            label: formatter.format_compact(value),
        })
        .collect();

    Some(NormalizedChart {
        dims: *dims,
        bounds,
        series: series.to_vec(),
        points,
        ticks,
        has_total,
    })
}

impl NormalizedChart {
    /// X position of every point, in order
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    /// Pixel coordinates of one series, skipping points where it is missing
    pub fn series_points(&self, series_id: &str) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.get(series_id).map(NormalizedPoint::xy))
            .collect()
    }

    /// Y of the zero line, clamped into the plot
    pub fn baseline_y(&self) -> f64 {
        let zero = 0.0_f64.clamp(self.bounds.min, self.bounds.max.max(self.bounds.min));
        LinearScale::new()
            .domain(self.bounds.min, self.bounds.max)
            .range(self.dims.plot_bottom(), self.dims.plot_top())
            .scale(zero)
    }

    /// Series coordinates up to a fractional point index.
    ///
    /// Whole points up to `floor(progress)` are included, then one point
    /// interpolated toward the next index by the fractional part.
    pub fn revealed_points(&self, series_id: &str, progress: f64) -> Vec<(f64, f64)> {
        if self.points.is_empty() {
            return Vec::new();
        }

        let progress = progress.clamp(0.0, (self.points.len() - 1) as f64);
        let whole = progress.floor();
        let fraction = progress - whole;
        let whole = whole as usize;

        let mut out: Vec<(f64, f64)> = self.points[..=whole]
            .iter()
            .filter_map(|p| p.get(series_id).map(NormalizedPoint::xy))
            .collect();

        if fraction > 0.0 {
            let from = self.points[whole].get(series_id);
            let to = self.points.get(whole + 1).and_then(|p| p.get(series_id));
            if let (Some(from), Some(to)) = (from, to) {
                out.push(lerp_point(from.xy(), to.xy(), fraction));
            }
        }

        out
    }

    /// X-axis labels thinned to fit the plot width; empty labels are skipped
    pub fn x_labels(&self) -> Vec<(f64, String)> {
        let capacity = (self.dims.inner_width() / X_LABEL_SPACING).floor().max(1.0) as usize;
        let stride = self.points.len().div_ceil(capacity).max(1);

        self.points
            .iter()
            .enumerate()
            .filter(|(i, p)| i % stride == 0 && !p.label.is_empty())
            .map(|(_, p)| (p.x, p.label.clone()))
            .collect()
    }

    /// Average Y of the configured series at a point (total excluded)
    pub fn average_series_y(&self, index: usize) -> Option<f64> {
        let point = self.points.get(index)?;
        let ys: Vec<f64> = self
            .series
            .iter()
            .filter_map(|s| point.get(&s.id).map(|p| p.y))
            .collect();
        if ys.is_empty() {
            None
        } else {
            Some(ys.iter().sum::<f64>() / ys.len() as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revenue_core::{CurrencyFormatter, SeriesValue};

    fn one_series() -> Vec<SeriesConfig> {
        vec![SeriesConfig::new("a", "Store A", "#6366f1")]
    }

    fn two_series() -> Vec<SeriesConfig> {
        vec![
            SeriesConfig::new("a", "Store A", "#6366f1"),
            SeriesConfig::new("b", "Store B", "#22c55e"),
        ]
    }

    fn dims() -> ChartDimensions {
        ChartDimensions::new(420.0, 230.0).with_axes(false, false)
    }

    fn run(data: &[DataPoint], series: &[SeriesConfig]) -> Option<NormalizedChart> {
        normalize(data, series, &dims(), 4, &CurrencyFormatter::default())
    }

    #[test]
    fn test_empty_input_has_nothing_to_draw() {
        assert!(run(&[], &one_series()).is_none());
        assert!(run(&[DataPoint::from_values("Jan", &[1.0])], &[]).is_none());
    }

    #[test]
    fn test_single_point_is_padded() {
        let chart = run(&[DataPoint::from_values("Jan", &[42.0])], &one_series()).unwrap();

        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.points[0].label, "");
        assert_eq!(chart.points[1].label, "Jan");
        assert_eq!(chart.points[2].label, "");
        for p in &chart.points {
            assert_eq!(p.get("a").unwrap().value, 42.0);
        }
        // Flat line
        assert_eq!(chart.points[0].get("a").unwrap().y, chart.points[2].get("a").unwrap().y);
    }

    #[test]
    fn test_x_positions_span_plot() {
        let data: Vec<DataPoint> = (0..5)
            .map(|i| DataPoint::from_values(format!("P{}", i), &[i as f64 * 10.0]))
            .collect();
        let chart = run(&data, &one_series()).unwrap();
        let xs = chart.xs();

        assert_eq!(xs[0], dims().plot_left());
        assert!((xs[4] - dims().plot_right()).abs() < 1e-9);
        assert!(xs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_y_mapping_uses_nice_bounds() {
        let data = vec![
            DataPoint::from_values("Jan", &[0.0]),
            DataPoint::from_values("Feb", &[95.0]),
        ];
        let chart = run(&data, &one_series()).unwrap();
        let d = dims();

        assert_eq!(chart.bounds.max, 100.0);
        assert_eq!(chart.points[0].get("a").unwrap().y, d.plot_bottom());
        let expected = d.plot_top() + d.inner_height() - 0.95 * d.inner_height();
        assert!((chart.points[1].get("a").unwrap().y - expected).abs() < 1e-9);
    }

    #[test]
    fn test_total_series_sums() {
        let data = vec![
            DataPoint::from_values("Jan", &[10.0, 20.0]),
            DataPoint::from_values("Feb", &[10.0, 20.0]),
            DataPoint::from_values("Mar", &[10.0, 20.0]),
        ];
        let chart = run(&data, &two_series()).unwrap();

        assert!(chart.has_total);
        for p in &chart.points {
            let total = p.total().unwrap();
            assert_eq!(total.value, 30.0);
            assert_eq!(total.display_value, "$30.00");
        }
        // Total participates in the axis scan
        assert!(chart.bounds.max >= 30.0);
    }

    #[test]
    fn test_single_series_has_no_total() {
        let data = vec![DataPoint::from_values("Jan", &[1.0]), DataPoint::from_values("Feb", &[2.0])];
        let chart = run(&data, &one_series()).unwrap();
        assert!(!chart.has_total);
        assert!(chart.points.iter().all(|p| p.total().is_none()));
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let data = vec![
            DataPoint::from_values("Jan", &[10.0, 5.0]),
            DataPoint::from_values("Feb", &[12.0]),
            DataPoint::new("Mar", vec![SeriesValue::new(f64::NAN), SeriesValue::new(7.0)]),
        ];
        let chart = run(&data, &two_series()).unwrap();

        assert!(chart.points[1].get("b").is_none());
        assert_eq!(chart.points[1].total().unwrap().value, 12.0);
        assert!(chart.points[2].get("a").is_none());
        assert_eq!(chart.series_points("b").len(), 2);
    }

    #[test]
    fn test_display_value_precomputed_or_formatted() {
        let data = vec![
            DataPoint::new("Jan", vec![SeriesValue::with_display(1234.0, "1.2k USD")]),
            DataPoint::new("Feb", vec![SeriesValue::new(1234.5)]),
        ];
        let chart = run(&data, &one_series()).unwrap();

        assert_eq!(chart.points[0].get("a").unwrap().display_value, "1.2k USD");
        assert_eq!(chart.points[1].get("a").unwrap().display_value, "$1,234.50");
    }

    #[test]
    fn test_ticks_cover_bounds() {
        let data = vec![DataPoint::from_values("Jan", &[0.0]), DataPoint::from_values("Feb", &[95.0])];
        let chart = run(&data, &one_series()).unwrap();

        let values: Vec<f64> = chart.ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![0.0, 50.0, 100.0]);
        assert_eq!(chart.ticks[2].label, "$100");
        assert_eq!(chart.ticks[2].y, dims().plot_top());
    }

    #[test]
    fn test_revealed_points_fractional() {
        let data: Vec<DataPoint> = [0.0, 10.0, 20.0, 30.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| DataPoint::from_values(format!("P{}", i), &[v]))
            .collect();
        let chart = run(&data, &one_series()).unwrap();
        let all = chart.series_points("a");

        let half = chart.revealed_points("a", 1.5);
        assert_eq!(half.len(), 3);
        assert_eq!(half[..2], all[..2]);
        let mid = lerp_point(all[1], all[2], 0.5);
        assert!((half[2].0 - mid.0).abs() < 1e-9);
        assert!((half[2].1 - mid.1).abs() < 1e-9);

        assert_eq!(chart.revealed_points("a", 0.0), vec![all[0]]);
        assert_eq!(chart.revealed_points("a", 3.0), all);
        assert_eq!(chart.revealed_points("a", 99.0), all);
    }

    #[test]
    fn test_x_labels_thin_and_skip_padding() {
        let padded = run(&[DataPoint::from_values("Jan", &[1.0])], &one_series()).unwrap();
        let labels: Vec<String> = padded.x_labels().into_iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["Jan".to_string()]);

        let many: Vec<DataPoint> = (0..30)
            .map(|i| DataPoint::from_values(format!("D{}", i), &[i as f64]))
            .collect();
        let chart = run(&many, &one_series()).unwrap();
        let capacity = (dims().inner_width() / X_LABEL_SPACING).floor() as usize;
        assert!(chart.x_labels().len() <= capacity);
        assert_eq!(chart.x_labels()[0].1, "D0");
    }

    #[test]
    fn test_baseline_is_zero_line() {
        let data = vec![DataPoint::from_values("Jan", &[-50.0]), DataPoint::from_values("Feb", &[50.0])];
        let chart = run(&data, &one_series()).unwrap();
        let d = dims();
        let expected = d.plot_bottom() - (0.0 - chart.bounds.min) / chart.bounds.span() * d.inner_height();
        assert!((chart.baseline_y() - expected).abs() < 1e-9);
    }
}
