//! Tooltip placement for the hovered point

use crate::{
    colors,
    normalize::{NormalizedChart, TOTAL_SERIES_NAME},
};

pub const TOOLTIP_WIDTH: f64 = 180.0;
pub const TOOLTIP_MARGIN: f64 = 8.0;
pub const TOOLTIP_HEADER_HEIGHT: f64 = 28.0;
pub const TOOLTIP_ROW_PITCH: f64 = 20.0;
pub const TOOLTIP_FOOTER_PADDING: f64 = 10.0;
/// Points higher than this (screen px from the top) get their tooltip below
pub const TOOLTIP_FLIP_THRESHOLD: f64 = 60.0;
/// Gap between the point and the tooltip box
pub const TOOLTIP_OFFSET: f64 = 14.0;
const CARET_HALF: f64 = 6.0;

/// One line in the tooltip
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRow {
    pub name: String,
    pub color: String,
    pub display_value: String,
    pub is_total: bool,
    /// Vertical center of the row
    pub y: f64,
}

/// Which way the connector runs from the point to the box.
///
/// The caret on the box always points back at the point, so it is the
/// opposite of the connector direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorDirection {
    /// Box sits below the point; caret points up from its top edge
    Down,
    /// Box sits above the point; caret points down from its bottom edge
    Up,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipLayout {
    pub header: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub show_below: bool,
    pub connector: ConnectorDirection,
    /// Point the connector starts from
    pub anchor: (f64, f64),
    pub rows: Vec<TooltipRow>,
}

impl TooltipLayout {
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Y of the box edge facing the anchor
    pub fn edge_y(&self) -> f64 {
        if self.show_below {
            self.top
        } else {
            self.top + self.height
        }
    }

    /// Separator above the total row, if there is one
    pub fn separator_y(&self) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.is_total)
            .map(|r| r.y - TOOLTIP_ROW_PITCH / 2.0)
    }

    /// Tip of the caret, just outside the edge facing the anchor
    pub fn caret_tip(&self) -> (f64, f64) {
        let x = self
            .anchor
            .0
            .min(self.left + self.width - CARET_HALF * 2.0)
            .max(self.left + CARET_HALF * 2.0);
        let edge = self.edge_y();
        let y = match self.connector {
            ConnectorDirection::Down => edge - CARET_HALF,
            ConnectorDirection::Up => edge + CARET_HALF,
        };
        (x, y)
    }

    /// Small caret on the box edge pointing at the anchor
    pub fn caret_path(&self) -> String {
        let (x, tip) = self.caret_tip();
        let edge = self.edge_y();
        crate::chartkit::PathBuilder::new()
            .move_to(x - CARET_HALF, edge)
            .line_to(x, tip)
            .line_to(x + CARET_HALF, edge)
            .close()
            .build()
    }
}

/// Box height for `rows` lines
pub fn tooltip_height(rows: usize) -> f64 {
    TOOLTIP_HEADER_HEIGHT + rows as f64 * TOOLTIP_ROW_PITCH + TOOLTIP_FOOTER_PADDING
}

/// Keep a box of `width` centered near `x` inside `0..chart_width`.
///
/// When the chart is narrower than the box the left bound wins.
pub fn clamp_center(x: f64, width: f64, chart_width: f64) -> f64 {
    let half = width / 2.0;
    x.min(chart_width - half - TOOLTIP_MARGIN)
        .max(half + TOOLTIP_MARGIN)
}

/// Lay out the tooltip for the point at `index`
pub fn layout_tooltip(chart: &NormalizedChart, index: usize) -> Option<TooltipLayout> {
    let point = chart.points.get(index)?;
    let avg_y = chart.average_series_y(index)?;

    let mut entries: Vec<(String, String, String, bool)> = chart
        .series
        .iter()
        .filter_map(|s| {
            point
                .get(&s.id)
                .map(|p| (s.name.clone(), s.color.clone(), p.display_value.clone(), false))
        })
        .collect();

    if chart.has_total {
        if let Some(total) = point.total() {
            entries.push((
                TOTAL_SERIES_NAME.to_string(),
                colors::TOTAL.to_string(),
                total.display_value.clone(),
                true,
            ));
        }
    }

    let width = TOOLTIP_WIDTH;
    let height = tooltip_height(entries.len());
    let show_below = avg_y < TOOLTIP_FLIP_THRESHOLD;

    let center = clamp_center(point.x, width, chart.dims.width);
    let left = center - width / 2.0;
    let top = if show_below {
        avg_y + TOOLTIP_OFFSET
    } else {
        avg_y - TOOLTIP_OFFSET - height
    };

    let rows = entries
        .into_iter()
        .enumerate()
        .map(|(i, (name, color, display_value, is_total))| TooltipRow {
            name,
            color,
            display_value,
            is_total,
            y: top + TOOLTIP_HEADER_HEIGHT + (i as f64 + 0.5) * TOOLTIP_ROW_PITCH,
        })
        .collect();

    Some(TooltipLayout {
        header: point.label.clone(),
        left,
        top,
        width,
        height,
        show_below,
        connector: if show_below {
            ConnectorDirection::Down
        } else {
            ConnectorDirection::Up
        },
        anchor: (point.x, avg_y),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalize::normalize, ChartDimensions};
    use revenue_core::{CurrencyFormatter, DataPoint, SeriesConfig};

    fn chart(values: &[[f64; 2]], width: f64, height: f64) -> NormalizedChart {
        let series = vec![
            SeriesConfig::new("a", "Store A", "#6366f1"),
            SeriesConfig::new("b", "Store B", "#22c55e"),
        ];
        let data: Vec<DataPoint> = values
            .iter()
            .enumerate()
            .map(|(i, v)| DataPoint::from_values(format!("P{}", i), v))
            .collect();
        normalize(
            &data,
            &series,
            &ChartDimensions::new(width, height),
            4,
            &CurrencyFormatter::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_left_edge_clamped() {
        let c = chart(&[[10.0, 20.0], [30.0, 40.0], [5.0, 5.0]], 600.0, 300.0);
        assert_eq!(c.points[0].x, 0.0);

        let t = layout_tooltip(&c, 0).unwrap();
        assert!(t.left >= 0.0);
        assert!(t.center_x() >= TOOLTIP_WIDTH / 2.0 + TOOLTIP_MARGIN);
    }

    #[test]
    fn test_right_edge_clamped() {
        let c = chart(&[[10.0, 20.0], [30.0, 40.0], [5.0, 5.0]], 600.0, 300.0);
        let t = layout_tooltip(&c, 2).unwrap();
        assert!(t.left + t.width <= 600.0 - TOOLTIP_MARGIN + 1e-9);
    }

    #[test]
    fn test_narrow_chart_keeps_left_edge_visible() {
        assert_eq!(clamp_center(0.0, 180.0, 100.0), 90.0 + TOOLTIP_MARGIN);
    }

    #[test]
    fn test_rows_include_total_last() {
        let c = chart(&[[10.0, 20.0], [30.0, 40.0]], 600.0, 300.0);
        let t = layout_tooltip(&c, 1).unwrap();

        assert_eq!(t.rows.len(), 3);
        assert_eq!(t.rows[0].name, "Store A");
        assert_eq!(t.rows[0].display_value, "$30.00");
        assert!(t.rows[2].is_total);
        assert_eq!(t.rows[2].display_value, "$70.00");
        assert_eq!(t.height, tooltip_height(3));
        let separator = t.separator_y().unwrap();
        assert!((separator - (t.top + TOOLTIP_HEADER_HEIGHT + 2.0 * TOOLTIP_ROW_PITCH)).abs() < 1e-9);
        assert_eq!(t.header, "P1");
    }

    #[test]
    fn test_flips_below_near_top() {
        // Short chart: both series at half of a 70px plot sit at y=55
        let c = chart(&[[0.0, 0.0], [100.0, 100.0]], 600.0, 100.0);
        let high = layout_tooltip(&c, 1).unwrap();
        assert!(high.show_below);
        assert_eq!(high.connector, ConnectorDirection::Down);
        assert!(high.top > high.anchor.1);

        let low = layout_tooltip(&c, 0).unwrap();
        assert!(!low.show_below);
        assert_eq!(low.connector, ConnectorDirection::Up);
        assert!(low.top + low.height < low.anchor.1);
    }

    #[test]
    fn test_caret_sits_on_facing_edge() {
        let c = chart(&[[0.0, 0.0], [100.0, 100.0]], 600.0, 300.0);
        let t = layout_tooltip(&c, 0).unwrap();
        assert!(t.caret_path().ends_with('Z'));
        assert_eq!(t.edge_y(), t.top + t.height);
    }

    #[test]
    fn test_caret_points_toward_anchor() {
        let c = chart(&[[0.0, 0.0], [100.0, 100.0]], 600.0, 100.0);

        let below = layout_tooltip(&c, 1).unwrap();
        assert_eq!(below.connector, ConnectorDirection::Down);
        let (_, tip) = below.caret_tip();
        assert!(tip < below.top);
        assert!(tip > below.anchor.1);

        let above = layout_tooltip(&c, 0).unwrap();
        assert_eq!(above.connector, ConnectorDirection::Up);
        let (_, tip) = above.caret_tip();
        assert!(tip > above.top + above.height);
        assert!(tip < above.anchor.1);
    }
}
