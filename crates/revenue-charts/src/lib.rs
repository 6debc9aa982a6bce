//! # revenue-charts
//!
//! D3.js-style SVG revenue charting built with Leptos.
//! Turns multi-series revenue points into an interactive area/line chart
//! with a progressive-reveal hover highlight and a clamped tooltip.
//!
//! ## Modules
//!
//! - `chartkit` - Core primitives: scales, nice bounds, paths
//! - `normalize` - Data to pixel-space normalization
//! - `reveal` - Hover / withdraw state machine and frame scheduling seam
//! - `tooltip` - Tooltip placement
//! - `frame` - `requestAnimationFrame` scheduler
//! - `revenue` - The `RevenueChart` component and its config

pub mod chartkit;
pub mod frame;
pub mod normalize;
pub mod reveal;
pub mod revenue;
pub mod tooltip;

pub use chartkit::*;
pub use frame::*;
pub use normalize::*;
pub use reveal::*;
pub use revenue::*;
pub use tooltip::*;

// Re-export colors from revenue-core for convenience
pub use revenue_core::colors;

/// Width reserved for Y-axis labels
pub const Y_AXIS_WIDTH: f64 = 60.0;
/// Height reserved for X-axis labels
pub const X_AXIS_HEIGHT: f64 = 28.0;

pub const PADDING_TOP: f64 = 20.0;
pub const PADDING_RIGHT: f64 = 20.0;
pub const PADDING_BOTTOM: f64 = 10.0;

/// Chart margin configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// Plot padding plus room for whichever axes are visible
    pub const fn for_axes(show_x_axis: bool, show_y_axis: bool) -> Self {
        let left = if show_y_axis { Y_AXIS_WIDTH } else { 0.0 };
        let bottom = if show_x_axis {
            PADDING_BOTTOM + X_AXIS_HEIGHT
        } else {
            PADDING_BOTTOM
        };
        Self::new(PADDING_TOP, PADDING_RIGHT, bottom, left)
    }
}

impl Default for ChartMargin {
    fn default() -> Self {
        Self::for_axes(false, false)
    }
}

/// Chart dimensions with margin handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: ChartMargin::default(),
        }
    }

    pub fn with_margin(mut self, margin: ChartMargin) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_axes(self, show_x_axis: bool, show_y_axis: bool) -> Self {
        self.with_margin(ChartMargin::for_axes(show_x_axis, show_y_axis))
    }

    /// Inner width (excluding margins)
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Inner height (excluding margins)
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// Left edge of the plot
    pub fn plot_left(&self) -> f64 {
        self.margin.left
    }

    pub fn plot_right(&self) -> f64 {
        self.margin.left + self.inner_width()
    }

    pub fn plot_top(&self) -> f64 {
        self.margin.top
    }

    pub fn plot_bottom(&self) -> f64 {
        self.margin.top + self.inner_height()
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self::new(800.0, 300.0)
    }
}
