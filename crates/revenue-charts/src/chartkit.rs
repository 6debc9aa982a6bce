//! # chartkit
//!
//! Core chart primitives: scales, nice axis bounds, path builders.
//! Implements Strategy pattern for scale and path generation.

use std::fmt::Write;

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for scales (maps domain values to range values)
pub trait Scale: Send + Sync {
    /// Scale a value from domain to range
    fn scale(&self, value: f64) -> f64;

    /// Inverse scale (range to domain)
    fn invert(&self, value: f64) -> f64;
}

// ============================================================================
// LINEAR SCALE
// ============================================================================

/// Linear scale (D3-style continuous scale).
///
/// A zero-width domain is treated as width 1 so flat data never divides by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    fn span(&self) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 { 1.0 } else { span }
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let (r_min, r_max) = self.range;
        let normalized = (value - self.domain.0) / self.span();
        r_min + normalized * (r_max - r_min)
    }

    fn invert(&self, value: f64) -> f64 {
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return self.domain.0;
        }

        let normalized = (value - r_min) / (r_max - r_min);
        self.domain.0 + normalized * self.span()
    }
}

// ============================================================================
// NICE AXIS BOUNDS
// ============================================================================

/// Upper bound on generated ticks
pub const MAX_TICKS: usize = 64;

/// Human-friendly axis bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NiceBounds {
    pub min: f64,
    pub max: f64,
    pub tick_interval: f64,
}

impl NiceBounds {
    /// Round `min..max` out to a 1/2/5×10ⁿ grid that always includes zero.
    ///
    /// Flat data (`min == max`) yields `0..max`, `max..0` when negative, or
    /// `0..100` for all-zero data.
    pub fn compute(min: f64, max: f64, desired_ticks: usize) -> Self {
        let count = desired_ticks.max(1) as f64;

        if min == max {
            let low = max.min(0.0);
            let high = if max > 0.0 {
                max
            } else if max == 0.0 {
                100.0
            } else {
                0.0
            };
            return Self {
                min: low,
                max: high,
                tick_interval: (high - low) / count,
            };
        }

        let interval = nice_step((max - min) / count);
        let nice_min = ((min / interval).floor() * interval).min(0.0);
        let nice_max = (max / interval).ceil() * interval;

        Self {
            min: nice_min,
            max: nice_max,
            tick_interval: interval,
        }
    }

    /// Tick values from `min` to `max` inclusive
    pub fn ticks(&self) -> Vec<f64> {
        if self.tick_interval <= 0.0 || !self.tick_interval.is_finite() {
            return vec![self.min, self.max];
        }

        let mut ticks = Vec::new();
        let mut i = 0usize;
        loop {
            let tick = self.min + self.tick_interval * i as f64;
            if tick > self.max + self.tick_interval * 1e-9 || ticks.len() >= MAX_TICKS {
                break;
            }
            // Snap float drift such as 0.30000000000000004
            ticks.push((tick / self.tick_interval).round() * self.tick_interval);
            i += 1;
        }
        ticks
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Snap a rough step to 1, 2, 5 or 10 × its power of ten (ties round up)
pub fn nice_step(rough: f64) -> f64 {
    let magnitude = 10.0_f64.powf(rough.log10().floor());
    let residual = rough / magnitude;

    if residual <= 1.0 {
        magnitude
    } else if residual <= 2.0 {
        2.0 * magnitude
    } else if residual <= 5.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    }
}

// ============================================================================
// STRATEGY PATTERN: Path Generator Trait
// ============================================================================

/// Strategy trait for path generation
pub trait PathGenerator: Send + Sync {
    fn generate(&self, points: &[(f64, f64)]) -> String;
}

/// Straight-segment line path generator
#[derive(Debug, Clone, Default)]
pub struct LinePath;

impl PathGenerator for LinePath {
    fn generate(&self, points: &[(f64, f64)]) -> String {
        let Some((&(x, y), rest)) = points.split_first() else {
            return String::new();
        };

        let mut builder = PathBuilder::new().move_to(x, y);
        for &(x, y) in rest {
            builder = builder.line_to(x, y);
        }
        builder.build()
    }
}

/// Closed area down to a baseline
#[derive(Debug, Clone)]
pub struct AreaPath {
    pub baseline_y: f64,
}

impl PathGenerator for AreaPath {
    fn generate(&self, points: &[(f64, f64)]) -> String {
        let (Some(&(first_x, first_y)), Some(&(last_x, _))) = (points.first(), points.last()) else {
            return String::new();
        };

        let mut builder = PathBuilder::new()
            .move_to(first_x, self.baseline_y)
            .line_to(first_x, first_y);

        for &(x, y) in &points[1..] {
            builder = builder.line_to(x, y);
        }

        builder.line_to(last_x, self.baseline_y).close().build()
    }
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: String::with_capacity(256),
        }
    }

    // Writing into a String cannot fail.
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "M{:.2},{:.2}", x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "L{:.2},{:.2}", x, y);
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push('Z');
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

/// Generate closed area path with baseline
pub fn area_path(points: &[(f64, f64)], baseline_y: f64) -> String {
    AreaPath { baseline_y }.generate(points)
}

/// Generate line path (non-closed)
pub fn line_path(points: &[(f64, f64)]) -> String {
    LinePath.generate(points)
}

/// Linear interpolation between two points
pub fn lerp_point(a: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

// ============================================================================
// TESTS
// ============================================================================
