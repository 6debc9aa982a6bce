//! Revenue area/line chart component
//!
//! Multi-series revenue over time with a dashed total line, a glowing
//! highlight that follows the pointer and eases back on leave, and a tooltip
//! listing every series at the hovered point.

use crate::{
    chartkit::{area_path, line_path},
    colors,
    frame::AnimationFrameScheduler,
    normalize::{normalize, TOTAL_SERIES_ID},
    reveal::{nearest_index, RevealDriver, ViewportMapping},
    tooltip::{layout_tooltip, TooltipLayout},
    ChartDimensions, X_AXIS_HEIGHT,
};
use leptos::{ev::MouseEvent, html, prelude::*};
use revenue_core::{sanitize_series, ChartConfigError, CurrencyFormatter, DataPoint, SeriesConfig};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{ResizeObserver, ResizeObserverEntry};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Largest accepted grid line count; keeps the tick list under
/// [`MAX_TICKS`](crate::chartkit::MAX_TICKS)
pub const MAX_GRID_LINES: usize = 32;

/// Revenue chart configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevenueChartConfig {
    pub background_color: String,
    pub show_grid: bool,
    /// Desired number of Y-axis intervals
    pub grid_lines: usize,
    pub animated: bool,
    /// ISO 4217 code used for axis and fallback tooltip labels
    pub currency: String,
    pub show_x_axis: bool,
    pub show_y_axis: bool,
}

impl Default for RevenueChartConfig {
    fn default() -> Self {
        Self {
            background_color: colors::BG_DEFAULT.to_string(),
            show_grid: true,
            grid_lines: 4,
            animated: true,
            currency: "USD".to_string(),
            show_x_axis: false,
            show_y_axis: false,
        }
    }
}

impl RevenueChartConfig {
    /// Dashboard overview card: both axes
    pub fn overview() -> Self {
        Self {
            show_x_axis: true,
            show_y_axis: true,
            ..Default::default()
        }
    }

    /// Report page: both axes, denser grid, report currency
    pub fn report(currency: impl Into<String>) -> Self {
        Self {
            grid_lines: 5,
            currency: currency.into(),
            show_x_axis: true,
            show_y_axis: true,
            ..Default::default()
        }
    }

    /// Small inline card: no grid, no axes
    pub fn compact() -> Self {
        Self {
            show_grid: false,
            grid_lines: 3,
            ..Default::default()
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_axes(mut self, show_x_axis: bool, show_y_axis: bool) -> Self {
        self.show_x_axis = show_x_axis;
        self.show_y_axis = show_y_axis;
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    pub fn validate(&self) -> Result<(), ChartConfigError> {
        if self.grid_lines == 0 {
            return Err(ChartConfigError::ZeroGridLines);
        }
        if self.grid_lines > MAX_GRID_LINES {
            return Err(ChartConfigError::TooManyGridLines {
                requested: self.grid_lines,
                max: MAX_GRID_LINES,
            });
        }
        Ok(())
    }

    /// Repair invalid settings, logging each fix
    pub fn sanitized(mut self) -> Self {
        if let Err(e) = self.validate() {
            let repaired = self.grid_lines.clamp(1, MAX_GRID_LINES);
            tracing::warn!("revenue chart config: {}; using {} grid lines", e, repaired);
            self.grid_lines = repaired;
        }
        self
    }

    pub fn formatter(&self) -> CurrencyFormatter {
        CurrencyFormatter::new(self.currency.clone())
    }
}

/// Chart presets per caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartVariant {
    Overview,
    Report { currency: String },
    Compact,
    Custom(RevenueChartConfig),
}

impl ChartVariant {
    pub fn config(&self) -> RevenueChartConfig {
        match self {
            Self::Overview => RevenueChartConfig::overview(),
            Self::Report { currency } => RevenueChartConfig::report(currency.clone()),
            Self::Compact => RevenueChartConfig::compact(),
            Self::Custom(config) => config.clone().sanitized(),
        }
    }
}

impl From<ChartVariant> for RevenueChartConfig {
    fn from(variant: ChartVariant) -> Self {
        variant.config()
    }
}

// ============================================================================
// CONTAINER SIZE
// ============================================================================

/// Track the content size of `target` with a `ResizeObserver`
fn use_container_size(target: NodeRef<html::Div>) -> ReadSignal<(f64, f64)> {
    let (size, set_size) = signal((0.0_f64, 0.0_f64));
    let observer = StoredValue::new_local(None::<(ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)>);

    Effect::new(move |_| {
        let Some(el) = target.get() else {
            return;
        };

        let rect = el.get_bounding_client_rect();
        set_size.set((rect.width(), rect.height()));

        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            for entry in entries.iter() {
                let rect = entry.unchecked_into::<ResizeObserverEntry>().content_rect();
                let next = (rect.width(), rect.height());
                if size.get_untracked() != next {
                    tracing::debug!("revenue chart resized to {}x{}", next.0, next.1);
                    set_size.set(next);
                }
            }
        });

        match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(obs) => {
                obs.observe(&el);
                observer.update_value(|slot| {
                    if let Some((old, _)) = slot.take() {
                        old.disconnect();
                    }
                    *slot = Some((obs, callback));
                });
            }
            Err(e) => tracing::warn!("ResizeObserver unavailable: {:?}", e),
        }
    });

    on_cleanup(move || {
        observer.update_value(|slot| {
            if let Some((obs, _)) = slot.take() {
                obs.disconnect();
            }
        });
    });

    size
}

// ============================================================================
// COMPONENT
// ============================================================================

static NEXT_CHART_ID: AtomicUsize = AtomicUsize::new(0);

/// Interactive multi-series revenue chart
#[component]
pub fn RevenueChart(
    #[prop(into)] data: Signal<Vec<DataPoint>>,
    #[prop(into)] series: Signal<Vec<SeriesConfig>>,
    #[prop(optional)] config: Option<Signal<RevenueChartConfig>>,
) -> impl IntoView {
    let config = config.unwrap_or_else(|| Signal::derive(RevenueChartConfig::default));
    let config = Memo::new(move |_| config.get().sanitized());

    let chart_id = NEXT_CHART_ID.fetch_add(1, Ordering::Relaxed);
    let glow_id = format!("revenue-glow-{}", chart_id);
    let fill_id = move |i: usize| format!("revenue-fill-{}-{}", chart_id, i);

    let clean_series = Memo::new(move |_| {
        let (clean, problems) = sanitize_series(&series.get());
        for problem in &problems {
            tracing::warn!("revenue chart series: {}", problem);
        }
        clean
    });

    let container = NodeRef::<html::Div>::new();
    let size = use_container_size(container);

    let chart = Memo::new(move |_| {
        let cfg = config.get();
        let (width, height) = size.get();
        let dims = ChartDimensions::new(width, height).with_axes(cfg.show_x_axis, cfg.show_y_axis);
        let formatter = cfg.formatter();
        let series = clean_series.get();

        let normalized = data.with(|points| normalize(points, &series, &dims, cfg.grid_lines, &formatter));
        tracing::debug!(
            "revenue chart #{} normalized {} points at {}x{}",
            chart_id,
            normalized.as_ref().map_or(0, |c| c.points.len()),
            width,
            height
        );
        normalized
    });

    // Hover state is owned by this instance only
    let progress = RwSignal::new(0.0_f64);
    let hovered = RwSignal::new(None::<usize>);
    let driver = StoredValue::new_local(None::<RevealDriver<AnimationFrameScheduler>>);

    let scheduler = AnimationFrameScheduler::new(move |now| {
        let next = driver
            .try_update_value(|slot| {
                slot.as_mut().map(|d| {
                    d.on_frame(now);
                    d.progress()
                })
            })
            .flatten();
        if let Some(p) = next {
            progress.set(p);
        }
    });
    match scheduler {
        Some(s) => driver.set_value(Some(RevealDriver::new(s, config.get_untracked().animated))),
        None => tracing::warn!("no browser window, hover animation disabled"),
    }

    let on_move = move |ev: MouseEvent| {
        let Some(target) = ev
            .current_target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        else {
            return;
        };
        let rect = target.get_bounding_client_rect();
        let (view_width, view_height) = size.get_untracked();
        let mapping = ViewportMapping {
            rect_left: rect.left(),
            rect_width: rect.width(),
            rect_height: rect.height(),
            view_width,
            view_height,
        };
        let x = mapping.to_chart_x(ev.client_x() as f64);

        let Some(index) = chart.with_untracked(|c| c.as_ref().and_then(|c| nearest_index(&c.xs(), x)))
        else {
            return;
        };

        let snapped = driver
            .try_update_value(|slot| {
                slot.as_mut().map(|d| {
                    d.pointer_move(index);
                    d.progress()
                })
            })
            .flatten()
            .unwrap_or(index as f64);

        if hovered.get_untracked() != Some(index) {
            hovered.set(Some(index));
        }
        if progress.get_untracked() != snapped {
            progress.set(snapped);
        }
    };

    let on_leave = move |_: MouseEvent| {
        let animated = config.with_untracked(|c| c.animated);
        let remaining = driver
            .try_update_value(|slot| {
                slot.as_mut().map(|d| {
                    d.set_animated(animated);
                    d.pointer_leave();
                    d.progress()
                })
            })
            .flatten()
            .unwrap_or(0.0);

        hovered.set(None);
        progress.set(remaining);
    };

    // Glowing highlight drawn up to the fractional progress
    let highlight = move || {
        let p = progress.get();
        if hovered.get().is_none() && p <= 0.0 {
            return None;
        }
        let glow_url = format!("url(#revenue-glow-{})", chart_id);
        chart.with(|c| {
            c.as_ref().map(|c| {
                let baseline = c.baseline_y();
                c.series
                    .iter()
                    .map(|s| {
                        let pts = c.revealed_points(&s.id, p);
                        let line = line_path(&pts);
                        view! {
                            <g class="revenue-highlight">
                                <path
                                    d=area_path(&pts, baseline)
                                    fill=colors::hex_alpha(&s.color, 0.25)
                                    stroke="none"
                                />
                                <path
                                    d=line.clone()
                                    fill="none"
                                    stroke=s.color.clone()
                                    stroke-width="6"
                                    stroke-opacity="0.6"
                                    filter=glow_url.clone()
                                />
                                <path
                                    d=line
                                    fill="none"
                                    stroke=s.color.clone()
                                    stroke-width="2.5"
                                    stroke-linecap="round"
                                    stroke-linejoin="round"
                                />
                            </g>
                        }
                    })
                    .collect_view()
            })
        })
    };

    // Guide line, point markers and tooltip
    let hover_layer = move || {
        let index = hovered.get()?;
        chart.with(|c| {
            let c = c.as_ref()?;
            let point = c.points.get(index)?;
            let layout = layout_tooltip(c, index)?;

            let markers = c
                .series
                .iter()
                .filter_map(|s| {
                    point.get(&s.id).map(|p| {
                        view! {
                            <circle
                                cx=p.x
                                cy=p.y
                                r="4"
                                fill=s.color.clone()
                                stroke=colors::TEXT_PRIMARY
                                stroke-width="1.5"
                            />
                        }
                    })
                })
                .collect_view();

            Some(view! {
                <g class="revenue-hover" pointer-events="none">
                    <line
                        x1=point.x
                        y1=c.dims.plot_top()
                        x2=point.x
                        y2=c.dims.plot_bottom()
                        stroke=colors::BORDER
                        stroke-width="1"
                        stroke-dasharray="3,3"
                    />
                    {markers}
                    <TooltipBox layout=layout />
                </g>
            })
        })
    };

    view! {
        <div
            node_ref=container
            class="revenue-chart"
            style=move || {
                format!(
                    "position: relative; width: 100%; height: 100%; border-radius: 8px; background: {};",
                    config.with(|c| c.background_color.clone()),
                )
            }
        >
            {move || {
                let cfg = config.get();
                match chart.get() {
                    None => view! {
                        <div
                            class="revenue-chart-empty"
                            style="display: flex; align-items: center; justify-content: center; width: 100%; height: 100%;"
                        >
                            <span style=format!("color: {}; font-size: 13px;", colors::TEXT_MUTED)>
                                "No data available"
                            </span>
                        </div>
                    }
                    .into_any(),
                    Some(c) => {
                        let dims = c.dims;
                        let baseline = c.baseline_y();

                        let gradients = c
                            .series
                            .iter()
                            .enumerate()
                            .map(|(i, s)| {
                                view! {
                                    <linearGradient id=fill_id(i) x1="0" y1="0" x2="0" y2="1">
                                        <stop offset="0%" stop-color=s.color.clone() stop-opacity="0.3" />
                                        <stop offset="100%" stop-color=s.color.clone() stop-opacity="0" />
                                    </linearGradient>
                                }
                            })
                            .collect_view();

                        let grid = cfg.show_grid.then(|| {
                            c.ticks
                                .iter()
                                .map(|t| {
                                    view! {
                                        <line
                                            x1=dims.plot_left()
                                            y1=t.y
                                            x2=dims.plot_right()
                                            y2=t.y
                                            stroke=colors::GRID
                                            stroke-width="1"
                                            stroke-dasharray="2,2"
                                        />
                                    }
                                })
                                .collect_view()
                        });

                        let y_axis = cfg.show_y_axis.then(|| {
                            c.ticks
                                .iter()
                                .map(|t| {
                                    view! {
                                        <text
                                            x=dims.plot_left() - 8.0
                                            y=t.y
                                            dy="0.32em"
                                            text-anchor="end"
                                            fill=colors::TEXT_MUTED
                                            font-size="10"
                                            font-family="JetBrains Mono, monospace"
                                        >
                                            {t.label.clone()}
                                        </text>
                                    }
                                })
                                .collect_view()
                        });

                        let x_axis = cfg.show_x_axis.then(|| {
                            let y = dims.height - X_AXIS_HEIGHT / 2.0;
                            c.x_labels()
                                .into_iter()
                                .map(|(x, label)| {
                                    view! {
                                        <text
                                            x=x
                                            y=y
                                            dy="0.32em"
                                            text-anchor="middle"
                                            fill=colors::TEXT_MUTED
                                            font-size="10"
                                        >
                                            {label}
                                        </text>
                                    }
                                })
                                .collect_view()
                        });

                        let series_layers = c
                            .series
                            .iter()
                            .enumerate()
                            .map(|(i, s)| {
                                let pts = c.series_points(&s.id);
                                view! {
                                    <g class="revenue-series">
                                        <path
                                            d=area_path(&pts, baseline)
                                            fill=format!("url(#{})", fill_id(i))
                                            stroke="none"
                                        />
                                        <path
                                            d=line_path(&pts)
                                            fill="none"
                                            stroke=s.color.clone()
                                            stroke-width="1.5"
                                            stroke-opacity="0.7"
                                            stroke-linecap="round"
                                            stroke-linejoin="round"
                                        />
                                    </g>
                                }
                            })
                            .collect_view();

                        // Total sits above the individual series
                        let total_line = c.has_total.then(|| {
                            view! {
                                <path
                                    class="revenue-total"
                                    d=line_path(&c.series_points(TOTAL_SERIES_ID))
                                    fill="none"
                                    stroke=colors::TOTAL
                                    stroke-width="1.5"
                                    stroke-dasharray="6,4"
                                />
                            }
                        });

                        view! {
                            <svg
                                class="revenue-chart-svg"
                                viewBox=dims.viewbox()
                                preserveAspectRatio="xMidYMid meet"
                                style="display: block; width: 100%; height: 100%;"
                                on:mousemove=on_move
                                on:mouseleave=on_leave
                            >
                                <defs>
                                    {gradients}
                                    <filter id=glow_id.clone() x="-20%" y="-20%" width="140%" height="140%">
                                        <feGaussianBlur stdDeviation="3" />
                                    </filter>
                                </defs>

                                {grid}
                                {y_axis}
                                {x_axis}
                                {series_layers}
                                {total_line}
                                {highlight}
                                {hover_layer}
                            </svg>
                        }
                        .into_any()
                    }
                }
            }}
        </div>
    }
}

/// Floating label box for the hovered point
#[component]
fn TooltipBox(layout: TooltipLayout) -> impl IntoView {
    let edge = layout.edge_y();
    let separator = layout.separator_y();
    let caret = layout.caret_path();
    let TooltipLayout {
        header,
        left,
        top,
        width,
        height,
        anchor: (anchor_x, anchor_y),
        rows,
        ..
    } = layout;

    let rows = rows
        .into_iter()
        .map(|row| {
            let weight = if row.is_total { "600" } else { "400" };
            view! {
                <g class="revenue-tooltip-row">
                    <circle cx=left + 14.0 cy=row.y r="4" fill=row.color />
                    <text
                        x=left + 26.0
                        y=row.y
                        dy="0.32em"
                        fill=colors::TEXT_MUTED
                        font-size="11"
                        font-weight=weight
                    >
                        {row.name}
                    </text>
                    <text
                        x=left + width - 12.0
                        y=row.y
                        dy="0.32em"
                        text-anchor="end"
                        fill=colors::TEXT_PRIMARY
                        font-size="11"
                        font-weight=weight
                        font-family="JetBrains Mono, monospace"
                    >
                        {row.display_value}
                    </text>
                </g>
            }
        })
        .collect_view();

    view! {
        <g class="revenue-tooltip">
            <line
                x1=anchor_x
                y1=anchor_y
                x2=anchor_x
                y2=edge
                stroke=colors::BORDER
                stroke-width="1"
            />
            <rect
                x=left
                y=top
                width=width
                height=height
                rx="6"
                fill=colors::BG_TOOLTIP
                stroke=colors::BORDER
                stroke-width="1"
            />
            <path d=caret fill=colors::BG_TOOLTIP stroke=colors::BORDER stroke-width="1" />
            <text
                x=left + 12.0
                y=top + 18.0
                fill=colors::TEXT_PRIMARY
                font-size="12"
                font-weight="600"
            >
                {header}
            </text>
            {separator.map(|y| {
                view! {
                    <line
                        x1=left + 8.0
                        y1=y
                        x2=left + width - 8.0
                        y2=y
                        stroke=colors::BORDER
                        stroke-width="1"
                    />
                }
            })}
            {rows}
        </g>
    }
}
