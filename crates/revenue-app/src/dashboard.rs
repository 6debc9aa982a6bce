//! Main dashboard layout

use leptos::prelude::*;
use revenue_charts::{ChartVariant, RevenueChart, RevenueChartConfig};
use revenue_core::{aggregate_charges, CurrencyFormatter, DataPoint, Granularity};

use crate::demo::{demo_charges, demo_series, report_data};

#[component]
pub fn Dashboard() -> impl IntoView {
    let granularity = RwSignal::new(Granularity::Day);
    let charges = StoredValue::new(demo_charges());
    let series = demo_series();

    let overview_series = Signal::stored(series.clone());
    let overview_data = Memo::new(move |_| {
        let g = granularity.get();
        let points = charges.with_value(|c| aggregate_charges(c, &series, g, &CurrencyFormatter::default()));
        tracing::debug!("Aggregated {} {} buckets", points.len(), g);
        points
    });

    let report = report_data();
    let report_config = Signal::stored(ChartVariant::Report { currency: "GBP".into() }.config());

    // Last thirty days of the first account only
    let compact_series = Signal::stored(demo_series().into_iter().take(1).collect::<Vec<_>>());
    let compact_data = Memo::new(move |_| {
        let points = overview_data.get();
        let start = points.len().saturating_sub(30);
        points[start..]
            .iter()
            .map(|p| DataPoint::new(p.label.clone(), p.values.iter().take(1).cloned().collect()))
            .collect::<Vec<_>>()
    });

    view! {
        <div class="dashboard">
            <header class="dash-header">
                <span class="dash-title">"Revenue"</span>
                <GranularityPicker granularity=granularity />
            </header>

            <main class="dash-main">
                <section class="panel chart-container">
                    <div class="panel-header">
                        <span class="panel-title">"All connections"</span>
                    </div>
                    <div class="panel-content">
                        <RevenueChart
                            data=overview_data
                            series=overview_series
                            config=Signal::stored(RevenueChartConfig::overview())
                        />
                    </div>
                </section>

                <section class="panel chart-container">
                    <div class="panel-header">
                        <span class="panel-title">"Regional report"</span>
                    </div>
                    <div class="panel-content">
                        <RevenueChart
                            data=Signal::stored(report.data)
                            series=Signal::stored(report.series)
                            config=report_config
                        />
                    </div>
                </section>

                <section class="panel compact-container">
                    <div class="panel-header">
                        <span class="panel-title">"Web Store, last 30"</span>
                    </div>
                    <div class="panel-content">
                        <RevenueChart
                            data=compact_data
                            series=compact_series
                            config=Signal::stored(ChartVariant::Compact.config())
                        />
                    </div>
                </section>
            </main>
        </div>
    }
}

#[component]
fn GranularityPicker(granularity: RwSignal<Granularity>) -> impl IntoView {
    view! {
        <div class="granularity-picker">
            {Granularity::all()
                .iter()
                .map(|&g| {
                    view! {
                        <button
                            class=move || if granularity.get() == g { "gp-btn active" } else { "gp-btn" }
                            on:click=move |_| granularity.set(g)
                        >
                            {g.to_string()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
