//! Revenue Dashboard - WASM entry point

mod dashboard;
mod demo;

use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    tracing::info!("Starting Revenue Dashboard");

    mount_to_body(dashboard::Dashboard);
}
