//! Methane Dashboard - satellite methane results viewer
//!
//! Browses per-region results workbooks, converts column-average methane to
//! tonnes per grid cell and shows district/state maps with monthly trends.

mod charts;
mod config;
mod dashboard;
mod data;
mod gui;
mod stats;

#[cfg(test)]
mod testutil;

use anyhow::Context;
use config::DashboardConfig;
use eframe::egui;
use gui::MethaneApp;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::load().context("Failed to load dashboard config")?;

    // RUST_LOG wins over the configured filter
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    fmt().with_env_filter(filter).with_target(true).init();

    info!(
        results_dir = %config.results_dir.display(),
        first_month = %config.first_month,
        last_month = %config.last_month,
        "Starting methane dashboard"
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1200.0, 700.0])
            .with_title("Methane Emission Calculation"),
        ..Default::default()
    };

    eframe::run_native(
        "Methane Emission Calculation",
        options,
        Box::new(|cc| Ok(Box::new(MethaneApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run dashboard: {e}"))
}
