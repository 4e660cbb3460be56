mod app;
mod color;
mod config;
mod data;
mod error;
mod selection;
mod state;
mod ui;
mod view;

use anyhow::Result;
use app::ListingLensApp;
use clap::Parser;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    let config = Config::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    log::info!("listing-lens v{} starting", env!("CARGO_PKG_VERSION"));

    // Without data there is nothing to explore: a load failure ends startup.
    let state = AppState::from_config(&config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Listing Lens",
        options,
        Box::new(|_cc| Ok(Box::new(ListingLensApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))?;
    Ok(())
}
