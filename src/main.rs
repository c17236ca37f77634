mod app;
mod chart;
mod color;
mod config;
mod data;
mod render;
mod state;
mod ui;
mod view;

use anyhow::Context;
use app::HousingApp;
use config::Settings;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::from_env().context("reading settings")?;
    let table = data::pipeline::load_and_prepare(&settings.data_path, &settings.pipeline)
        .context("preparing the listings dataset")?;
    log::info!(
        "{} listings ready from {}",
        table.len(),
        settings.data_path.display()
    );
    let state = AppState::new(table, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Análisis de Precios de Viviendas en la Ciudad de México",
        options,
        Box::new(|_cc| Ok(Box::new(HousingApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
