mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod metrics;
mod state;
mod ui;
mod view;

use app::ClinicDashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_default();
    log::info!("Dataset: {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([config.window.min_width, config.window.min_height]),
        ..Default::default()
    };

    eframe::run_native(
        ui::dashboard::TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(ClinicDashboardApp::new(&config)))),
    )
}
