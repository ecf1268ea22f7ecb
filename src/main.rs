use std::path::PathBuf;

use eframe::egui;
use opdash::app::DashboardApp;
use opdash::config::DashboardConfig;
use opdash::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let mut config = DashboardConfig::discover().unwrap_or_else(|e| {
        log::error!("Ignoring unreadable config: {e}");
        DashboardConfig::default()
    });
    // A path on the command line wins over the configured dataset.
    if let Some(path) = std::env::args_os().nth(1) {
        config.dataset_path = Some(PathBuf::from(path));
    }

    let state = AppState::from_config(&config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Philip Morris – Análisis de Operadores",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
}
