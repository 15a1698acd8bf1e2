mod app;
mod gui;

use std::path::Path;

use app::CalibrationApp;
use envision_calibration::config::CalibrationConfig;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    log::info!(
        "Starting Envision Calibration v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Optional JSON config as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => CalibrationConfig::from_json_file(Path::new(&path)).unwrap_or_else(|e| {
            log::warn!("{}; using default configuration", e);
            CalibrationConfig::default()
        }),
        None => CalibrationConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Envision — Calibration"),
        ..Default::default()
    };

    eframe::run_native(
        "Envision Calibration",
        options,
        Box::new(move |cc| Ok(Box::new(CalibrationApp::new(cc, config)))),
    )
}
