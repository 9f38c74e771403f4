mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::TuningPandaApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional file to open at startup.
    let mut state = AppState::default();
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        if let Err(e) = state.load_path(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Tuning Panda – Orientation Tuning Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(TuningPandaApp::new(state)))),
    )
}
