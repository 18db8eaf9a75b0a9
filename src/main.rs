mod app;
mod data;
mod outlier;
mod state;
mod ui;

use app::OutlierLensApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional: a file to open at start-up.
    let initial_file = std::env::args_os().nth(1).map(std::path::PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Outlier Lens – Detection & Cleaning",
        options,
        Box::new(|_cc| Ok(Box::new(OutlierLensApp::with_file(initial_file)))),
    )
}
