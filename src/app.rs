use eframe::egui;

use crate::state::AppState;
use crate::ui::{self, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct OutlierLensApp {
    pub state: AppState,
}

impl OutlierLensApp {
    /// Start with `path` already loaded, if given.
    pub fn with_file(path: Option<std::path::PathBuf>) -> Self {
        let mut app = Self::default();
        if let Some(path) = path {
            app.state.load_path(&path);
        }
        app
    }
}

impl eframe::App for OutlierLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: cleaning controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: preview and results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::central_panel(ui, &self.state);
        });
    }
}
