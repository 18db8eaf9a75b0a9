use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::outlier::{HandlingMode, TrimOrder};
use crate::state::{AppState, MethodKind};

// ---------------------------------------------------------------------------
// Left side panel – cleaning controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Outlier Cleaning");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let columns = state.numeric_columns();
    if columns.is_empty() {
        ui.label(RichText::new("No numeric columns found.").color(Color32::YELLOW));
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Column selection ----
            let header_text = format!(
                "Columns  ({}/{})",
                state.selected_columns.len(),
                columns.len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("columns")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_none();
                        }
                    });
                    for col in &columns {
                        let mut checked = state.selected_columns.contains(col);
                        if ui.checkbox(&mut checked, col.as_str()).changed() {
                            state.toggle_column(col);
                        }
                    }
                });
            ui.separator();

            // ---- Detection method ----
            ui.strong("Outlier Detection Method");
            for kind in MethodKind::ALL {
                ui.radio_value(&mut state.method, kind, kind.label());
            }
            if state.method == MethodKind::Winsorization {
                ui.add(
                    Slider::new(&mut state.lower_pct, 0.0..=10.0)
                        .step_by(0.5)
                        .text("Lower percentile (%)"),
                );
                ui.add(
                    Slider::new(&mut state.upper_pct, 90.0..=100.0)
                        .step_by(0.5)
                        .text("Upper percentile (%)"),
                );
            }
            ui.separator();

            // ---- Handling mode ----
            ui.strong("How to Handle Outliers");
            for mode in [HandlingMode::Trim, HandlingMode::Cap] {
                ui.radio_value(&mut state.mode, mode, mode.label());
            }
            if state.mode == HandlingMode::Trim {
                let mut independent = state.trim_order == TrimOrder::AgainstOriginal;
                if ui
                    .checkbox(&mut independent, "Detect on original rows")
                    .on_hover_text(
                        "Classify every column against the uploaded data and drop all \
                         flagged rows at once, instead of column by column.",
                    )
                    .changed()
                {
                    state.trim_order = if independent {
                        TrimOrder::AgainstOriginal
                    } else {
                        TrimOrder::Sequential
                    };
                }
            }
            ui.separator();

            let can_apply = !state.selected_columns.is_empty();
            if ui
                .add_enabled(can_apply, egui::Button::new("Apply Detection & Cleaning"))
                .clicked()
            {
                state.apply();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_report = state.report.is_some();
            if ui
                .add_enabled(has_report, egui::Button::new("Save cleaned CSV…"))
                .clicked()
            {
                save_csv_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_report, egui::Button::new("Export report JSON…"))
                .clicked()
            {
                save_report_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let name = state
                .source_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!("{name}: {} rows, {} columns", ds.n_rows(), ds.n_columns()));
        }

        if let Some(report) = &state.report {
            ui.separator();
            ui.label(format!("cleaned: {} rows", report.rows_after));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tabular data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

fn save_csv_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save cleaned data")
        .set_file_name("cleaned_data.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.save_cleaned(&path) {
            log::error!("Failed to save CSV: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn save_report_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export cleaning report")
        .set_file_name("cleaning_report.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.save_report(&path) {
            log::error!("Failed to export report: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
