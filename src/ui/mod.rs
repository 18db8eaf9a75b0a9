//! egui rendering. Widgets read from and write to [`crate::state::AppState`];
//! no cleaning logic lives here.

pub mod panels;
pub mod plot;
pub mod table;

use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::outlier::{ColumnOutcome, ColumnReport};
use crate::state::AppState;

const PREVIEW_ROWS: usize = 5;
const CLEANED_ROWS: usize = 100;

// ---------------------------------------------------------------------------
// Central panel – preview and per-column results
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a CSV file to detect outliers  (File → Open…)");
            });
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Data Preview");
            table::preview_table(ui, "preview", dataset, PREVIEW_ROWS);

            let Some(report) = &state.report else {
                return;
            };

            for column in &report.columns {
                ui.separator();
                column_section(ui, column);
            }

            ui.separator();
            ui.heading(format!("Final Cleaned Data: {} rows", report.rows_after));
            table::preview_table(ui, "cleaned", &report.cleaned, CLEANED_ROWS);
        });
}

fn column_section(ui: &mut Ui, report: &ColumnReport) {
    ui.heading(format!("Analyzing Column: {}", report.column));
    match &report.outcome {
        ColumnOutcome::Treated {
            outliers,
            rows_removed,
            bounds,
        } => {
            let mut line = format!("{outliers} outlier(s)");
            if *rows_removed > 0 {
                line.push_str(&format!(", {rows_removed} row(s) removed"));
            }
            if let Some(b) = bounds {
                line.push_str(&format!(
                    ", bounds [{}, {}]",
                    table::format_stat(b.lower),
                    table::format_stat(b.upper)
                ));
            }
            ui.label(line);
        }
        ColumnOutcome::Failed { error } => {
            ui.label(RichText::new(format!("Not treated: {error}")).color(egui::Color32::YELLOW));
        }
    }

    table::summary_table(ui, report);
    plot::distribution_plots(ui, report);
    ui.label("Box Plot Comparison");
    plot::box_plot(ui, report);
}
