use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Dataset;
use crate::outlier::ColumnReport;

const ROW_HEIGHT: f32 = 18.0;

/// Format a statistic the way a `describe()` table prints it.
pub fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        format!("{v:.6}")
    }
}

/// First `max_rows` rows of `dataset` as a grid.
pub fn preview_table(ui: &mut Ui, id: &str, dataset: &Dataset, max_rows: usize) {
    let head = dataset.head(max_rows);
    let columns = head.columns();

    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .columns(TableColumn::auto().at_least(60.0), columns.len())
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    for col in columns {
                        header.col(|ui| {
                            ui.strong(&col.name)
                                .on_hover_text(col.kind.to_string());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, head.n_rows(), |mut row| {
                        let i = row.index();
                        for col in columns {
                            row.col(|ui| {
                                ui.label(col.cells[i].to_string());
                            });
                        }
                    });
                });
        });
    });
}

/// Before/after `describe()` statistics of one column.
pub fn summary_table(ui: &mut Ui, report: &ColumnReport) {
    ui.push_id(("summary", &report.column), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(TableColumn::auto().at_least(50.0))
            .columns(TableColumn::auto().at_least(100.0), 2)
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for title in ["", "original", "cleaned"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                let rows = report.before.rows().into_iter().zip(report.after.rows());
                for ((label, before), (_, after)) in rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(label);
                        });
                        row.col(|ui| {
                            ui.label(format_stat(before));
                        });
                        row.col(|ui| {
                            ui.label(format_stat(after));
                        });
                    });
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_formatting() {
        assert_eq!(format_stat(6.0), "6.0");
        assert_eq!(format_stat(8.5), "8.500000");
        assert_eq!(format_stat(f64::NAN), "NaN");
    }
}
