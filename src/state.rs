use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::model::Dataset;
use crate::data::{export, loader};
use crate::outlier::{
    CleaningConfig, CleaningReport, HandlingMode, MethodConfig, TrimOrder, clean,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Detection method as picked in the UI, before percentiles are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodKind {
    #[default]
    ZScore,
    Iqr,
    Winsorization,
}

impl MethodKind {
    pub const ALL: [MethodKind; 3] = [MethodKind::ZScore, MethodKind::Iqr, MethodKind::Winsorization];

    pub fn label(self) -> &'static str {
        match self {
            MethodKind::ZScore => "Z-Score",
            MethodKind::Iqr => "IQR",
            MethodKind::Winsorization => "Percentile Winsorization",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Where the dataset came from.
    pub source_path: Option<PathBuf>,

    /// Columns to clean, in the order they were selected.
    pub selected_columns: Vec<String>,

    pub method: MethodKind,

    /// Winsorization percentiles, in percent.
    pub lower_pct: f64,
    pub upper_pct: f64,

    pub mode: HandlingMode,

    pub trim_order: TrimOrder,

    /// Result of the last Apply.
    pub report: Option<CleaningReport>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source_path: None,
            selected_columns: Vec::new(),
            method: MethodKind::default(),
            lower_pct: 1.0,
            upper_pct: 99.0,
            mode: HandlingMode::default(),
            trim_order: TrimOrder::default(),
            report: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and select every numeric column.
    pub fn set_dataset(&mut self, dataset: Dataset, path: Option<PathBuf>) {
        self.selected_columns = dataset
            .numeric_columns()
            .into_iter()
            .map(String::from)
            .collect();
        self.status_message = if self.selected_columns.is_empty() {
            Some("No numeric columns found.".to_string())
        } else {
            None
        };
        self.report = None;
        self.dataset = Some(dataset);
        self.source_path = path;
    }

    /// Load a file from disk, replacing the current dataset on success.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.n_rows(),
                    dataset.column_names()
                );
                self.set_dataset(dataset, Some(path.to_path_buf()));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Numeric columns of the loaded dataset, in schema order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(|ds| ds.numeric_columns().into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Add or remove a column from the selection. New columns go last.
    pub fn toggle_column(&mut self, column: &str) {
        if let Some(pos) = self.selected_columns.iter().position(|c| c == column) {
            self.selected_columns.remove(pos);
        } else {
            self.selected_columns.push(column.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.selected_columns = self.numeric_columns();
    }

    pub fn select_none(&mut self) {
        self.selected_columns.clear();
    }

    pub fn method_config(&self) -> MethodConfig {
        match self.method {
            MethodKind::ZScore => MethodConfig::ZScore,
            MethodKind::Iqr => MethodConfig::Iqr,
            MethodKind::Winsorization => MethodConfig::Winsorization {
                lower_pct: self.lower_pct,
                upper_pct: self.upper_pct,
            },
        }
    }

    pub fn cleaning_config(&self) -> CleaningConfig {
        CleaningConfig::new(self.selected_columns.clone(), self.method_config(), self.mode)
            .with_trim_order(self.trim_order)
    }

    /// Run detection and cleaning on the loaded dataset.
    pub fn apply(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        match clean(dataset, &self.cleaning_config()) {
            Ok(report) => {
                let failed: Vec<String> = report
                    .failures()
                    .map(|(col, err)| format!("{col}: {err}"))
                    .collect();
                self.status_message = if failed.is_empty() {
                    None
                } else {
                    Some(format!("Skipped {}", failed.join("; ")))
                };
                self.report = Some(report);
            }
            Err(e) => {
                log::error!("Cleaning failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.report = None;
            }
        }
    }

    /// Write the cleaned dataset of the last run as CSV.
    pub fn save_cleaned(&self, path: &Path) -> Result<()> {
        let report = self.report.as_ref().context("nothing has been cleaned yet")?;
        export::save_csv(&report.cleaned, path)
    }

    /// Write the last run's report as JSON.
    pub fn save_report(&self, path: &Path) -> Result<()> {
        let report = self.report.as_ref().context("nothing has been cleaned yet")?;
        let json = report.to_json().context("serializing report")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column, ColumnKind};

    fn loaded() -> AppState {
        let ds = Dataset::new(vec![
            Column::from_f64("a", &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]),
            Column::new("label", ColumnKind::Text, vec![CellValue::Null; 6]),
            Column::from_f64("b", &[1.0, 2.0, 3.0, 4.0, 9.0, 1000.0]),
        ])
        .unwrap();
        let mut state = AppState::default();
        state.set_dataset(ds, None);
        state
    }

    #[test]
    fn selects_numeric_columns_on_load() {
        let state = loaded();
        assert_eq!(state.selected_columns, vec!["a", "b"]);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn toggling_appends_in_click_order() {
        let mut state = loaded();
        state.toggle_column("a");
        assert_eq!(state.selected_columns, vec!["b"]);
        state.toggle_column("a");
        assert_eq!(state.selected_columns, vec!["b", "a"]);
    }

    #[test]
    fn apply_produces_report() {
        let mut state = loaded();
        state.method = MethodKind::Iqr;
        state.mode = HandlingMode::Trim;
        state.apply();
        let report = state.report.as_ref().unwrap();
        assert_eq!(report.rows_after, 4);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn bad_percentiles_surface_as_status() {
        let mut state = loaded();
        state.method = MethodKind::Winsorization;
        state.lower_pct = 10.0;
        state.upper_pct = 10.0;
        state.apply();
        assert!(state.report.is_none());
        assert!(state.status_message.unwrap().contains("percentile"));
    }

    #[test]
    fn text_only_dataset_warns() {
        let ds = Dataset::new(vec![Column::new(
            "label",
            ColumnKind::Text,
            vec![CellValue::String("x".into())],
        )])
        .unwrap();
        let mut state = AppState::default();
        state.set_dataset(ds, None);
        assert_eq!(state.status_message.as_deref(), Some("No numeric columns found."));
    }

    #[test]
    fn saves_cleaned_csv_and_report() {
        let mut state = loaded();
        let dir = tempfile::tempdir().unwrap();
        assert!(state.save_cleaned(&dir.path().join("early.csv")).is_err());

        state.method = MethodKind::Iqr;
        state.mode = HandlingMode::Cap;
        state.apply();

        let csv_path = dir.path().join("cleaned_data.csv");
        state.save_cleaned(&csv_path).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert!(text.starts_with("a,label,b\n"));
        assert_eq!(text.lines().count(), 7);

        let json_path = dir.path().join("report.json");
        state.save_report(&json_path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["rows_after"], 6);
    }
}
