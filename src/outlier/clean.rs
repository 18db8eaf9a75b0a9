use serde::Serialize;

use super::classify::{Bounds, MethodConfig, classify};
use super::error::{CleanError, ColumnError};
use super::summary::Summary;
use super::treat::{HandlingMode, Treatment, keep_mask, treat};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How trims on several columns combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TrimOrder {
    /// Each column is classified against the rows left by the columns before
    /// it, so selection order changes the result.
    #[default]
    Sequential,
    /// Every column is classified against the input rows and the keep-masks
    /// are intersected, then applied once.
    AgainstOriginal,
}

/// One cleaning run: which columns, how to detect, how to handle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningConfig {
    /// Columns to process, in processing order.
    pub columns: Vec<String>,
    pub method: MethodConfig,
    pub mode: HandlingMode,
    pub trim_order: TrimOrder,
}

impl CleaningConfig {
    pub fn new(columns: Vec<String>, method: MethodConfig, mode: HandlingMode) -> Self {
        CleaningConfig {
            columns,
            method,
            mode,
            trim_order: TrimOrder::default(),
        }
    }

    pub fn with_trim_order(mut self, trim_order: TrimOrder) -> Self {
        self.trim_order = trim_order;
        self
    }

    /// Check the config against `dataset` before anything is processed.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), CleanError> {
        if dataset.numeric_columns().is_empty() {
            return Err(CleanError::NoNumericColumns);
        }
        if self.columns.is_empty() {
            return Err(CleanError::NoColumnsSelected);
        }
        for (i, name) in self.columns.iter().enumerate() {
            let column = dataset
                .column(name)
                .ok_or_else(|| CleanError::UnknownColumn(name.clone()))?;
            if !column.kind.is_numeric() {
                return Err(CleanError::NotNumeric(name.clone()));
            }
            if self.columns[..i].contains(name) {
                return Err(CleanError::DuplicateColumn(name.clone()));
            }
        }
        self.method.validate()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ColumnOutcome {
    Treated {
        outliers: usize,
        rows_removed: usize,
        bounds: Option<Bounds>,
    },
    /// The column was left untouched.
    Failed { error: ColumnError },
}

/// Before/after view of one processed column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub column: String,
    pub outcome: ColumnOutcome,
    /// Summary of the column in the input dataset.
    pub before: Summary,
    /// Summary right after this column was treated.
    pub after: Summary,
    #[serde(skip)]
    pub before_values: Vec<f64>,
    #[serde(skip)]
    pub after_values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningReport {
    pub config: CleaningConfig,
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns: Vec<ColumnReport>,
    #[serde(skip)]
    pub cleaned: Dataset,
}

impl CleaningReport {
    /// Columns that could not be treated, with the reason.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ColumnError)> {
        self.columns.iter().filter_map(|c| match &c.outcome {
            ColumnOutcome::Failed { error } => Some((c.column.as_str(), error)),
            ColumnOutcome::Treated { .. } => None,
        })
    }

    pub fn total_outliers(&self) -> usize {
        self.columns
            .iter()
            .map(|c| match c.outcome {
                ColumnOutcome::Treated { outliers, .. } => outliers,
                ColumnOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    /// JSON rendering of everything but the cleaned rows.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Detect and treat outliers in every configured column of `dataset`.
///
/// Config errors abort before any column is processed. A column that cannot
/// be treated is reported as failed and the remaining columns still run.
pub fn clean(dataset: &Dataset, config: &CleaningConfig) -> Result<CleaningReport, CleanError> {
    config.validate(dataset)?;
    log::info!(
        "cleaning {} column(s) of {} rows: {} / {}",
        config.columns.len(),
        dataset.n_rows(),
        config.method.label(),
        config.mode.label()
    );

    let (cleaned, columns) = match (config.mode, config.trim_order) {
        (HandlingMode::Trim, TrimOrder::AgainstOriginal) => trim_against_original(dataset, config)?,
        _ => sequential(dataset, config)?,
    };

    let report = CleaningReport {
        config: config.clone(),
        rows_before: dataset.n_rows(),
        rows_after: cleaned.n_rows(),
        columns,
        cleaned,
    };
    for (column, error) in report.failures() {
        log::warn!("column '{column}' skipped: {error}");
    }
    log::info!("{} -> {} rows", report.rows_before, report.rows_after);
    Ok(report)
}

fn values_of(dataset: &Dataset, name: &str) -> Result<Vec<f64>, CleanError> {
    dataset
        .numeric_values(name)
        .ok_or_else(|| CleanError::UnknownColumn(name.to_string()))
}

/// Process columns one after another against a shrinking working dataset.
fn sequential(
    dataset: &Dataset,
    config: &CleaningConfig,
) -> Result<(Dataset, Vec<ColumnReport>), CleanError> {
    let mut working = dataset.clone();
    let mut reports = Vec::with_capacity(config.columns.len());

    for name in &config.columns {
        let before_values = values_of(dataset, name)?;
        let current = values_of(&working, name)?;

        let step = classify(&current, &config.method)
            .map_err(ColumnError::from)
            .and_then(|result| {
                let treatment = treat(&current, &result, config.mode)?;
                Ok((result, treatment))
            });

        let outcome = match step {
            Ok((result, Treatment::KeepRows(keep))) => {
                let rows_removed = keep.iter().filter(|&&k| !k).count();
                working = working.retain_rows(&keep);
                log::debug!("'{name}': bounds {:?}", result.bounds);
                ColumnOutcome::Treated {
                    outliers: result.outlier_count(),
                    rows_removed,
                    bounds: result.bounds,
                }
            }
            Ok((result, Treatment::Replace { values, bounds })) => {
                working = working.with_numeric_column(name, &values);
                log::debug!("'{name}': capped to {bounds:?}");
                ColumnOutcome::Treated {
                    outliers: result.outlier_count(),
                    rows_removed: 0,
                    bounds: Some(bounds),
                }
            }
            Err(error) => ColumnOutcome::Failed { error },
        };
        if let ColumnOutcome::Treated { outliers, .. } = outcome {
            log::info!("'{name}': {outliers} outlier(s) handled");
        }

        let after_values = values_of(&working, name)?;
        reports.push(ColumnReport {
            column: name.clone(),
            outcome,
            before: Summary::of(&before_values),
            after: Summary::of(&after_values),
            before_values,
            after_values,
        });
    }

    Ok((working, reports))
}

/// Classify every column on the input rows, then drop the union of outlier rows.
fn trim_against_original(
    dataset: &Dataset,
    config: &CleaningConfig,
) -> Result<(Dataset, Vec<ColumnReport>), CleanError> {
    let mut keep_all = vec![true; dataset.n_rows()];
    let mut outcomes = Vec::with_capacity(config.columns.len());

    for name in &config.columns {
        let values = values_of(dataset, name)?;
        let outcome = match classify(&values, &config.method) {
            Ok(result) => {
                let keep = keep_mask(&result);
                for (all, k) in keep_all.iter_mut().zip(&keep) {
                    *all &= *k;
                }
                log::info!("'{name}': {} outlier(s) flagged", result.outlier_count());
                ColumnOutcome::Treated {
                    outliers: result.outlier_count(),
                    rows_removed: keep.iter().filter(|&&k| !k).count(),
                    bounds: result.bounds,
                }
            }
            Err(error) => ColumnOutcome::Failed {
                error: error.into(),
            },
        };
        outcomes.push((name, values, outcome));
    }

    let cleaned = dataset.retain_rows(&keep_all);
    let reports = outcomes
        .into_iter()
        .map(|(name, before_values, outcome)| -> Result<ColumnReport, CleanError> {
            let after_values = values_of(&cleaned, name)?;
            Ok(ColumnReport {
                column: name.clone(),
                outcome,
                before: Summary::of(&before_values),
                after: Summary::of(&after_values),
                before_values,
                after_values,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((cleaned, reports))
}
