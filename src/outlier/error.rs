use serde::Serialize;
use thiserror::Error;

/// Errors raised while classifying a single column.
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
pub enum ClassifyError {
    #[error("percentile range {lower}..{upper} is invalid (need 0 <= lower < upper <= 100)")]
    InvalidPercentileRange { lower: f64, upper: f64 },

    /// Z-scores are undefined when the standard deviation is zero or not finite.
    #[error("standard deviation is {std_dev}, z-scores are undefined")]
    DegenerateDistribution { std_dev: f64 },
}

/// Errors raised while treating a single column.
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
pub enum TreatError {
    #[error("every value is an outlier, no cap values can be derived")]
    EmptySubset,
}

/// Errors that stop a cleaning run before any column is touched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CleanError {
    #[error("the dataset has no numeric columns")]
    NoNumericColumns,

    #[error("no columns selected")]
    NoColumnsSelected,

    #[error("column '{0}' does not exist")]
    UnknownColumn(String),

    #[error("column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("column '{0}' selected more than once")]
    DuplicateColumn(String),

    #[error(transparent)]
    Config(#[from] ClassifyError),
}

/// Why a single column could not be treated. The run continues without it.
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
pub enum ColumnError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Treat(#[from] TreatError),
}
