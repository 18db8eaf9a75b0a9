use serde::Serialize;

use super::stats;

/// Descriptive statistics of one column, in the layout of a `describe()` table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Summary {
    /// Summarise the non-missing values. Empty input gives NaN statistics.
    pub fn of(values: &[f64]) -> Self {
        let sorted = stats::sorted(values);
        Summary {
            count: sorted.len(),
            mean: stats::mean(&sorted),
            std: stats::sample_std_dev(&sorted),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: stats::percentile_sorted(&sorted, 25.0),
            median: stats::percentile_sorted(&sorted, 50.0),
            q75: stats::percentile_sorted(&sorted, 75.0),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }

    /// Labelled rows for display.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}
