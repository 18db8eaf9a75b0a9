use serde::Serialize;

use super::classify::{Bounds, OutlierResult};
use super::error::TreatError;

/// What to do with the outliers of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HandlingMode {
    /// Drop every row holding an outlier.
    #[default]
    Trim,
    /// Clamp outliers to the nearest bound.
    Cap,
}

impl HandlingMode {
    pub fn label(&self) -> &'static str {
        match self {
            HandlingMode::Trim => "Trimming",
            HandlingMode::Cap => "Capping",
        }
    }
}

/// The effect of treating one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Treatment {
    /// Rows to keep, to be applied to the whole dataset.
    KeepRows(Vec<bool>),
    /// Replacement values for the treated column, with the cap values used.
    Replace { values: Vec<f64>, bounds: Bounds },
}

/// Rows that survive trimming: the negation of the outlier mask.
pub fn keep_mask(result: &OutlierResult) -> Vec<bool> {
    result.mask.iter().map(|&m| !m).collect()
}

/// Cap values for `result`.
///
/// Uses the classifier's bounds when it produced some; otherwise the smallest
/// and largest values that were not flagged.
pub fn cap_bounds(values: &[f64], result: &OutlierResult) -> Result<Bounds, TreatError> {
    if let Some(bounds) = result.bounds {
        return Ok(bounds);
    }
    let mut inliers = values
        .iter()
        .zip(&result.mask)
        .filter(|(v, &m)| !m && !v.is_nan())
        .map(|(&v, _)| v);
    let first = inliers.next().ok_or(TreatError::EmptySubset)?;
    let (lower, upper) = inliers.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Ok(Bounds { lower, upper })
}

/// Replace each outlier by the bound it crossed. Inliers pass through.
pub fn cap(values: &[f64], result: &OutlierResult, bounds: Bounds) -> Vec<f64> {
    values
        .iter()
        .zip(&result.mask)
        .map(|(&x, &outlier)| {
            if !outlier {
                x
            } else if x > bounds.upper {
                bounds.upper
            } else if x < bounds.lower {
                bounds.lower
            } else {
                x
            }
        })
        .collect()
}

/// Apply `mode` to a classified column.
pub fn treat(
    values: &[f64],
    result: &OutlierResult,
    mode: HandlingMode,
) -> Result<Treatment, TreatError> {
    match mode {
        HandlingMode::Trim => Ok(Treatment::KeepRows(keep_mask(result))),
        HandlingMode::Cap => {
            let bounds = cap_bounds(values, result)?;
            Ok(Treatment::Replace {
                values: cap(values, result, bounds),
                bounds,
            })
        }
    }
}
