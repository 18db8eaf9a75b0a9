use serde::Serialize;

use super::error::ClassifyError;
use super::stats;

/// Values further than this many standard deviations from the mean are outliers.
pub const Z_THRESHOLD: f64 = 3.0;

/// Tukey fence multiplier applied to the interquartile range.
pub const IQR_MULTIPLIER: f64 = 1.5;

// ---------------------------------------------------------------------------
// Method configuration
// ---------------------------------------------------------------------------

/// How outliers are detected in a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MethodConfig {
    ZScore,
    Iqr,
    Winsorization { lower_pct: f64, upper_pct: f64 },
}

impl MethodConfig {
    /// Reject percentile pairs outside `0 <= lower < upper <= 100`.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        if let MethodConfig::Winsorization {
            lower_pct,
            upper_pct,
        } = *self
        {
            let in_range = |p: f64| (0.0..=100.0).contains(&p);
            if !(in_range(lower_pct) && in_range(upper_pct) && lower_pct < upper_pct) {
                return Err(ClassifyError::InvalidPercentileRange {
                    lower: lower_pct,
                    upper: upper_pct,
                });
            }
        }
        Ok(())
    }

    pub fn label(&self) -> &'static str {
        match self {
            MethodConfig::ZScore => "Z-Score",
            MethodConfig::Iqr => "IQR",
            MethodConfig::Winsorization { .. } => "Percentile Winsorization",
        }
    }
}

// ---------------------------------------------------------------------------
// Classification result
// ---------------------------------------------------------------------------

/// Lower and upper thresholds (or cap values).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlierResult {
    /// `true` marks an outlier; same length as the column.
    pub mask: Vec<bool>,
    /// Thresholds used to build the mask. `None` for Z-score, whose cap
    /// values are derived from the surviving values at treatment time.
    pub bounds: Option<Bounds>,
}

impl OutlierResult {
    pub fn outlier_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    fn outside(values: &[f64], bounds: Bounds) -> Self {
        let mask = values
            .iter()
            .map(|&x| x < bounds.lower || x > bounds.upper)
            .collect();
        OutlierResult {
            mask,
            bounds: Some(bounds),
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Flag the outliers of `values` under `config`.
///
/// Pure: the same values and config always give the same result. Missing
/// values are never flagged.
pub fn classify(values: &[f64], config: &MethodConfig) -> Result<OutlierResult, ClassifyError> {
    config.validate()?;
    match *config {
        MethodConfig::ZScore => zscore(values),
        MethodConfig::Iqr => Ok(OutlierResult::outside(values, iqr_bounds(values))),
        MethodConfig::Winsorization {
            lower_pct,
            upper_pct,
        } => {
            let (lower, upper) = stats::percentile_bounds(values, lower_pct, upper_pct);
            Ok(OutlierResult::outside(values, Bounds { lower, upper }))
        }
    }
}

fn zscore(values: &[f64]) -> Result<OutlierResult, ClassifyError> {
    let mean = stats::mean(values);
    let std_dev = stats::std_dev(values);
    if std_dev == 0.0 || !std_dev.is_finite() {
        return Err(ClassifyError::DegenerateDistribution { std_dev });
    }
    let mask = values
        .iter()
        .map(|&x| ((x - mean) / std_dev).abs() > Z_THRESHOLD)
        .collect();
    Ok(OutlierResult { mask, bounds: None })
}

/// Tukey fences: `Q1 - 1.5 IQR` and `Q3 + 1.5 IQR`.
pub fn iqr_bounds(values: &[f64]) -> Bounds {
    let (q1, q3) = stats::quartiles(values);
    let iqr = q3 - q1;
    Bounds {
        lower: q1 - IQR_MULTIPLIER * iqr,
        upper: q3 + IQR_MULTIPLIER * iqr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const SCENARIO: [f64; 12] = [
        10.0, 12.0, 12.0, 13.0, 12.0, 11.0, 14.0, 13.0, 15.0, 102.0, 12.0, 14.0,
    ];

    #[test]
    fn iqr_flags_the_far_value() {
        let result = classify(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], &MethodConfig::Iqr).unwrap();
        let bounds = result.bounds.unwrap();
        assert_relative_eq!(bounds.lower, -1.5);
        assert_relative_eq!(bounds.upper, 8.5);
        assert_eq!(result.mask, vec![false, false, false, false, false, true]);
    }

    #[test]
    fn zscore_flags_single_spike() {
        let result = classify(&SCENARIO, &MethodConfig::ZScore).unwrap();
        assert_eq!(result.outlier_count(), 1);
        assert!(result.mask[9]);
        assert!(result.bounds.is_none());

        let z = (102.0 - stats::mean(&SCENARIO)) / stats::std_dev(&SCENARIO);
        assert!(z > Z_THRESHOLD);
    }

    #[test]
    fn zscore_zero_variance_is_degenerate() {
        let err = classify(&[5.0; 5], &MethodConfig::ZScore).unwrap_err();
        assert_eq!(err, ClassifyError::DegenerateDistribution { std_dev: 0.0 });
    }

    #[test]
    fn zscore_empty_column_is_degenerate() {
        assert!(matches!(
            classify(&[], &MethodConfig::ZScore),
            Err(ClassifyError::DegenerateDistribution { .. })
        ));
    }

    #[test]
    fn winsorization_trims_both_tails() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let config = MethodConfig::Winsorization {
            lower_pct: 1.0,
            upper_pct: 99.0,
        };
        let result = classify(&values, &config).unwrap();
        assert_eq!(result.outlier_count(), 2);
        assert!(result.mask[0] && result.mask[99]);
    }

    #[test]
    fn invalid_percentile_ranges() {
        for (lower, upper) in [(5.0, 5.0), (10.0, 1.0), (-1.0, 50.0), (1.0, 101.0), (f64::NAN, 99.0)] {
            let config = MethodConfig::Winsorization {
                lower_pct: lower,
                upper_pct: upper,
            };
            assert!(matches!(
                classify(&[1.0, 2.0], &config),
                Err(ClassifyError::InvalidPercentileRange { .. })
            ));
        }
    }

    #[test]
    fn missing_values_never_flagged() {
        let values = [1.0, 2.0, f64::NAN, 3.0, 4.0, 5.0, 100.0];
        let result = classify(&values, &MethodConfig::Iqr).unwrap();
        assert!(!result.mask[2]);
        assert!(result.mask[6]);
    }

    fn method() -> impl Strategy<Value = MethodConfig> {
        prop_oneof![
            Just(MethodConfig::ZScore),
            Just(MethodConfig::Iqr),
            (0.0f64..50.0, 50.5f64..=100.0).prop_map(|(lower_pct, upper_pct)| {
                MethodConfig::Winsorization {
                    lower_pct,
                    upper_pct,
                }
            }),
        ]
    }

    proptest! {
        #[test]
        fn classification_is_deterministic(
            values in prop::collection::vec(-1e6f64..1e6, 1..200),
            config in method(),
        ) {
            prop_assert_eq!(classify(&values, &config), classify(&values, &config));
        }

        #[test]
        fn iqr_fences_enclose_quartiles(values in prop::collection::vec(-1e6f64..1e6, 1..200)) {
            let (q1, q3) = stats::quartiles(&values);
            let bounds = iqr_bounds(&values);
            prop_assert!(bounds.lower <= q1);
            prop_assert!(q1 <= q3);
            prop_assert!(q3 <= bounds.upper);
        }
    }
}
