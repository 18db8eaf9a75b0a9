//! Statistic estimators over a numeric column.
//!
//! Missing values (NaN) are skipped by every estimator. An input with no
//! present values yields NaN rather than an error, so callers see poisoned
//! statistics instead of a panic.

/// Present (non-NaN) values of `values`.
fn present(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| !v.is_nan())
}

/// Number of non-missing values.
pub fn count(values: &[f64]) -> usize {
    present(values).count()
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> f64 {
    let (sum, n) = present(values).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    sum / n as f64
}

/// Sum of squared deviations from the mean, with the number of terms.
fn sum_sq_dev(values: &[f64]) -> (f64, usize) {
    let m = mean(values);
    present(values).fold((0.0, 0usize), |(s, n), v| (s + (v - m).powi(2), n + 1))
}

/// Population standard deviation (divides by `n`).
pub fn std_dev(values: &[f64]) -> f64 {
    let (ss, n) = sum_sq_dev(values);
    (ss / n as f64).sqrt()
}

/// Sample standard deviation (divides by `n - 1`). NaN with fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let (ss, n) = sum_sq_dev(values);
    if n < 2 {
        return f64::NAN;
    }
    (ss / (n - 1) as f64).sqrt()
}

pub fn min(values: &[f64]) -> f64 {
    present(values).reduce(f64::min).unwrap_or(f64::NAN)
}

pub fn max(values: &[f64]) -> f64 {
    present(values).reduce(f64::max).unwrap_or(f64::NAN)
}

/// Present values in ascending order.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = present(values).collect();
    v.sort_by(f64::total_cmp);
    v
}

/// Percentile of an already sorted slice using linear interpolation between
/// the two closest ranks, where rank = p/100 * (n - 1).
///
/// `p` is clamped to `[0, 100]`.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let rank = p.clamp(0.0, 100.0) / 100.0 * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Percentile with linear interpolation. See [`percentile_sorted`].
pub fn percentile(values: &[f64], p: f64) -> f64 {
    percentile_sorted(&sorted(values), p)
}

/// First and third quartiles.
pub fn quartiles(values: &[f64]) -> (f64, f64) {
    percentile_bounds(values, 25.0, 75.0)
}

/// Values at the `lower` and `upper` percentiles, sorting only once.
pub fn percentile_bounds(values: &[f64], lower: f64, upper: f64) -> (f64, f64) {
    let s = sorted(values);
    (percentile_sorted(&s, lower), percentile_sorted(&s, upper))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn population_and_sample_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&v), 5.0);
        assert_relative_eq!(std_dev(&v), 2.0);
        assert_relative_eq!(sample_std_dev(&v), 2.138089935299395, epsilon = 1e-12);
    }

    #[test]
    fn quartiles_use_linear_interpolation() {
        let (q1, q3) = quartiles(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
        assert_relative_eq!(q1, 2.25);
        assert_relative_eq!(q3, 4.75);
    }

    #[test]
    fn percentile_endpoints_and_unsorted_input() {
        let v = [5.0, 1.0, 3.0];
        assert_eq!(percentile(&v, 0.0), 1.0);
        assert_eq!(percentile(&v, 100.0), 5.0);
        assert_eq!(percentile(&v, 50.0), 3.0);
        assert_relative_eq!(percentile(&v, 75.0), 4.0);
    }

    #[test]
    fn percentile_bounds_on_uniform_grid() {
        let v: Vec<f64> = (1..=100).map(f64::from).collect();
        let (lo, hi) = percentile_bounds(&v, 1.0, 99.0);
        assert_relative_eq!(lo, 1.99, epsilon = 1e-9);
        assert_relative_eq!(hi, 99.01, epsilon = 1e-9);
    }

    #[test]
    fn missing_values_are_skipped() {
        let v = [1.0, f64::NAN, 3.0];
        assert_eq!(count(&v), 2);
        assert_relative_eq!(mean(&v), 2.0);
        assert_eq!(min(&v), 1.0);
        assert_eq!(max(&v), 3.0);
        assert_relative_eq!(percentile(&v, 50.0), 2.0);
    }

    #[test]
    fn empty_input_yields_nan() {
        assert!(mean(&[]).is_nan());
        assert!(std_dev(&[]).is_nan());
        assert!(percentile(&[], 50.0).is_nan());
        assert!(min(&[f64::NAN]).is_nan());
        assert!(sample_std_dev(&[1.0]).is_nan());
    }
}
