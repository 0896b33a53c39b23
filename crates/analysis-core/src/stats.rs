//! Small statistics helpers shared by the scoring and extraction code.
//!
//! Thin wrappers over `statrs` that return a defined value for degenerate
//! inputs instead of NaN, so callers never have to special-case empty slices.

use statrs::statistics::Statistics;

/// Compute sample standard deviation (n - 1 denominator).
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    data.iter().std_dev()
}

/// Population variance (n denominator). Used for dispersion across a fixed
/// set of scores, where the values are the whole population.
pub fn population_variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().population_variance()
}

/// Clamp into `[0, 1]`.
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Simple returns between consecutive values. A zero reference value yields
/// no return for that step.
pub fn simple_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Percent change from `from` to `to`; `None` when `from` is zero.
pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    Some((to - from) / from * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_population_variance_matches_hand_computation() {
        // mean 0.5, deviations 0.2, -0.1, -0.1 -> (0.04 + 0.01 + 0.01) / 3
        let v = population_variance(&[0.7, 0.4, 0.4]);
        assert_abs_diff_eq!(v, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_std_dev_needs_two_points() {
        assert_eq!(std_dev(&[5.0]), 0.0);
        assert_abs_diff_eq!(std_dev(&[1.0, 3.0]), 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_simple_returns_skip_zero_reference() {
        let r = simple_returns(&[0.0, 10.0, 11.0]);
        assert_eq!(r.len(), 1);
        assert_abs_diff_eq!(r[0], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(0.0, 5.0), None);
        assert_abs_diff_eq!(percent_change(100.0, 97.0).unwrap(), -3.0, epsilon = 1e-12);
    }
}
