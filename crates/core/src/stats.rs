//! Statistical helpers for evaluating backtest win rates.
//!
//! Provides the Wilson score interval, a two-tailed binomial test, and
//! sample mean/deviation helpers used when aggregating repeated runs.

use serde::{Deserialize, Serialize};

/// Significance summary for an observed win rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRateStats {
    /// Observed win rate.
    pub win_rate: f64,
    /// Wilson score 95% interval, lower bound.
    pub wilson_ci_lower: f64,
    /// Wilson score 95% interval, upper bound.
    pub wilson_ci_upper: f64,
    /// Two-tailed p-value against a coin flip (p = 0.5).
    pub p_value: f64,
    /// Number of decided bets.
    pub sample_size: usize,
    /// p-value below 0.05.
    pub is_significant: bool,
}

impl WinRateStats {
    /// Computes statistics from win and decided-bet counts.
    #[must_use]
    pub fn from_counts(wins: usize, total: usize) -> Self {
        let win_rate = if total == 0 {
            0.0
        } else {
            wins as f64 / total as f64
        };
        let (wilson_ci_lower, wilson_ci_upper) = wilson_ci(wins, total, 1.96);
        let p_value = binomial_test(wins, total, 0.5);

        Self {
            win_rate,
            wilson_ci_lower,
            wilson_ci_upper,
            p_value,
            sample_size: total,
            is_significant: p_value < 0.05,
        }
    }

    /// Returns true if the whole interval sits above `break_even`.
    #[must_use]
    pub fn beats(&self, break_even: f64) -> bool {
        self.sample_size > 0 && self.wilson_ci_lower > break_even
    }
}

/// Wilson score confidence interval for a proportion.
///
/// ```text
/// CI = (p + z^2/(2n) +/- z * sqrt(p(1-p)/n + z^2/(4n^2))) / (1 + z^2/n)
/// ```
///
/// Returns `(0.0, 0.0)` for an empty sample.
#[must_use]
pub fn wilson_ci(wins: usize, n: usize, z: f64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 0.0);
    }

    let n_f = n as f64;
    let p = wins as f64 / n_f;
    let z_sq = z * z;

    let denominator = 1.0 + z_sq / n_f;
    let center = p + z_sq / (2.0 * n_f);
    let spread = z * (p * (1.0 - p) / n_f + z_sq / (4.0 * n_f * n_f)).sqrt();

    let lower = (center - spread) / denominator;
    let upper = (center + spread) / denominator;

    (lower.max(0.0), upper.min(1.0))
}

/// Two-tailed binomial test of `successes` out of `n` against `p0`.
///
/// Uses the normal approximation with continuity correction.
#[must_use]
pub fn binomial_test(successes: usize, n: usize, p0: f64) -> f64 {
    if n == 0 {
        return 1.0;
    }

    let n_f = n as f64;
    let expected = n_f * p0;
    let std_dev = (n_f * p0 * (1.0 - p0)).sqrt();

    if std_dev < f64::EPSILON {
        let all_or_nothing =
            (p0 < f64::EPSILON && successes == 0) || (p0 > 1.0 - f64::EPSILON && successes == n);
        return if all_or_nothing { 1.0 } else { 0.0 };
    }

    let z = (successes as f64 - expected).abs() - 0.5;
    if z < 0.0 {
        return 1.0;
    }

    (2.0 * (1.0 - standard_normal_cdf(z / std_dev))).clamp(0.0, 1.0)
}

/// Standard normal CDF (Abramowitz and Stegun 26.2.17, error ~1e-5).
#[must_use]
pub fn standard_normal_cdf(x: f64) -> f64 {
    if x < 0.0 {
        return 1.0 - standard_normal_cdf(-x);
    }

    const B: [f64; 5] = [
        0.319_381_530,
        -0.356_563_782,
        1.781_477_937,
        -1.821_255_978,
        1.330_274_429,
    ];
    let t = 1.0 / (1.0 + 0.231_641_9 * x);
    let poly = B.iter().rev().fold(0.0, |acc, b| (acc + b) * t);

    let pdf = (-x * x / 2.0).exp() / (2.0 * std::f64::consts::PI).sqrt();
    1.0 - pdf * poly
}

/// Sample mean and (n-1) standard deviation.
///
/// Returns `(0.0, 0.0)` for an empty slice and a zero deviation for a single
/// value.
#[must_use]
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

/// Normal-approximation 95% interval for the mean of `values`.
#[must_use]
pub fn mean_ci95(values: &[f64]) -> (f64, f64) {
    let (mean, std) = mean_std(values);
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let half = 1.96 * std / (values.len() as f64).sqrt();
    (mean - half, mean + half)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================
    // wilson_ci Tests
    // ============================================

    #[test]
    fn wilson_ci_50_percent_approximately_40_60() {
        let (lower, upper) = wilson_ci(50, 100, 1.96);
        assert!(lower > 0.39 && lower < 0.42, "lower was {lower}");
        assert!(upper > 0.58 && upper < 0.61, "upper was {upper}");
    }

    #[test]
    fn wilson_ci_empty_sample() {
        assert_eq!(wilson_ci(0, 0, 1.96), (0.0, 0.0));
    }

    #[test]
    fn wilson_ci_stays_in_unit_interval() {
        let (lower, upper) = wilson_ci(10, 10, 1.96);
        assert!(lower > 0.6);
        assert!(upper <= 1.0);
    }

    // ============================================
    // binomial_test Tests
    // ============================================

    #[test]
    fn binomial_test_not_significant_near_half() {
        assert!(binomial_test(55, 100, 0.5) > 0.05);
    }

    #[test]
    fn binomial_test_significant_far_from_half() {
        assert!(binomial_test(65, 100, 0.5) < 0.05);
    }

    #[test]
    fn binomial_test_exact_expectation_is_one() {
        assert_eq!(binomial_test(50, 100, 0.5), 1.0);
    }

    #[test]
    fn normal_cdf_reference_points() {
        assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-6);
        assert!((standard_normal_cdf(1.96) - 0.975).abs() < 1e-4);
        assert!((standard_normal_cdf(-1.96) - 0.025).abs() < 1e-4);
    }

    // ============================================
    // mean/std Tests
    // ============================================

    #[test]
    fn mean_std_matches_sample_formula() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.138_089_935).abs() < 1e-6);
    }

    #[test]
    fn mean_ci95_collapses_for_single_value() {
        assert_eq!(mean_ci95(&[0.55]), (0.55, 0.55));
        assert_eq!(mean_ci95(&[]), (0.0, 0.0));
    }

    #[test]
    fn win_rate_stats_from_counts() {
        let stats = WinRateStats::from_counts(6, 10);
        assert!((stats.win_rate - 0.6).abs() < 1e-12);
        assert_eq!(stats.sample_size, 10);
        assert!(!stats.is_significant);
        assert!(!stats.beats(0.524));
    }
}
