//! Health trend estimation
//!
//! The trend is the ordinary least squares slope of recent baseline health
//! scores against their index. Negative slope means declining health.

use crate::scoring::HealthScorer;
use crate::window::RollingWindow;

/// Number of most recent samples the trend is fitted over
pub const TREND_WINDOW: usize = 10;

/// Calculate linear regression slope for trend detection
pub fn linear_regression_slope(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_x2: f64 = (0..values.len()).map(|i| (i as f64).powi(2)).sum();
    let denom = n * sum_x2 - sum_x.powi(2);
    if denom.abs() < f64::EPSILON {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denom
}

/// Slope of the baseline health scores of the last [`TREND_WINDOW`] samples
///
/// Returns 0 until the window holds at least [`TREND_WINDOW`] samples. The
/// anomaly flag is fixed to false so the trend reflects the scoring formula
/// alone.
pub fn window_trend(window: &RollingWindow, scorer: &HealthScorer) -> f64 {
    if window.len() < TREND_WINDOW {
        return 0.0;
    }
    let scores: Vec<f64> = window
        .iter_recent(TREND_WINDOW)
        .map(|s| scorer.baseline(s))
        .collect();
    linear_regression_slope(&scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;

    #[test]
    fn test_linear_regression_slope() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((linear_regression_slope(&values) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_increasing_scores_positive_trend() {
        let values: Vec<f64> = (0..10).map(|i| 80.0 + i as f64 * 1.5).collect();
        assert!(linear_regression_slope(&values) > 0.0);
    }

    #[test]
    fn test_decreasing_scores_negative_trend() {
        let values: Vec<f64> = (0..10).map(|i| 100.0 - (i * i) as f64).collect();
        assert!(linear_regression_slope(&values) < 0.0);
    }

    #[test]
    fn test_flat_and_degenerate_inputs() {
        assert_eq!(linear_regression_slope(&[]), 0.0);
        assert_eq!(linear_regression_slope(&[42.0]), 0.0);
        assert_eq!(linear_regression_slope(&[70.0; 10]), 0.0);
    }

    #[test]
    fn test_window_trend_needs_ten_samples() {
        let scorer = HealthScorer::default();
        let mut window = RollingWindow::new(100);
        for i in 0..9 {
            window.append(Sample::new(2.5 + i as f64 * 0.1, 5.0, 26.0, i as f64));
        }
        assert_eq!(window_trend(&window, &scorer), 0.0);

        window.append(Sample::new(3.4, 5.0, 26.0, 9.0));
        // rising current past the threshold lowers every subsequent score by 1.5
        let trend = window_trend(&window, &scorer);
        assert!((trend + 1.5).abs() < 1e-6, "trend was {}", trend);
    }

    #[test]
    fn test_window_trend_uses_last_ten_only() {
        let scorer = HealthScorer::default();
        let mut window = RollingWindow::new(100);
        for i in 0..20 {
            window.append(Sample::new(4.0, 5.0, 26.0, i as f64));
        }
        for i in 20..30 {
            window.append(Sample::new(0.0, 5.0, 26.0, i as f64));
        }
        assert_eq!(window_trend(&window, &scorer), 0.0);
    }
}
