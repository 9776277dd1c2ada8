//! Descriptive statistics over the rolling window
//!
//! Read-only: aggregating never mutates the window.

use crate::error::{EngineError, Result};
use crate::models::{FieldStatistics, FieldStats, Sample, WindowStats};
use crate::window::RollingWindow;

/// Number of most recent samples summarised by default
pub const DEFAULT_STATS_LIMIT: usize = 100;

impl FieldStats {
    /// Population mean, standard deviation, min and max of `values`
    ///
    /// Returns `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        // Two-pass variance for stability
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            mean,
            std: variance.sqrt(),
            min,
            max,
        })
    }
}

fn field_stats(samples: &[Sample], field: impl Fn(&Sample) -> f64) -> Result<FieldStats> {
    let values: Vec<f64> = samples.iter().map(field).collect();
    FieldStats::from_values(&values).ok_or(EngineError::NoData)
}

/// Summarise the last `limit` samples of `window`
///
/// `data_points` reports the full window length, not the summarised slice.
pub fn window_stats(window: &RollingWindow, limit: usize) -> Result<WindowStats> {
    if window.is_empty() {
        return Err(EngineError::NoData);
    }
    let recent = window.snapshot(limit.max(1));

    Ok(WindowStats {
        data_points: window.len(),
        statistics: FieldStatistics {
            current: field_stats(&recent, |s| s.current)?,
            voltage: field_stats(&recent, |s| s.voltage)?,
            temperature: field_stats(&recent, |s| s.temperature)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_window_is_no_data() {
        let window = RollingWindow::default();
        assert!(matches!(
            window_stats(&window, DEFAULT_STATS_LIMIT),
            Err(EngineError::NoData)
        ));
    }

    #[test]
    fn test_population_std() {
        let stats = FieldStats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((stats.mean - 5.0).abs() < 1e-9);
        assert!((stats.std - 2.0).abs() < 1e-9);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn test_single_sample() {
        let mut window = RollingWindow::default();
        window.append(Sample::new(1.5, 4.9, 26.0, 0.0));
        let stats = window_stats(&window, DEFAULT_STATS_LIMIT).unwrap();
        assert_eq!(stats.data_points, 1);
        assert_eq!(stats.statistics.current.mean, 1.5);
        assert_eq!(stats.statistics.current.std, 0.0);
        assert_eq!(stats.statistics.voltage.min, 4.9);
    }

    #[test]
    fn test_limit_applies_to_recent_samples_only() {
        let mut window = RollingWindow::default();
        for i in 0..150 {
            let current = if i < 50 { 10.0 } else { 1.0 };
            window.append(Sample::new(current, 5.0, 26.0, i as f64));
        }
        let stats = window_stats(&window, DEFAULT_STATS_LIMIT).unwrap();
        assert_eq!(stats.data_points, 150);
        assert_eq!(stats.statistics.current.max, 1.0);
        assert_eq!(stats.statistics.current.std, 0.0);
    }
}
