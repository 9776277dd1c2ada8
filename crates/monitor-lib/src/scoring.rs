//! Deterministic equipment health scoring
//!
//! Starts from a perfect score of 100 and subtracts penalties for voltage
//! deviation, overcurrent, temperature outside the comfort band and a
//! detected anomaly. The result is clamped to `[0, 100]`.

use crate::models::DEFAULT_VOLTAGE;

/// Current above which overcurrent penalties and alerts apply
pub const DEFAULT_CURRENT_THRESHOLD: f64 = 2.5;

/// Threshold used by the first generation of the service
pub const LEGACY_CURRENT_THRESHOLD: f64 = 2.4;

/// Upper edge of the temperature comfort band (°C)
pub const TEMPERATURE_HIGH: f64 = 27.5;

/// Lower edge of the temperature comfort band (°C)
pub const TEMPERATURE_LOW: f64 = 25.0;

const VOLTAGE_PENALTY_WEIGHT: f64 = 20.0;
const CURRENT_PENALTY_PER_AMP: f64 = 15.0;
const HOT_PENALTY_PER_DEGREE: f64 = 5.0;
const COLD_PENALTY_PER_DEGREE: f64 = 3.0;
const ANOMALY_PENALTY: f64 = 25.0;

pub const MAX_SCORE: f64 = 100.0;

/// Pure health scoring function parameterised by the overcurrent threshold
#[derive(Debug, Clone, Copy)]
pub struct HealthScorer {
    pub current_threshold: f64,
}

impl HealthScorer {
    pub fn new(current_threshold: f64) -> Self {
        Self { current_threshold }
    }

    /// Score a reading in `[0, 100]`
    pub fn score(&self, current: f64, voltage: f64, temperature: f64, is_anomaly: bool) -> f64 {
        let mut score = MAX_SCORE;

        score -= (voltage - DEFAULT_VOLTAGE).abs() / DEFAULT_VOLTAGE * VOLTAGE_PENALTY_WEIGHT;

        if current > self.current_threshold {
            score -= (current - self.current_threshold) * CURRENT_PENALTY_PER_AMP;
        }

        if temperature > TEMPERATURE_HIGH {
            score -= (temperature - TEMPERATURE_HIGH) * HOT_PENALTY_PER_DEGREE;
        } else if temperature < TEMPERATURE_LOW {
            score -= (TEMPERATURE_LOW - temperature) * COLD_PENALTY_PER_DEGREE;
        }

        if is_anomaly {
            score -= ANOMALY_PENALTY;
        }

        // NaN inputs fall through to 0 rather than escaping the range
        if score.is_nan() {
            return 0.0;
        }
        score.clamp(0.0, MAX_SCORE)
    }

    /// Baseline score of a stored sample, ignoring anomaly detection
    pub fn baseline(&self, sample: &crate::models::Sample) -> f64 {
        self.score(sample.current, sample.voltage, sample.temperature, false)
    }
}

impl Default for HealthScorer {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENT_THRESHOLD)
    }
}

/// Round to one decimal place for reporting
pub fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_reading_scores_100() {
        let scorer = HealthScorer::default();
        assert_eq!(scorer.score(0.0, 5.0, 26.0, false), 100.0);
    }

    #[test]
    fn test_overcurrent_penalty() {
        let scorer = HealthScorer::default();
        let score = scorer.score(3.0, 5.0, 26.0, false);
        assert!((score - 92.5).abs() < 1e-9, "score was {}", score);
    }

    #[test]
    fn test_legacy_threshold_penalises_earlier() {
        let legacy = HealthScorer::new(LEGACY_CURRENT_THRESHOLD);
        let score = legacy.score(2.5, 5.0, 26.0, false);
        assert!((score - 98.5).abs() < 1e-9, "score was {}", score);
        assert_eq!(HealthScorer::default().score(2.5, 5.0, 26.0, false), 100.0);
    }

    #[test]
    fn test_voltage_penalty_is_symmetric() {
        let scorer = HealthScorer::default();
        let low = scorer.score(0.0, 4.5, 26.0, false);
        let high = scorer.score(0.0, 5.5, 26.0, false);
        assert!((low - 98.0).abs() < 1e-9);
        assert!((low - high).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_penalties() {
        let scorer = HealthScorer::default();
        assert!((scorer.score(0.0, 5.0, 29.5, false) - 90.0).abs() < 1e-9);
        assert!((scorer.score(0.0, 5.0, 23.0, false) - 94.0).abs() < 1e-9);
        assert_eq!(scorer.score(0.0, 5.0, 27.5, false), 100.0);
        assert_eq!(scorer.score(0.0, 5.0, 25.0, false), 100.0);
    }

    #[test]
    fn test_anomaly_penalty() {
        let scorer = HealthScorer::default();
        assert_eq!(scorer.score(0.0, 5.0, 26.0, true), 75.0);
    }

    #[test]
    fn test_combined_penalties() {
        let scorer = HealthScorer::default();
        // 2 (voltage) + 7.5 (current) + 7.5 (temperature)
        let score = scorer.score(3.0, 4.5, 29.0, false);
        assert!((score - 83.0).abs() < 1e-9, "score was {}", score);
    }

    #[test]
    fn test_score_is_clamped() {
        let scorer = HealthScorer::default();
        assert_eq!(scorer.score(20.0, 0.0, 80.0, true), 0.0);
        assert_eq!(scorer.score(f64::NAN, 5.0, 26.0, false), 0.0);

        for current in [0.0, 1.0, 2.4, 2.6, 5.0, 10.0] {
            for voltage in [0.0, 4.5, 5.0, 5.5, 12.0] {
                for temperature in [-10.0, 20.0, 26.0, 30.0, 60.0] {
                    for anomaly in [false, true] {
                        let s = scorer.score(current, voltage, temperature, anomaly);
                        assert!((0.0..=100.0).contains(&s));
                    }
                }
            }
        }
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(83.04), 83.0);
        assert_eq!(round_score(92.46), 92.5);
    }
}
