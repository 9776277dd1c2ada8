//! Time-to-failure estimation
//!
//! The tiered predictor picks a base estimate from the health score tier,
//! adds bounded jitter, then shortens it by independent urgency multipliers
//! for current, voltage, temperature and trend. The trend-gated predictor
//! reproduces the first generation of the service: no estimate for healthy
//! equipment, linear extrapolation when health is declining.

use crate::models::{FailurePrediction, Sample};
use crate::scoring::DEFAULT_CURRENT_THRESHOLD;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lower bound of every tiered estimate (hours)
pub const MIN_HOURS_TO_FAILURE: f64 = 1.5;

/// Upper bound of every estimate (hours)
pub const MAX_HOURS_TO_FAILURE: f64 = 48.0;

/// Confidence reported alongside any estimate
pub const PREDICTION_CONFIDENCE: f64 = 0.75;

/// Current above which the predictor starts shortening estimates
pub const CURRENT_ELEVATED: f64 = 2.3;

const VOLTAGE_CRITICAL: f64 = 4.7;
const VOLTAGE_LOW: f64 = 4.9;
const TEMPERATURE_CRITICAL: f64 = 28.0;
const TEMPERATURE_ELEVATED: f64 = 26.5;
const TREND_STEEP_DECLINE: f64 = -1.0;
const TREND_DECLINE: f64 = -0.5;

/// Trend-gated mode only predicts at or below this score
const GATED_HEALTH_CEILING: f64 = 80.0;
const GATED_MIN_HOURS: f64 = 2.0;

/// Failure prediction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMode {
    /// Always produce an estimate from the health tier
    #[default]
    Tiered,
    /// Only estimate when health is at most 80 and declining
    TrendGated,
}

impl PredictionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMode::Tiered => "tiered",
            PredictionMode::TrendGated => "trend_gated",
        }
    }
}

/// Health score tier driving the base estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTier {
    Excellent,
    VeryGood,
    Good,
    Warning,
    Critical,
}

impl HealthTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 95.0 {
            HealthTier::Excellent
        } else if score >= 85.0 {
            HealthTier::VeryGood
        } else if score >= 70.0 {
            HealthTier::Good
        } else if score >= 50.0 {
            HealthTier::Warning
        } else {
            HealthTier::Critical
        }
    }
}

/// Heuristic hours-to-failure estimator
#[derive(Debug, Clone, Copy)]
pub struct FailurePredictor {
    pub mode: PredictionMode,
    /// Current above which the strongest urgency multiplier applies
    pub current_threshold: f64,
}

impl FailurePredictor {
    pub fn new(mode: PredictionMode, current_threshold: f64) -> Self {
        Self {
            mode,
            current_threshold,
        }
    }

    /// Estimate hours until maintenance is due
    ///
    /// The tiered mode always returns a value in
    /// `[MIN_HOURS_TO_FAILURE, MAX_HOURS_TO_FAILURE]`. The trend-gated mode
    /// returns `None` for healthy or stable equipment.
    pub fn predict<R: Rng>(
        &self,
        rng: &mut R,
        health_score: f64,
        trend: f64,
        sample: &Sample,
    ) -> Option<f64> {
        match self.mode {
            PredictionMode::Tiered => Some(self.tiered(rng, health_score, trend, sample)),
            PredictionMode::TrendGated => trend_gated(health_score, trend),
        }
    }

    /// Wrap [`Self::predict`] into the reported prediction
    pub fn prediction<R: Rng>(
        &self,
        rng: &mut R,
        health_score: f64,
        trend: f64,
        sample: &Sample,
    ) -> FailurePrediction {
        let hours = self.predict(rng, health_score, trend, sample);
        FailurePrediction {
            hours_to_failure: hours,
            confidence: if hours.is_some() {
                PREDICTION_CONFIDENCE
            } else {
                0.0
            },
        }
    }

    fn tiered<R: Rng>(
        &self,
        rng: &mut R,
        health_score: f64,
        trend: f64,
        sample: &Sample,
    ) -> f64 {
        let base = base_hours(rng, health_score);
        let hours = base * self.urgency_factor(trend, sample);

        if hours.is_nan() {
            return MIN_HOURS_TO_FAILURE;
        }
        hours.clamp(MIN_HOURS_TO_FAILURE, MAX_HOURS_TO_FAILURE)
    }

    /// Product of the independent urgency multipliers
    pub fn urgency_factor(&self, trend: f64, sample: &Sample) -> f64 {
        let mut factor = 1.0;

        if sample.current > self.current_threshold {
            factor *= 0.7;
        } else if sample.current > CURRENT_ELEVATED {
            factor *= 0.85;
        }

        if sample.voltage < VOLTAGE_CRITICAL {
            factor *= 0.8;
        } else if sample.voltage < VOLTAGE_LOW {
            factor *= 0.9;
        }

        if sample.temperature > TEMPERATURE_CRITICAL {
            factor *= 0.85;
        } else if sample.temperature > TEMPERATURE_ELEVATED {
            factor *= 0.95;
        }

        if trend < TREND_STEEP_DECLINE {
            factor *= 0.6;
        } else if trend < TREND_DECLINE {
            factor *= 0.8;
        }

        factor
    }
}

impl Default for FailurePredictor {
    fn default() -> Self {
        Self::new(PredictionMode::Tiered, DEFAULT_CURRENT_THRESHOLD)
    }
}

/// Tier base estimate with its jitter applied
fn base_hours<R: Rng>(rng: &mut R, score: f64) -> f64 {
    match HealthTier::from_score(score) {
        HealthTier::Excellent => rng.gen_range(36.0..=48.0),
        HealthTier::VeryGood => 24.0 + (score - 85.0) / 10.0 * 12.0 + jitter(rng, 2.0),
        HealthTier::Good => 12.0 + (score - 70.0) / 15.0 * 12.0 + jitter(rng, 1.5),
        HealthTier::Warning => 6.0 + (score - 50.0) / 20.0 * 6.0 + jitter(rng, 1.0),
        HealthTier::Critical => 2.0 + score / 50.0 * 4.0 + jitter(rng, 0.5),
    }
}

fn jitter<R: Rng>(rng: &mut R, amplitude: f64) -> f64 {
    rng.gen_range(-amplitude..=amplitude)
}

fn trend_gated(health_score: f64, trend: f64) -> Option<f64> {
    if health_score > GATED_HEALTH_CEILING {
        return None;
    }
    if trend < TREND_DECLINE {
        let hours = health_score / trend.abs() * 0.5;
        return Some(hours.clamp(GATED_MIN_HOURS, MAX_HOURS_TO_FAILURE));
    }
    None
}
