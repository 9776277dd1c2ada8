//! Periodically retrained outlier detection over telemetry samples
//!
//! Scoring starts once the window holds [`MIN_SAMPLES_FOR_DETECTION`]
//! samples. The model is refitted on the most recent samples whenever the
//! window length reaches a retrain milestone. Until the first successful fit
//! the detector reports no anomaly.

use super::isolation_forest::{Features, ForestConfig, IsolationForest};
use crate::error::{EngineError, Result};
use crate::models::Sample;
use crate::window::RollingWindow;
use std::time::{Duration, Instant};
use tracing::debug;

/// Minimum window length before any scoring is attempted
pub const MIN_SAMPLES_FOR_DETECTION: usize = 10;

/// Minimum window length before the model is (re)trained
pub const MIN_SAMPLES_FOR_TRAINING: usize = 50;

/// Retrain whenever the window length is a multiple of this
pub const RETRAIN_INTERVAL: usize = 20;

/// Number of most recent samples used as training data
pub const TRAINING_WINDOW: usize = 100;

/// Detector cadence and model parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    pub min_samples: usize,
    pub min_training_samples: usize,
    pub retrain_interval: usize,
    pub training_window: usize,
    pub forest: ForestConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_samples: MIN_SAMPLES_FOR_DETECTION,
            min_training_samples: MIN_SAMPLES_FOR_TRAINING,
            retrain_interval: RETRAIN_INTERVAL,
            training_window: TRAINING_WINDOW,
            forest: ForestConfig::default(),
        }
    }
}

/// What happened to the model during one evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum RetrainOutcome {
    Retrained { samples: usize, elapsed: Duration },
    /// Fit failed; the previous model (if any) is still in use
    Failed { samples: usize, reason: String },
}

/// Wraps the outlier model and owns its retrain schedule
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    config: DetectorConfig,
    model: Option<IsolationForest>,
    retrain_count: u64,
    retrain_failures: u64,
}

impl AnomalyDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            model: None,
            retrain_count: 0,
            retrain_failures: 0,
        }
    }

    /// Whether a window of `len` samples hits a retrain milestone
    pub fn should_retrain(&self, len: usize) -> bool {
        len >= self.config.min_training_samples
            && self.config.retrain_interval > 0
            && len % self.config.retrain_interval == 0
    }

    /// Retrain if the window length is at a milestone; call before [`Self::score`]
    pub fn maybe_retrain(&mut self, window: &RollingWindow) -> Option<RetrainOutcome> {
        let len = window.len();
        if len < self.config.min_samples || !self.should_retrain(len) {
            return None;
        }
        Some(self.retrain(window))
    }

    /// Score `sample` against the current model
    ///
    /// Returns `(is_anomaly, score)`, or `(false, 0.0)` while the window is
    /// shorter than the detection minimum or no model has been fitted.
    pub fn score(&self, sample: &Sample, window_len: usize) -> Result<(bool, f64)> {
        if window_len < self.config.min_samples {
            return Ok((false, 0.0));
        }
        let Some(model) = self.model.as_ref() else {
            debug!(window_len, "No fitted model yet, skipping anomaly scoring");
            return Ok((false, 0.0));
        };

        let features = sample.features();
        if features.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::ModelFailure(
                "cannot score a sample with non-finite features".to_string(),
            ));
        }

        Ok((
            model.predict(&features).is_outlier(),
            model.score_samples(&features),
        ))
    }

    /// Refit on the most recent samples, keeping the old model on failure
    fn retrain(&mut self, window: &RollingWindow) -> RetrainOutcome {
        let training: Vec<Features> = window
            .iter_recent(self.config.training_window)
            .map(Sample::features)
            .collect();
        let samples = training.len();
        let start = Instant::now();

        match IsolationForest::fit(&training, &self.config.forest) {
            Ok(model) => {
                self.model = Some(model);
                self.retrain_count += 1;
                let elapsed = start.elapsed();
                debug!(
                    samples = samples,
                    retrain_count = self.retrain_count,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Isolation forest refitted"
                );
                RetrainOutcome::Retrained { samples, elapsed }
            }
            Err(e) => {
                self.retrain_failures += 1;
                debug!(
                    samples = samples,
                    error = %e,
                    has_previous_model = self.model.is_some(),
                    "Isolation forest fit rejected training batch"
                );
                RetrainOutcome::Failed {
                    samples,
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn retrain_count(&self) -> u64 {
        self.retrain_count
    }

    pub fn retrain_failures(&self) -> u64 {
        self.retrain_failures
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Drop the fitted model and counters
    pub fn reset(&mut self) {
        self.model = None;
        self.retrain_count = 0;
        self.retrain_failures = 0;
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}
