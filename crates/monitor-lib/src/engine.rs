//! Streaming health-analysis engine
//!
//! One [`HealthEngine`] owns the rolling window, the anomaly detector, the
//! alert log and the random source for failure prediction. Each call to
//! [`HealthEngine::analyze`] runs the full pipeline:
//!
//! append → detect (maybe retrain) → score → trend → predict → alert
//!
//! The engine is not internally synchronised; callers that share it wrap it
//! in a mutex and hold the lock for the whole call.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, instrument};

use crate::anomaly::{
    Alert, AlertContext, AlertGenerator, AnomalyDetector, DetectorConfig, RetrainOutcome,
    DEFAULT_ALERT_LOG_CAPACITY,
};
use crate::error::Result;
use crate::models::{AnalysisResult, Sample, SampleInput, WindowStats};
use crate::observability::{MonitorMetrics, StructuredLogger};
use crate::predictor::{window_trend, FailurePredictor, PredictionMode};
use crate::scoring::{round_score, HealthScorer, DEFAULT_CURRENT_THRESHOLD};
use crate::stats::window_stats;
use crate::window::{RollingWindow, DEFAULT_WINDOW_CAPACITY};

/// Equipment id used when none is configured
pub const DEFAULT_EQUIPMENT_ID: &str = "equipment-0";

/// Engine construction parameters
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub window_capacity: usize,
    pub alert_log_capacity: usize,
    /// Overcurrent threshold shared by scoring, prediction and alerting
    pub current_threshold: f64,
    pub prediction_mode: PredictionMode,
    /// Seed for failure-prediction jitter; entropy when unset
    pub rng_seed: Option<u64>,
    pub detector: DetectorConfig,
    pub equipment_id: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            alert_log_capacity: DEFAULT_ALERT_LOG_CAPACITY,
            current_threshold: DEFAULT_CURRENT_THRESHOLD,
            prediction_mode: PredictionMode::default(),
            rng_seed: None,
            detector: DetectorConfig::default(),
            equipment_id: DEFAULT_EQUIPMENT_ID.to_string(),
        }
    }
}

/// Stateful analysis engine for one piece of equipment
pub struct HealthEngine {
    window: RollingWindow,
    detector: AnomalyDetector,
    scorer: HealthScorer,
    predictor: FailurePredictor,
    alerts: AlertGenerator,
    rng: StdRng,
    metrics: MonitorMetrics,
    logger: StructuredLogger,
}

impl HealthEngine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Build an engine around an explicit random source
    pub fn with_rng(config: EngineConfig, rng: StdRng) -> Self {
        Self {
            window: RollingWindow::new(config.window_capacity),
            detector: AnomalyDetector::new(config.detector),
            scorer: HealthScorer::new(config.current_threshold),
            predictor: FailurePredictor::new(config.prediction_mode, config.current_threshold),
            alerts: AlertGenerator::new(config.current_threshold, config.alert_log_capacity),
            rng,
            metrics: MonitorMetrics::new(),
            logger: StructuredLogger::new(config.equipment_id),
        }
    }

    /// Ingest a caller-provided reading, applying defaults for missing fields
    pub fn analyze(&mut self, input: SampleInput) -> Result<AnalysisResult> {
        self.analyze_sample(input.into_sample())
    }

    /// Ingest one sample and produce its assessment
    #[instrument(skip(self))]
    pub fn analyze_sample(&mut self, sample: Sample) -> Result<AnalysisResult> {
        let start = Instant::now();
        self.window.append(sample);

        if let Some(outcome) = self.detector.maybe_retrain(&self.window) {
            self.record_retrain(&outcome);
        }
        let (is_anomaly, anomaly_score) = match self.detector.score(&sample, self.window.len()) {
            Ok(scored) => scored,
            Err(e) => {
                self.metrics.inc_analysis_errors();
                return Err(e);
            }
        };

        let health_score = self.scorer.score(
            sample.current,
            sample.voltage,
            sample.temperature,
            is_anomaly,
        );
        let trend = window_trend(&self.window, &self.scorer);
        let failure_prediction = self
            .predictor
            .prediction(&mut self.rng, health_score, trend, &sample);

        let alerts = self.alerts.evaluate(&AlertContext {
            sample: &sample,
            is_anomaly,
            health_score,
            failure_hours: failure_prediction.hours_to_failure,
            trend,
        });

        if is_anomaly {
            self.metrics.inc_anomalies_detected();
            self.logger.log_anomaly(
                sample.current,
                sample.voltage,
                sample.temperature,
                anomaly_score,
                health_score,
            );
        }
        for alert in &alerts {
            self.metrics.inc_alerts(alert.severity);
            self.logger.log_alert(alert);
        }
        self.metrics.inc_samples_analyzed();
        self.metrics.set_window_state(self.window.len(), health_score);
        self.metrics
            .observe_analysis_latency(start.elapsed().as_secs_f64());

        debug!(
            health_score = health_score,
            is_anomaly = is_anomaly,
            trend = trend,
            alerts = alerts.len(),
            "Sample analysed"
        );

        Ok(AnalysisResult {
            health_score: round_score(health_score),
            is_anomaly,
            anomaly_score,
            trend,
            failure_prediction,
            alerts,
            data_points_analyzed: self.window.len(),
        })
    }

    fn record_retrain(&self, outcome: &RetrainOutcome) {
        match outcome {
            RetrainOutcome::Retrained { samples, elapsed } => {
                self.metrics.inc_model_retrains();
                self.metrics.observe_retrain_latency(elapsed.as_secs_f64());
                self.logger
                    .log_model_retrain(*samples, self.detector.retrain_count(), None);
            }
            RetrainOutcome::Failed { samples, reason } => {
                self.metrics.inc_model_retrain_failures();
                self.logger.log_model_retrain(
                    *samples,
                    self.detector.retrain_count(),
                    Some(reason.as_str()),
                );
            }
        }
    }

    /// The last `n` alerts, oldest first
    pub fn recent_alerts(&self, n: usize) -> Vec<Alert> {
        self.alerts.recent(n)
    }

    /// Statistics over the last `limit` samples
    pub fn stats(&self, limit: usize) -> Result<WindowStats> {
        window_stats(&self.window, limit)
    }

    /// Whether the outlier model has been fitted at least once
    pub fn model_ready(&self) -> bool {
        self.detector.is_trained()
    }

    pub fn data_points(&self) -> usize {
        self.window.len()
    }

    pub fn retrain_count(&self) -> u64 {
        self.detector.retrain_count()
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.log().len()
    }

    /// Forget all samples, alerts and the fitted model
    pub fn reset(&mut self) {
        self.window.clear();
        self.detector.reset();
        self.alerts.clear();
        self.metrics.set_window_samples(0);
    }
}

impl Default for HealthEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
