//! Anomaly detection and alerting for equipment telemetry
//!
//! This module provides:
//! - An isolation forest outlier model
//! - A detector that owns the model's retrain schedule
//! - Threshold-based alert generation with a bounded alert log

mod alerter;
mod detector;
mod isolation_forest;

pub use alerter::{
    Alert, AlertContext, AlertGenerator, AlertKind, AlertLog, AlertSeverity,
    DEFAULT_ALERT_LOG_CAPACITY, RECENT_ALERTS_LIMIT,
};
pub use detector::{
    AnomalyDetector, DetectorConfig, RetrainOutcome, MIN_SAMPLES_FOR_DETECTION,
    MIN_SAMPLES_FOR_TRAINING, RETRAIN_INTERVAL, TRAINING_WINDOW,
};
pub use isolation_forest::{
    average_path_length, Features, FitError, ForestConfig, IsolationForest, Label,
};
