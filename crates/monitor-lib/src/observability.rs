//! Observability infrastructure for the health monitor
//!
//! Provides:
//! - Prometheus metrics (analysis and retrain latency, window size, alert counts)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge, register_histogram, register_int_counter, register_int_counter_vec,
    register_int_gauge, Gauge, Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::anomaly::{Alert, AlertSeverity};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<MonitorMetricsInner> = OnceLock::new();

struct MonitorMetricsInner {
    analysis_latency_seconds: Histogram,
    retrain_latency_seconds: Histogram,
    samples_analyzed: IntCounter,
    anomalies_detected: IntCounter,
    model_retrains: IntCounter,
    model_retrain_failures: IntCounter,
    alerts_raised: IntCounterVec,
    analysis_errors: IntCounter,
    window_samples: IntGauge,
    last_health_score: Gauge,
}

impl MonitorMetricsInner {
    fn new() -> Self {
        Self {
            analysis_latency_seconds: register_histogram!(
                "equipment_monitor_analysis_latency_seconds",
                "Time spent analysing one telemetry sample",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register analysis_latency_seconds"),

            retrain_latency_seconds: register_histogram!(
                "equipment_monitor_retrain_latency_seconds",
                "Time spent refitting the anomaly model",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register retrain_latency_seconds"),

            samples_analyzed: register_int_counter!(
                "equipment_monitor_samples_analyzed_total",
                "Total number of telemetry samples analysed"
            )
            .expect("Failed to register samples_analyzed"),

            anomalies_detected: register_int_counter!(
                "equipment_monitor_anomalies_detected_total",
                "Total number of samples flagged as anomalous"
            )
            .expect("Failed to register anomalies_detected"),

            model_retrains: register_int_counter!(
                "equipment_monitor_model_retrains_total",
                "Total number of successful anomaly model fits"
            )
            .expect("Failed to register model_retrains"),

            model_retrain_failures: register_int_counter!(
                "equipment_monitor_model_retrain_failures_total",
                "Total number of failed anomaly model fits"
            )
            .expect("Failed to register model_retrain_failures"),

            alerts_raised: register_int_counter_vec!(
                "equipment_monitor_alerts_total",
                "Total number of alerts raised",
                &["severity"]
            )
            .expect("Failed to register alerts_raised"),

            analysis_errors: register_int_counter!(
                "equipment_monitor_analysis_errors_total",
                "Total number of failed analysis calls"
            )
            .expect("Failed to register analysis_errors"),

            window_samples: register_int_gauge!(
                "equipment_monitor_window_samples",
                "Number of samples held in the rolling window"
            )
            .expect("Failed to register window_samples"),

            last_health_score: register_gauge!(
                "equipment_monitor_last_health_score",
                "Health score of the most recently analysed sample"
            )
            .expect("Failed to register last_health_score"),
        }
    }
}

/// Monitor metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the same
/// underlying metrics.
#[derive(Clone)]
pub struct MonitorMetrics {
    _private: (),
}

impl Default for MonitorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorMetrics {
    /// Create a new metrics handle (registers global metrics on first call)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(MonitorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &MonitorMetricsInner {
        GLOBAL_METRICS.get_or_init(MonitorMetricsInner::new)
    }

    pub fn observe_analysis_latency(&self, duration_secs: f64) {
        self.inner().analysis_latency_seconds.observe(duration_secs);
    }

    pub fn observe_retrain_latency(&self, duration_secs: f64) {
        self.inner().retrain_latency_seconds.observe(duration_secs);
    }

    pub fn inc_samples_analyzed(&self) {
        self.inner().samples_analyzed.inc();
    }

    pub fn inc_anomalies_detected(&self) {
        self.inner().anomalies_detected.inc();
    }

    pub fn inc_model_retrains(&self) {
        self.inner().model_retrains.inc();
    }

    pub fn inc_model_retrain_failures(&self) {
        self.inner().model_retrain_failures.inc();
    }

    /// Count one raised alert under its severity label
    pub fn inc_alerts(&self, severity: AlertSeverity) {
        self.inner()
            .alerts_raised
            .with_label_values(&[severity.as_str()])
            .inc();
    }

    pub fn inc_analysis_errors(&self) {
        self.inner().analysis_errors.inc();
    }

    /// Update window size and last score after an analysis
    pub fn set_window_state(&self, samples: usize, health_score: f64) {
        self.inner().window_samples.set(samples as i64);
        self.inner().last_health_score.set(health_score);
    }

    pub fn set_window_samples(&self, samples: usize) {
        self.inner().window_samples.set(samples as i64);
    }
}

/// Structured logger for monitor events
///
/// Every event carries the `event` field and the monitored equipment id.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    equipment_id: String,
}

impl StructuredLogger {
    pub fn new(equipment_id: impl Into<String>) -> Self {
        Self {
            equipment_id: equipment_id.into(),
        }
    }

    pub fn equipment_id(&self) -> &str {
        &self.equipment_id
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, port: u16, prediction_mode: &str) {
        info!(
            event = "service_started",
            equipment_id = %self.equipment_id,
            version = %version,
            port = port,
            prediction_mode = %prediction_mode,
            "Equipment monitor started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            equipment_id = %self.equipment_id,
            reason = %reason,
            "Equipment monitor shutting down"
        );
    }

    /// Log the outcome of a model refit
    pub fn log_model_retrain(&self, samples: usize, retrain_count: u64, error: Option<&str>) {
        match error {
            None => {
                info!(
                    event = "model_retrained",
                    equipment_id = %self.equipment_id,
                    samples = samples,
                    retrain_count = retrain_count,
                    "Anomaly model retrained"
                );
            }
            Some(error) => {
                warn!(
                    event = "model_retrain_failed",
                    equipment_id = %self.equipment_id,
                    samples = samples,
                    error = %error,
                    "Anomaly model retrain failed, keeping previous model"
                );
            }
        }
    }

    /// Log a sample flagged by the outlier model
    pub fn log_anomaly(
        &self,
        current: f64,
        voltage: f64,
        temperature: f64,
        anomaly_score: f64,
        health_score: f64,
    ) {
        warn!(
            event = "anomaly_detected",
            equipment_id = %self.equipment_id,
            current = current,
            voltage = voltage,
            temperature = temperature,
            anomaly_score = anomaly_score,
            health_score = health_score,
            "Anomalous telemetry detected"
        );
    }

    /// Log a raised alert; critical alerts go out at warn level
    pub fn log_alert(&self, alert: &Alert) {
        match alert.severity {
            AlertSeverity::Critical => {
                warn!(
                    event = "alert_raised",
                    equipment_id = %self.equipment_id,
                    severity = %alert.severity,
                    kind = %alert.kind,
                    details = %alert.message,
                    "Critical alert raised"
                );
            }
            _ => {
                info!(
                    event = "alert_raised",
                    equipment_id = %self.equipment_id,
                    severity = %alert.severity,
                    kind = %alert.kind,
                    details = %alert.message,
                    "Alert raised"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_metrics_creation() {
        // Global registry: handles created repeatedly share one instance
        let metrics = MonitorMetrics::new();
        let again = MonitorMetrics::new();

        metrics.observe_analysis_latency(0.001);
        metrics.observe_retrain_latency(0.02);
        metrics.inc_samples_analyzed();
        again.inc_anomalies_detected();
        metrics.inc_alerts(AlertSeverity::Critical);
        metrics.set_window_state(10, 92.5);

        let families = prometheus::gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "equipment_monitor_alerts_total"));
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("pump-01");
        assert_eq!(logger.equipment_id(), "pump-01");
    }
}
