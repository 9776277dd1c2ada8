//! Alert generation for equipment health analysis
//!
//! Handles:
//! - Threshold rules over the current reading and the derived assessment
//! - Severity tagging (info, warning, critical)
//! - Retention of recent alerts in a bounded log
//!
//! Rules fire independently and re-fire on every call while their condition
//! holds. There is no suppression window.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Sample;
use crate::predictor::CURRENT_ELEVATED;
use crate::scoring::DEFAULT_CURRENT_THRESHOLD;

/// Default number of alerts retained by the log
pub const DEFAULT_ALERT_LOG_CAPACITY: usize = 100;

/// Number of alerts returned by the recent-alerts surface
pub const RECENT_ALERTS_LIMIT: usize = 20;

const VOLTAGE_LOW: f64 = 4.8;
const VOLTAGE_CRITICAL: f64 = 4.6;
const TEMPERATURE_ELEVATED: f64 = 26.5;
const TEMPERATURE_HOT: f64 = 28.0;
const HEALTH_DEGRADED: f64 = 80.0;
const HEALTH_CRITICAL: f64 = 50.0;
const MAINTENANCE_HORIZON_HOURS: f64 = 36.0;
const MAINTENANCE_WARNING_HOURS: f64 = 24.0;
const MAINTENANCE_CRITICAL_HOURS: f64 = 12.0;

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule that produced an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    CurrentElevated,
    Overcurrent,
    VoltageLow,
    TemperatureElevated,
    AnomalyDetected,
    HealthScore,
    MaintenanceDue,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AlertKind::CurrentElevated => "current_elevated",
            AlertKind::Overcurrent => "overcurrent",
            AlertKind::VoltageLow => "voltage_low",
            AlertKind::TemperatureElevated => "temperature_elevated",
            AlertKind::AnomalyDetected => "anomaly_detected",
            AlertKind::HealthScore => "health_score",
            AlertKind::MaintenanceDue => "maintenance_due",
        };
        f.write_str(name)
    }
}

/// A severity-tagged notice raised by one analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub kind: AlertKind,
    pub message: String,
    /// Timestamp of the sample that raised it
    pub timestamp: f64,
}

/// Bounded FIFO log of raised alerts
#[derive(Debug, Clone)]
pub struct AlertLog {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

impl AlertLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            alerts: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn push(&mut self, alert: Alert) {
        while self.alerts.len() >= self.capacity {
            self.alerts.pop_front();
        }
        self.alerts.push_back(alert);
    }

    /// The last `n` alerts (or fewer), oldest first
    pub fn recent(&self, n: usize) -> Vec<Alert> {
        let skip = self.alerts.len().saturating_sub(n);
        self.alerts.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_LOG_CAPACITY)
    }
}

/// Everything the alert rules look at for one sample
#[derive(Debug, Clone, Copy)]
pub struct AlertContext<'a> {
    pub sample: &'a Sample,
    pub is_anomaly: bool,
    /// Unrounded health score
    pub health_score: f64,
    pub failure_hours: Option<f64>,
    pub trend: f64,
}

/// Applies the alert rules and records what fired
#[derive(Debug, Clone)]
pub struct AlertGenerator {
    current_threshold: f64,
    log: AlertLog,
}

impl AlertGenerator {
    pub fn new(current_threshold: f64, log_capacity: usize) -> Self {
        Self {
            current_threshold,
            log: AlertLog::new(log_capacity),
        }
    }

    /// Evaluate every rule, append the raised alerts to the log and return them
    pub fn evaluate(&mut self, ctx: &AlertContext<'_>) -> Vec<Alert> {
        let alerts = self.rules(ctx);
        for alert in &alerts {
            self.log.push(alert.clone());
        }
        if !alerts.is_empty() {
            debug!(
                count = alerts.len(),
                health_score = ctx.health_score,
                trend = ctx.trend,
                "Alerts raised"
            );
        }
        alerts
    }

    fn rules(&self, ctx: &AlertContext<'_>) -> Vec<Alert> {
        let sample = ctx.sample;
        let threshold = self.current_threshold;
        let mut alerts = Vec::new();
        let mut raise = |severity, kind, message: String| {
            alerts.push(Alert {
                severity,
                kind,
                message,
                timestamp: sample.timestamp,
            });
        };

        if sample.current > CURRENT_ELEVATED && sample.current <= threshold {
            raise(
                AlertSeverity::Info,
                AlertKind::CurrentElevated,
                format!(
                    "Current elevated: {:.2}A approaching {:.2}A limit",
                    sample.current, threshold
                ),
            );
        }

        if sample.current > threshold {
            raise(
                AlertSeverity::Critical,
                AlertKind::Overcurrent,
                format!(
                    "Overcurrent: {:.2}A exceeds {:.2}A limit",
                    sample.current, threshold
                ),
            );
        }

        if sample.voltage < VOLTAGE_LOW {
            let severity = if sample.voltage < VOLTAGE_CRITICAL {
                AlertSeverity::Warning
            } else {
                AlertSeverity::Info
            };
            raise(
                severity,
                AlertKind::VoltageLow,
                format!("Voltage low: {:.2}V", sample.voltage),
            );
        }

        if sample.temperature > TEMPERATURE_ELEVATED {
            let severity = if sample.temperature > TEMPERATURE_HOT {
                AlertSeverity::Warning
            } else {
                AlertSeverity::Info
            };
            raise(
                severity,
                AlertKind::TemperatureElevated,
                format!("Temperature elevated: {:.1}°C", sample.temperature),
            );
        }

        if ctx.is_anomaly {
            raise(
                AlertSeverity::Warning,
                AlertKind::AnomalyDetected,
                format!(
                    "Anomaly detected: Current={:.2}A, Voltage={:.2}V",
                    sample.current, sample.voltage
                ),
            );
        }

        if ctx.health_score < HEALTH_DEGRADED {
            let (severity, label) = if ctx.health_score < HEALTH_CRITICAL {
                (AlertSeverity::Critical, "Critical")
            } else {
                (AlertSeverity::Warning, "Degraded")
            };
            raise(
                severity,
                AlertKind::HealthScore,
                format!("{} health score: {:.1}%", label, ctx.health_score),
            );
        }

        if let Some(hours) = ctx.failure_hours {
            if hours < MAINTENANCE_HORIZON_HOURS {
                let severity = if hours < MAINTENANCE_CRITICAL_HOURS {
                    AlertSeverity::Critical
                } else if hours < MAINTENANCE_WARNING_HOURS {
                    AlertSeverity::Warning
                } else {
                    AlertSeverity::Info
                };
                raise(
                    severity,
                    AlertKind::MaintenanceDue,
                    format!("Maintenance due: failure predicted in {:.1} hours", hours),
                );
            }
        }

        alerts
    }

    pub fn log(&self) -> &AlertLog {
        &self.log
    }

    pub fn recent(&self, n: usize) -> Vec<Alert> {
        self.log.recent(n)
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl Default for AlertGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENT_THRESHOLD, DEFAULT_ALERT_LOG_CAPACITY)
    }
}
