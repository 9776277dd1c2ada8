//! Core data models for the health monitor

use serde::{Deserialize, Serialize};

/// Nominal supply voltage of the monitored equipment
pub const DEFAULT_VOLTAGE: f64 = 5.0;

/// Ambient temperature assumed when a reading omits it
pub const DEFAULT_TEMPERATURE: f64 = 25.0;

/// A single telemetry reading as stored in the rolling window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub current: f64,
    pub voltage: f64,
    pub temperature: f64,
    /// Epoch milliseconds
    pub timestamp: f64,
}

impl Sample {
    pub fn new(current: f64, voltage: f64, temperature: f64, timestamp: f64) -> Self {
        Self {
            current,
            voltage,
            temperature,
            timestamp,
        }
    }

    /// Feature vector used by the outlier model
    pub fn features(&self) -> [f64; 3] {
        [self.current, self.voltage, self.temperature]
    }
}

/// Caller-provided reading; any field may be missing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl SampleInput {
    /// Fill in defaults, stamping the reading with the current time if needed
    pub fn into_sample(self) -> Sample {
        Sample {
            current: self.current.unwrap_or(0.0),
            voltage: self.voltage.unwrap_or(DEFAULT_VOLTAGE),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            timestamp: self
                .timestamp
                .unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as f64),
        }
    }
}

impl From<Sample> for SampleInput {
    fn from(sample: Sample) -> Self {
        Self {
            current: Some(sample.current),
            voltage: Some(sample.voltage),
            temperature: Some(sample.temperature),
            timestamp: Some(sample.timestamp),
        }
    }
}

/// Time-to-failure estimate attached to every analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FailurePrediction {
    pub hours_to_failure: Option<f64>,
    pub confidence: f64,
}

/// Full assessment returned for one ingested sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub health_score: f64,
    pub is_anomaly: bool,
    pub anomaly_score: f64,
    pub trend: f64,
    pub failure_prediction: FailurePrediction,
    pub alerts: Vec<crate::anomaly::Alert>,
    pub data_points_analyzed: usize,
}

/// Descriptive statistics for one telemetry field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStatistics {
    pub current: FieldStats,
    pub voltage: FieldStats,
    pub temperature: FieldStats,
}

/// Statistics over the most recent part of the rolling window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub data_points: usize,
    pub statistics: FieldStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_get_defaults() {
        let sample = SampleInput {
            timestamp: Some(1_000.0),
            ..Default::default()
        }
        .into_sample();

        assert_eq!(sample.current, 0.0);
        assert_eq!(sample.voltage, DEFAULT_VOLTAGE);
        assert_eq!(sample.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(sample.timestamp, 1_000.0);
    }

    #[test]
    fn test_missing_timestamp_uses_now() {
        let before = chrono::Utc::now().timestamp_millis() as f64;
        let sample = SampleInput::default().into_sample();
        assert!(sample.timestamp >= before);
    }

    #[test]
    fn test_input_deserializes_from_partial_json() {
        let input: SampleInput = serde_json::from_str(r#"{"current": 1.5}"#).unwrap();
        assert_eq!(input.current, Some(1.5));
        assert!(input.voltage.is_none());
    }
}
