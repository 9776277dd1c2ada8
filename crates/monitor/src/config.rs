//! Service configuration

use anyhow::{Context, Result};
use monitor_lib::{
    anomaly::{DetectorConfig, ForestConfig},
    engine::DEFAULT_EQUIPMENT_ID,
    predictor::PredictionMode,
    EngineConfig,
};
use serde::Deserialize;

/// Log output format of the service binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Monitor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Identifier attached to every structured log event
    #[serde(default = "default_equipment_id")]
    pub equipment_id: String,

    /// HTTP port for the analysis API and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,

    #[serde(default = "default_alert_log_capacity")]
    pub alert_log_capacity: usize,

    /// Overcurrent threshold in amperes (2.4 reproduces the first generation)
    #[serde(default = "default_current_threshold")]
    pub current_threshold: f64,

    #[serde(default)]
    pub prediction_mode: PredictionMode,

    /// Seed for failure-prediction jitter; random when unset
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// Seed for isolation forest construction
    #[serde(default = "default_detector_seed")]
    pub detector_seed: u64,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_equipment_id() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| DEFAULT_EQUIPMENT_ID.to_string())
}

fn default_api_port() -> u16 {
    5000
}

fn default_window_capacity() -> usize {
    monitor_lib::window::DEFAULT_WINDOW_CAPACITY
}

fn default_alert_log_capacity() -> usize {
    monitor_lib::anomaly::DEFAULT_ALERT_LOG_CAPACITY
}

fn default_current_threshold() -> f64 {
    monitor_lib::scoring::DEFAULT_CURRENT_THRESHOLD
}

fn default_detector_seed() -> u64 {
    ForestConfig::default().seed
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            equipment_id: default_equipment_id(),
            api_port: default_api_port(),
            window_capacity: default_window_capacity(),
            alert_log_capacity: default_alert_log_capacity(),
            current_threshold: default_current_threshold(),
            prediction_mode: PredictionMode::default(),
            rng_seed: None,
            detector_seed: default_detector_seed(),
            log_format: LogFormat::default(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from an optional `monitor.*` file and `MONITOR_*` env vars
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("monitor").required(false))
            .add_source(config::Environment::with_prefix("MONITOR").try_parsing(true))
            .build()
            .context("failed to read monitor configuration")?;

        config
            .try_deserialize()
            .context("invalid monitor configuration")
    }

    /// Engine parameters derived from this configuration
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            window_capacity: self.window_capacity,
            alert_log_capacity: self.alert_log_capacity,
            current_threshold: self.current_threshold,
            prediction_mode: self.prediction_mode,
            rng_seed: self.rng_seed,
            detector: DetectorConfig {
                forest: ForestConfig {
                    seed: self.detector_seed,
                    ..ForestConfig::default()
                },
                ..DetectorConfig::default()
            },
            equipment_id: self.equipment_id.clone(),
        }
    }
}
