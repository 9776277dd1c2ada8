//! Equipment health analysis library
//!
//! This crate provides the core functionality for:
//! - Rolling storage of telemetry samples
//! - Outlier detection with a periodically retrained isolation forest
//! - Health scoring, trend estimation and failure prediction
//! - Alert generation and window statistics
//! - Metrics and structured logging

pub mod anomaly;
pub mod engine;
pub mod error;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod scoring;
pub mod stats;
pub mod window;

pub use engine::{EngineConfig, HealthEngine};
pub use error::{EngineError, Result};
pub use models::*;
pub use observability::{MonitorMetrics, StructuredLogger};
