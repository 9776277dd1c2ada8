//! Equipment Monitor - streaming telemetry health analysis service
//!
//! Owns a single analysis engine and exposes it over HTTP/JSON.

use anyhow::Result;
use equipment_monitor::{
    api,
    config::{LogFormat, MonitorConfig},
};
use monitor_lib::{HealthEngine, MonitorMetrics, StructuredLogger};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const MONITOR_VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = MonitorConfig::load()?;
    init_tracing(config.log_format);

    info!(
        equipment_id = %config.equipment_id,
        window_capacity = config.window_capacity,
        current_threshold = config.current_threshold,
        "Monitor configured"
    );

    let metrics = MonitorMetrics::new();
    let logger = StructuredLogger::new(&config.equipment_id);
    let engine = HealthEngine::new(config.to_engine_config());

    let app_state = Arc::new(api::AppState::new(engine, metrics));
    logger.log_startup(
        MONITOR_VERSION,
        config.api_port,
        config.prediction_mode.as_str(),
    );

    let shutdown_logger = logger.clone();
    let shutdown = async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_logger.log_shutdown("SIGINT received");
        }
    };

    api::serve(config.api_port, app_state, shutdown).await?;
    info!("Shutting down");

    Ok(())
}
