//! HTTP API for telemetry analysis, alerts, statistics and Prometheus metrics

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use monitor_lib::{
    anomaly::{Alert, RECENT_ALERTS_LIMIT},
    stats::DEFAULT_STATS_LIMIT,
    AnalysisResult, EngineError, HealthEngine, MonitorMetrics, SampleInput, WindowStats,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<HealthEngine>>,
    pub metrics: MonitorMetrics,
}

impl AppState {
    pub fn new(engine: HealthEngine, metrics: MonitorMetrics) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            metrics,
        }
    }
}

/// Handler error rendered as `{"error": message}`
#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EngineError::NoData => StatusCode::NOT_FOUND,
            EngineError::BadInput(_) => StatusCode::BAD_REQUEST,
            EngineError::ModelFailure(_) | EngineError::Unhandled(_) => {
                error!(error = %self.0, "Analysis failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let engine = state.engine.lock().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_ready: engine.model_ready(),
    })
}

/// Parse an optional JSON body; an empty body means every field defaults
fn parse_sample(body: &[u8]) -> Result<SampleInput, EngineError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SampleInput::default());
    }
    serde_json::from_slice(body).map_err(|e| EngineError::BadInput(e.to_string()))
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<AnalysisResult>> {
    let input = parse_sample(&body).map_err(|e| {
        state.metrics.inc_analysis_errors();
        e
    })?;
    let mut engine = state.engine.lock().await;
    let result = engine.analyze(input)?;
    Ok(Json(result))
}

async fn alerts(State(state): State<Arc<AppState>>) -> Json<AlertsResponse> {
    let engine = state.engine.lock().await;
    Json(AlertsResponse {
        alerts: engine.recent_alerts(RECENT_ALERTS_LIMIT),
    })
}

async fn stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<WindowStats>> {
    let engine = state.engine.lock().await;
    Ok(Json(engine.stats(DEFAULT_STATS_LIMIT)?))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/alerts", get(alerts))
        .route("/stats", get(stats))
        .route("/metrics", get(metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server, stopping when `shutdown` resolves
pub async fn serve(
    port: u16,
    state: Arc<AppState>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
