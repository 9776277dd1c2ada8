//! Error taxonomy for the analysis engine

/// Errors surfaced by [`crate::engine::HealthEngine`]
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Malformed request payload
    #[error("Bad input: {0}")]
    BadInput(String),

    /// Statistics requested before any sample was ingested
    #[error("No data available")]
    NoData,

    /// Outlier model could not be fitted or could not score a sample
    #[error("Model failure: {0}")]
    ModelFailure(String),

    #[error("{0}")]
    Unhandled(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
