//! Health trend and time-to-failure prediction

mod failure;
mod trend;

pub use failure::{
    FailurePredictor, HealthTier, PredictionMode, CURRENT_ELEVATED, MAX_HOURS_TO_FAILURE,
    MIN_HOURS_TO_FAILURE, PREDICTION_CONFIDENCE,
};
pub use trend::{linear_regression_slope, window_trend, TREND_WINDOW};
