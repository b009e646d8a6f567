//! Arrival-time prediction.
//!
//! The simulation engine builds a [`FeatureVector`] per tracked bus and
//! asks a [`Predictor`] for a travel-time estimate. Production wires in
//! the remote model via [`HttpPredictor`]; [`HeuristicPredictor`] is
//! both the offline default and the fallback when the remote call
//! fails.

mod client;
mod heuristic;

pub use client::{HttpPredictor, PredictorConfig};
pub use heuristic::HeuristicPredictor;

use serde::Serialize;

/// Inputs to an arrival-time prediction.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureVector {
    /// Stops between the bus and the rider's stop.
    pub stops_away: u32,

    /// Rough distance to the rider's stop (km).
    pub distance_estimate: f64,

    pub hour_of_day: u32,

    /// Monday = 0.
    pub day_of_week: u32,

    pub peak_flag: bool,
    pub weekend_flag: bool,

    /// Weather slowdown multiplier, 1.0 = clear.
    pub weather_factor: f64,

    /// Congestion multiplier, 1.0 = normal.
    pub traffic_factor: f64,

    /// Historical average travel time for this hop count (minutes).
    pub historical_avg: f64,

    /// The bus's current schedule deviation (minutes).
    pub recent_delay: f64,
}

/// A predicted travel time.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Prediction {
    pub minutes: f64,

    /// Model-reported confidence, if the backend provides one.
    #[serde(default)]
    pub confidence_hint: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error("prediction request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("prediction backend rejected the request: {status}")]
    BadStatus { status: reqwest::StatusCode },
}

/// A travel-time model.
pub trait Predictor: Send + Sync {
    fn predict(
        &self,
        features: &FeatureVector,
    ) -> impl std::future::Future<Output = Result<Prediction, PredictorError>> + Send;
}
