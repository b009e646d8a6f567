//! HTTP client for the remote prediction model.

use super::{FeatureVector, Prediction, Predictor, PredictorError};

/// Default request timeout. Predictions feed a live board; a slow
/// answer is worth less than the heuristic fallback.
const DEFAULT_TIMEOUT_SECS: u64 = 2;

/// Configuration for the remote predictor.
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    /// Endpoint receiving the feature vector as JSON.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl PredictorConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Remote travel-time model reached over HTTP.
///
/// POSTs the feature vector as JSON and expects a `Prediction` body
/// back. Callers are expected to fall back to the heuristic model on
/// any error.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    http: reqwest::Client,
    url: String,
}

impl HttpPredictor {
    pub fn new(config: PredictorConfig) -> Result<Self, PredictorError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }
}

impl Predictor for HttpPredictor {
    async fn predict(&self, features: &FeatureVector) -> Result<Prediction, PredictorError> {
        let response = self.http.post(&self.url).json(features).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictorError::BadStatus { status });
        }

        Ok(response.json().await?)
    }
}
