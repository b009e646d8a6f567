//! Offline heuristic travel-time model.

use super::{FeatureVector, Prediction, Predictor, PredictorError};

/// Assumed bus speed by hour (km/h): crawling in the peaks, quick at
/// night, moderate otherwise.
fn assumed_speed_kmh(hour: u32) -> f64 {
    match hour {
        7..=10 | 17..=20 => 12.0,
        22..=23 | 0..=5 => 25.0,
        _ => 18.0,
    }
}

/// Speed-table travel-time model.
///
/// Distance over an hour-dependent assumed speed, plus a per-stop dwell,
/// scaled by the live weather and traffic factors. Used when no remote
/// model is configured and as the fallback when the remote call fails.
#[derive(Debug, Clone, Default)]
pub struct HeuristicPredictor;

impl HeuristicPredictor {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core, shared with the fallback path.
    pub fn estimate(&self, features: &FeatureVector) -> f64 {
        let speed = assumed_speed_kmh(features.hour_of_day);
        let travel = (features.distance_estimate / speed) * 60.0;
        let dwell = features.stops_away as f64 * 1.5;
        (travel + dwell) * features.weather_factor * features.traffic_factor
    }
}

impl Predictor for HeuristicPredictor {
    async fn predict(&self, features: &FeatureVector) -> Result<Prediction, PredictorError> {
        Ok(Prediction {
            minutes: self.estimate(features),
            confidence_hint: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(hour: u32, weather: f64) -> FeatureVector {
        FeatureVector {
            stops_away: 3,
            distance_estimate: 3.6,
            hour_of_day: hour,
            day_of_week: 2,
            peak_flag: (7..=10).contains(&hour) || (17..=20).contains(&hour),
            weekend_flag: false,
            weather_factor: weather,
            traffic_factor: 1.0,
            historical_avg: 9.0,
            recent_delay: 0.0,
        }
    }

    #[test]
    fn peak_slower_than_midday_slower_than_night() {
        let p = HeuristicPredictor::new();
        let peak = p.estimate(&features(8, 1.0));
        let midday = p.estimate(&features(13, 1.0));
        let night = p.estimate(&features(23, 1.0));
        assert!(peak > midday);
        assert!(midday > night);
    }

    #[test]
    fn worse_weather_never_shortens_the_estimate() {
        // Clear ≤ cloudy ≤ rain ≤ heavy rain at a fixed hour.
        let p = HeuristicPredictor::new();
        let mut last = 0.0;
        for factor in [1.0, 1.05, 1.3, 1.8] {
            let est = p.estimate(&features(13, factor));
            assert!(est >= last);
            last = est;
        }
    }

    #[test]
    fn estimate_matches_closed_form() {
        // 3.6 km at 18 km/h is 12 minutes, plus 3 * 1.5 dwell = 16.5.
        let p = HeuristicPredictor::new();
        let est = p.estimate(&features(13, 1.0));
        assert!((est - 16.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn predict_reports_no_confidence_hint() {
        let p = HeuristicPredictor::new();
        let prediction = p.predict(&features(13, 1.0)).await.unwrap();
        assert!(prediction.confidence_hint.is_none());
        assert!(prediction.minutes > 0.0);
    }
}
