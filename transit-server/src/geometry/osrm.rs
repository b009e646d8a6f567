//! OSRM routing client.

use serde::Deserialize;

use crate::geo::LatLng;

use super::{GeometryError, RoadGeometryProvider};

const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Routing requests sit on the simulation tick path, so the budget is
/// tight.
const DEFAULT_TIMEOUT_SECS: u64 = 2;

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OsrmConfig {
    /// Set a custom base URL (for testing or a self-hosted instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OSRM `route` endpoint response, trimmed to the fields we read.
#[derive(Debug, Deserialize)]
struct OsrmResponse {
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

/// GeoJSON LineString: coordinates are [longitude, latitude] pairs.
#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Client for the OSRM driving profile.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, GeometryError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }
}

impl RoadGeometryProvider for OsrmClient {
    async fn polyline(&self, from: LatLng, to: LatLng) -> Result<Vec<LatLng>, GeometryError> {
        // OSRM coordinates go longitude-first.
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, from.lng, from.lat, to.lng, to.lat
        );

        let response = self
            .http
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeometryError::BadStatus { status });
        }

        let body: OsrmResponse = response.json().await?;
        let route = body.routes.first().ok_or(GeometryError::EmptyGeometry)?;
        if route.geometry.coordinates.is_empty() {
            return Err(GeometryError::EmptyGeometry);
        }

        Ok(route
            .geometry
            .coordinates
            .iter()
            .map(|[lng, lat]| LatLng {
                lat: *lat,
                lng: *lng,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_geojson_pairs_lng_first() {
        let body = r#"{
            "routes": [
                {"geometry": {"coordinates": [[80.24, 13.06], [80.25, 13.07]]}}
            ]
        }"#;

        let parsed: OsrmResponse = serde_json::from_str(body).unwrap();
        let coords = &parsed.routes[0].geometry.coordinates;
        assert_eq!(coords.len(), 2);
        // Longitude first in GeoJSON.
        assert!((coords[0][0] - 80.24).abs() < 1e-9);
        assert!((coords[0][1] - 13.06).abs() < 1e-9);
    }

    #[test]
    fn empty_routes_parse_but_yield_no_geometry() {
        let parsed: OsrmResponse = serde_json::from_str(r#"{"routes": []}"#).unwrap();
        assert!(parsed.routes.is_empty());
    }
}
