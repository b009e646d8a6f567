use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transit_server::geometry::{CachedGeometry, GeometryCacheConfig, OsrmClient, OsrmConfig};
use transit_server::index::TransitIndex;
use transit_server::ingest::{read_edges, read_route_stops};
use transit_server::predictor::{
    FeatureVector, HeuristicPredictor, HttpPredictor, Prediction, Predictor, PredictorConfig,
    PredictorError,
};
use transit_server::resolver::ResolverConfig;
use transit_server::service::TransitService;
use transit_server::sim::{LiveFleetRegistry, SimConfig};

/// Simulation heartbeat; 0.02 progress per tick gives a ~2.5 minute
/// inter-stop journey at this cadence.
const TICK_INTERVAL: Duration = Duration::from_secs(3);

/// Travel-time model selected at startup.
enum ModelBackend {
    Remote(HttpPredictor),
    Local(HeuristicPredictor),
}

impl Predictor for ModelBackend {
    async fn predict(&self, features: &FeatureVector) -> Result<Prediction, PredictorError> {
        match self {
            ModelBackend::Remote(p) => p.predict(features).await,
            ModelBackend::Local(p) => p.predict(features).await,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_dir = std::env::var("TRANSIT_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let data_dir = PathBuf::from(data_dir);

    let route_stops = read_route_stops(data_dir.join("route_stop_ordered.csv"))
        .expect("Failed to read route-stop dataset");
    // Measured edges are optional; the index falls back to corrected
    // straight-line distances for missing pairs.
    let edges = match read_edges(data_dir.join("route_edges.csv")) {
        Ok(edges) => edges,
        Err(e) => {
            warn!(%e, "edge dataset unavailable, using haversine fallback");
            Vec::new()
        }
    };

    let index =
        Arc::new(TransitIndex::build(&route_stops, &edges).expect("Failed to build transit index"));
    info!(
        routes = index.total_routes(),
        stops = index.total_stops(),
        "transit index built"
    );

    let osrm = OsrmClient::new(OsrmConfig::default()).expect("Failed to create OSRM client");
    let geometry = CachedGeometry::new(osrm, &GeometryCacheConfig::default());

    let predictor = match std::env::var("PREDICTOR_URL") {
        Ok(url) => {
            info!(%url, "using remote travel-time model");
            ModelBackend::Remote(
                HttpPredictor::new(PredictorConfig::new(url))
                    .expect("Failed to create predictor client"),
            )
        }
        Err(_) => ModelBackend::Local(HeuristicPredictor::new()),
    };

    let seed = std::env::var("SIM_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random::<u64>);

    let fleet = Arc::new(LiveFleetRegistry::new(
        Arc::clone(&index),
        geometry,
        predictor,
        SimConfig::default(),
        seed,
    ));
    fleet.spawn_initial_fleet(Utc::now()).await;

    let service = TransitService::new(index, ResolverConfig::default(), fleet);
    info!(
        buses = service.fleet_snapshot().await.len(),
        seed, "fleet simulation running"
    );

    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        interval.tick().await;
        service.tick(Utc::now()).await;
    }
}
