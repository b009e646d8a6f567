//! The application facade: one handle bundling the static network
//! index, the journey resolver, and the live fleet.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{BusId, RouteId, Stop};
use crate::geo::LatLng;
use crate::geometry::RoadGeometryProvider;
use crate::index::{Suggestion, TransitIndex};
use crate::predictor::Predictor;
use crate::resolver::{
    DirectRoute, Rankable, Ranked, ResolverConfig, TransferRoute, find_direct_routes,
    find_transfer_routes, rank_routes,
};
use crate::sim::{FleetError, IncomingBus, LiveBus, LiveFleetRegistry};

/// A planned journey: either a single ride or one change of bus.
#[derive(Debug, Clone)]
pub enum Itinerary {
    Direct(DirectRoute),
    Transfer(TransferRoute),
}

impl Rankable for Itinerary {
    fn is_direct(&self) -> bool {
        matches!(self, Itinerary::Direct(_))
    }

    fn predicted_minutes(&self) -> f64 {
        match self {
            Itinerary::Direct(d) => d.predicted_minutes(),
            Itinerary::Transfer(t) => t.predicted_minutes(),
        }
    }

    fn stops_between(&self) -> u32 {
        match self {
            Itinerary::Direct(d) => d.stops_between(),
            Itinerary::Transfer(t) => t.stops_between(),
        }
    }

    fn distance_km(&self) -> f64 {
        match self {
            Itinerary::Direct(d) => d.distance_km(),
            Itinerary::Transfer(t) => t.distance_km(),
        }
    }
}

/// Shared application state.
///
/// Cheap to clone; every field is behind an `Arc`.
pub struct TransitService<G, P> {
    index: Arc<TransitIndex>,
    resolver_config: Arc<ResolverConfig>,
    fleet: Arc<LiveFleetRegistry<G, P>>,
}

impl<G, P> Clone for TransitService<G, P> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            resolver_config: Arc::clone(&self.resolver_config),
            fleet: Arc::clone(&self.fleet),
        }
    }
}

impl<G: RoadGeometryProvider, P: Predictor> TransitService<G, P> {
    pub fn new(
        index: Arc<TransitIndex>,
        resolver_config: ResolverConfig,
        fleet: Arc<LiveFleetRegistry<G, P>>,
    ) -> Self {
        Self {
            index,
            resolver_config: Arc::new(resolver_config),
            fleet,
        }
    }

    pub fn index(&self) -> &TransitIndex {
        &self.index
    }

    pub fn fleet(&self) -> &LiveFleetRegistry<G, P> {
        &self.fleet
    }

    /// Resolve a free-text stop query to its canonical stop.
    pub fn match_stop(&self, query: &str) -> Option<Stop> {
        self.index.find_stop(query).cloned()
    }

    /// Autocomplete suggestions for a partial stop name.
    pub fn suggestions(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        self.index.suggestions(query, limit)
    }

    /// The stop closest to a coordinate, with its distance in km.
    pub fn nearest_stop(&self, position: &LatLng) -> Option<(Stop, f64)> {
        self.index
            .nearest_stop(position)
            .map(|(stop, dist)| (stop.clone(), dist))
    }

    pub fn find_direct_routes(
        &self,
        source: &str,
        destination: &str,
        hour: u32,
    ) -> Vec<DirectRoute> {
        find_direct_routes(&self.index, &self.resolver_config, source, destination, hour)
    }

    pub fn find_transfer_routes(&self, source: &str, destination: &str) -> Vec<TransferRoute> {
        find_transfer_routes(&self.index, &self.resolver_config, source, destination)
    }

    /// Plan a journey: direct routes when any exist, transfer
    /// itineraries otherwise, ranked and labelled.
    pub fn plan_journey(
        &self,
        source: &str,
        destination: &str,
        hour: u32,
    ) -> Vec<Ranked<Itinerary>> {
        let direct = self.find_direct_routes(source, destination, hour);
        let itineraries: Vec<Itinerary> = if direct.is_empty() {
            self.find_transfer_routes(source, destination)
                .into_iter()
                .map(Itinerary::Transfer)
                .collect()
        } else {
            direct.into_iter().map(Itinerary::Direct).collect()
        };
        rank_routes(itineraries)
    }

    pub async fn tick(&self, now: DateTime<Utc>) {
        self.fleet.tick(now).await;
    }

    pub async fn update_position(
        &self,
        bus_id: &BusId,
        stop_id: &str,
        timestamp: DateTime<Utc>,
        ticket_count: u32,
    ) {
        self.fleet
            .update_position(bus_id, stop_id, timestamp, ticket_count)
            .await;
    }

    pub async fn predict_eta(
        &self,
        route: &RouteId,
        target_stop: &str,
        user_stop: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<IncomingBus>, FleetError> {
        self.fleet
            .predict_eta(route, target_stop, user_stop, now)
            .await
    }

    pub async fn incoming_at_stop(&self, stop: &str, now: DateTime<Utc>) -> Vec<IncomingBus> {
        self.fleet.incoming_at_stop(stop, now).await
    }

    pub async fn set_weather(&self, condition: &str) {
        self.fleet.set_weather(condition).await;
    }

    pub async fn set_traffic(&self, condition: &str) {
        self.fleet.set_traffic(condition).await;
    }

    pub async fn fleet_snapshot(&self) -> Vec<LiveBus> {
        self.fleet.fleet_snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLng;
    use crate::geometry::{CachedGeometry, GeometryCacheConfig, GeometryError};
    use crate::index::RouteStopRecord;
    use crate::predictor::HeuristicPredictor;
    use crate::resolver::RouteLabel;
    use crate::sim::SimConfig;

    struct StraightProvider;

    impl RoadGeometryProvider for StraightProvider {
        async fn polyline(&self, from: LatLng, to: LatLng) -> Result<Vec<LatLng>, GeometryError> {
            Ok(vec![from, to])
        }
    }

    fn rs(route: &str, id: &str, name: &str, seq: u32) -> RouteStopRecord {
        RouteStopRecord {
            route_number: route.to_string(),
            stop_id: id.to_string(),
            stop_name: name.to_string(),
            stop_sequence: seq,
            latitude: 13.0,
            longitude: 80.2,
        }
    }

    fn service() -> TransitService<StraightProvider, HeuristicPredictor> {
        let index = Arc::new(
            TransitIndex::build(
                &[
                    rs("12", "S1", "Alpha", 1),
                    rs("12", "S2", "Beta", 2),
                    rs("12", "S3", "Gamma", 3),
                    rs("2", "S3", "Gamma", 1),
                    rs("2", "S4", "Delta", 2),
                ],
                &[],
            )
            .unwrap(),
        );
        let fleet = Arc::new(LiveFleetRegistry::new(
            Arc::clone(&index),
            CachedGeometry::new(StraightProvider, &GeometryCacheConfig::default()),
            HeuristicPredictor::new(),
            SimConfig::default(),
            1,
        ));
        TransitService::new(index, ResolverConfig::default(), fleet)
    }

    #[test]
    fn plan_journey_prefers_direct() {
        let svc = service();
        let plans = svc.plan_journey("Alpha", "Gamma", 12);

        assert!(!plans.is_empty());
        assert!(matches!(plans[0].item, Itinerary::Direct(_)));
        assert!(plans[0].labels.contains(&RouteLabel::BestRoute));
    }

    #[test]
    fn plan_journey_falls_back_to_transfers() {
        // Alpha and Delta share no route; the transfer at Gamma wins.
        let svc = service();
        let plans = svc.plan_journey("Alpha", "Delta", 12);

        assert_eq!(plans.len(), 1);
        match &plans[0].item {
            Itinerary::Transfer(t) => assert_eq!(t.transfer_point, "gamma"),
            Itinerary::Direct(_) => panic!("expected a transfer itinerary"),
        }
    }

    #[test]
    fn match_stop_resolves_fuzzily() {
        let svc = service();
        assert_eq!(svc.match_stop("  GAMMA ").unwrap().id, "S3");
        assert!(svc.match_stop("zzz").is_none());
    }

    #[test]
    fn nearest_stop_breaks_ties_by_name() {
        // Every fixture stop shares one coordinate, so the first name
        // in sorted order wins.
        let svc = service();
        let (stop, dist) = svc.nearest_stop(&LatLng::new(13.0, 80.2)).unwrap();
        assert_eq!(stop.name, "alpha");
        assert!(dist < 1e-6);
    }
}
