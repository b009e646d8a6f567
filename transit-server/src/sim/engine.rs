//! The live fleet registry: bus spawning, movement ticks, ticket-event
//! ingestion, and arrival prediction.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::domain::{BusId, RouteId};
use crate::geo::interpolate_along;
use crate::geometry::{CachedGeometry, RoadGeometryProvider};
use crate::index::TransitIndex;
use crate::predictor::{FeatureVector, HeuristicPredictor, Predictor};

use super::bus::{DelayStatus, LiveBus};
use super::conditions::{Conditions, Traffic, Weather, congestion_factor};

/// Tunable simulation parameters.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Progress added per tick; 0.02 per 3-second tick gives a smooth
    /// ~2.5 minute journey between stops.
    pub progress_increment: f64,

    /// Expected time between consecutive ticket reports (minutes); the
    /// baseline against which reported delays are measured.
    pub expected_interstop_minutes: f64,

    /// Maximum predictions returned per route.
    pub max_eta_results: usize,

    /// Maximum entries on the all-routes arrival board for a stop.
    pub max_board_results: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            progress_increment: 0.02,
            expected_interstop_minutes: 3.0,
            max_eta_results: 5,
            max_board_results: 10,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    #[error("stop '{stop}' not found on route {route}")]
    StopNotOnRoute { route: RouteId, stop: String },
}

/// A ticket-machine report retained for model retraining.
#[derive(Debug, Clone)]
pub struct TicketEvent {
    pub bus_id: BusId,
    pub stop_id: String,
    pub timestamp: DateTime<Utc>,
    pub delay_minutes: f64,
}

/// One predicted arrival at the rider's stop.
#[derive(Debug, Clone)]
pub struct IncomingBus {
    pub bus_id: BusId,
    pub route: RouteId,

    /// Name of the stop the bus is currently at or has just left.
    pub current_location: String,

    pub stops_away: u32,
    pub eta_minutes: f64,
    pub arrival_time: DateTime<Utc>,
    pub delay_status: DelayStatus,
    pub passengers: u32,

    /// Prediction confidence in [0.5, 0.98].
    pub confidence: f64,
}

/// Registry of simulated live buses.
///
/// `tick` and `update_position` are the only mutators. Network results
/// (road polylines, predictions) are always fetched with no lock held;
/// the write lock is taken only to apply in-memory state changes.
pub struct LiveFleetRegistry<G, P> {
    index: Arc<TransitIndex>,
    geometry: CachedGeometry<G>,
    predictor: P,
    fallback: HeuristicPredictor,
    config: SimConfig,
    /// Ordered so that tick-time RNG draws hit buses in a stable order;
    /// equal seeds must replay equal trajectories.
    buses: RwLock<BTreeMap<BusId, LiveBus>>,
    conditions: RwLock<Conditions>,
    rng: Mutex<ChaCha8Rng>,
    ticket_history: Mutex<Vec<TicketEvent>>,
}

impl<G: RoadGeometryProvider, P: Predictor> LiveFleetRegistry<G, P> {
    /// Create an empty registry. The RNG seed fixes every random draw
    /// the simulation makes, so equal seeds give equal trajectories.
    pub fn new(
        index: Arc<TransitIndex>,
        geometry: CachedGeometry<G>,
        predictor: P,
        config: SimConfig,
        seed: u64,
    ) -> Self {
        Self {
            index,
            geometry,
            predictor,
            fallback: HeuristicPredictor::new(),
            config,
            buses: RwLock::new(BTreeMap::new()),
            conditions: RwLock::new(Conditions::default()),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            ticket_history: Mutex::new(Vec::new()),
        }
    }

    /// Seed 2–3 buses on every route with at least 3 stops, at a random
    /// position with a random delay and load.
    pub async fn spawn_initial_fleet(&self, now: DateTime<Utc>) {
        let mut rng = self.rng.lock().await;
        let mut buses = self.buses.write().await;

        for (route, stops) in self.index.routes() {
            if stops.len() < 3 {
                continue;
            }

            let count = rng.gen_range(2..=3);
            for n in 0..count {
                let start = rng.gen_range(0..stops.len() - 1);
                let bus = LiveBus {
                    id: BusId::new(format!("{route}_BUS_{n}")),
                    route: route.clone(),
                    current_stop_index: start,
                    progress_to_next: 0.0,
                    position: stops[start].stop.position,
                    delay_minutes: rng.gen_range(-2.0..5.0),
                    passengers: rng.gen_range(10..=50),
                    last_update_time: now,
                };
                buses.insert(bus.id.clone(), bus);
            }
        }

        debug!(count = buses.len(), "spawned initial fleet");
    }

    /// Add or replace a single bus. Real deployments feed positions in
    /// from the ticket-machine gateway rather than the spawner.
    pub async fn register_bus(&self, bus: LiveBus) {
        self.buses.write().await.insert(bus.id.clone(), bus);
    }

    /// Advance every bus by one tick.
    ///
    /// A bus accumulates progress toward its next stop; on reaching it
    /// the bus snaps to the stop's coordinates and its delay and load
    /// drift by bounded random amounts. Between stops the position is
    /// interpolated along the cached road polyline. Buses at the
    /// terminus hold position.
    pub async fn tick(&self, now: DateTime<Utc>) {
        // Phase 1: under the read lock, note which buses will stay in
        // transit this tick and the endpoints they travel between.
        let mut wanted = Vec::new();
        {
            let buses = self.buses.read().await;
            for bus in buses.values() {
                let Some(stops) = self.index.stops_on_route(&bus.route) else {
                    continue;
                };
                let idx = bus.current_stop_index;
                if idx + 1 >= stops.len() {
                    continue;
                }
                if bus.progress_to_next + self.config.progress_increment < 1.0 {
                    wanted.push((
                        bus.id.clone(),
                        stops[idx].stop.position,
                        stops[idx + 1].stop.position,
                    ));
                }
            }
        }

        // Phase 2: fetch polylines with no lock held. Repeat segments
        // hit the cache, so this is cheap after warm-up.
        let mut paths = HashMap::new();
        for (id, from, to) in wanted {
            let path = self.geometry.path_between(from, to).await;
            paths.insert(id, path);
        }

        // Phase 3: apply.
        let mut rng = self.rng.lock().await;
        let mut buses = self.buses.write().await;
        for bus in buses.values_mut() {
            let Some(stops) = self.index.stops_on_route(&bus.route) else {
                continue;
            };
            if bus.current_stop_index + 1 >= stops.len() {
                continue;
            }

            bus.progress_to_next += self.config.progress_increment;

            if bus.progress_to_next >= 1.0 {
                bus.current_stop_index += 1;
                bus.progress_to_next = 0.0;
                bus.position = stops[bus.current_stop_index].stop.position;
                bus.last_update_time = now;

                bus.delay_minutes += rng.gen_range(-1.0..1.0);
                let delta: i64 = rng.gen_range(-5..=10);
                bus.passengers = (bus.passengers as i64 + delta).max(0) as u32;
            } else if let Some(path) = paths.get(&bus.id) {
                if let Some(position) = interpolate_along(path, bus.progress_to_next) {
                    bus.position = position;
                }
            }
        }
    }

    /// Ingest a ticket-machine report for a bus.
    ///
    /// The reported time is compared against the expected inter-stop
    /// interval and folded into the bus's delay as a running average.
    /// Reports for unknown buses are dropped with a debug log.
    pub async fn update_position(
        &self,
        bus_id: &BusId,
        stop_id: &str,
        timestamp: DateTime<Utc>,
        ticket_count: u32,
    ) {
        let actual_delay;
        {
            let mut buses = self.buses.write().await;
            let Some(bus) = buses.get_mut(bus_id) else {
                debug!(%bus_id, "position report for unknown bus");
                return;
            };

            let expected = bus.last_update_time
                + Duration::seconds((self.config.expected_interstop_minutes * 60.0) as i64);
            actual_delay = (timestamp - expected).num_seconds() as f64 / 60.0;

            bus.last_update_time = timestamp;
            bus.delay_minutes = (bus.delay_minutes + actual_delay) / 2.0;
            bus.passengers += ticket_count;
        }

        self.ticket_history.lock().await.push(TicketEvent {
            bus_id: bus_id.clone(),
            stop_id: stop_id.to_string(),
            timestamp,
            delay_minutes: actual_delay,
        });
    }

    /// Predict arrivals at `user_stop` for buses on `route` heading
    /// toward it. `_target_stop` is carried for API symmetry with the
    /// journey flow; direction filtering uses the user stop alone.
    pub async fn predict_eta(
        &self,
        route: &RouteId,
        _target_stop: &str,
        user_stop: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<IncomingBus>, FleetError> {
        let user_seq = self
            .index
            .stop_sequence_on_route(route, user_stop)
            .ok_or_else(|| FleetError::StopNotOnRoute {
                route: route.clone(),
                stop: user_stop.to_string(),
            })?;

        let hour = now.hour();
        let weekday = now.weekday().num_days_from_monday();
        let weekend = weekday >= 5;
        let peak = (7..=10).contains(&hour) || (17..=20).contains(&hour);

        let conditions = *self.conditions.read().await;
        let weather_factor = conditions.weather.factor();
        let traffic_factor = congestion_factor(hour, weekend);

        // Snapshot approaching buses; predictor calls happen lock-free.
        let candidates: Vec<LiveBus> = {
            let buses = self.buses.read().await;
            buses
                .values()
                .filter(|b| &b.route == route && (b.current_stop_index as u32) < user_seq)
                .cloned()
                .collect()
        };

        let mut incoming = Vec::with_capacity(candidates.len());
        for bus in candidates {
            let stops_away = user_seq - bus.current_stop_index as u32;

            let features = FeatureVector {
                stops_away,
                distance_estimate: stops_away as f64 * 1.2,
                hour_of_day: hour,
                day_of_week: weekday,
                peak_flag: peak,
                weekend_flag: weekend,
                weather_factor,
                traffic_factor,
                historical_avg: stops_away as f64 * 3.0,
                recent_delay: bus.delay_minutes,
            };

            let predicted = match self.predictor.predict(&features).await {
                Ok(p) => p.minutes,
                Err(err) => {
                    debug!(%err, bus = %bus.id, "predictor failed, using heuristic");
                    self.fallback.estimate(&features)
                }
            };

            let eta_minutes = (predicted + bus.delay_minutes).max(1.0);
            let confidence = (0.95 - stops_away as f64 * 0.03 - bus.delay_minutes.abs() * 0.02)
                .clamp(0.5, 0.98);

            let current_location = self
                .index
                .stops_on_route(route)
                .and_then(|stops| stops.get(bus.current_stop_index))
                .map(|rs| rs.stop.name.clone())
                .unwrap_or_default();

            incoming.push(IncomingBus {
                bus_id: bus.id.clone(),
                route: route.clone(),
                current_location,
                stops_away,
                eta_minutes,
                arrival_time: now + Duration::seconds((eta_minutes * 60.0) as i64),
                delay_status: bus.delay_status(),
                passengers: bus.passengers,
                confidence,
            });
        }

        incoming.sort_by(|a, b| {
            a.eta_minutes
                .partial_cmp(&b.eta_minutes)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        incoming.truncate(self.config.max_eta_results);
        Ok(incoming)
    }

    /// Arrival board for a stop: predictions aggregated over every
    /// route serving it, nearest first.
    pub async fn incoming_at_stop(&self, stop: &str, now: DateTime<Utc>) -> Vec<IncomingBus> {
        let mut all = Vec::new();

        for route in self.index.routes_for_stop(stop) {
            // Fuzzy route membership can outrun sequence resolution;
            // skip routes where the stop does not pin down a sequence.
            if let Ok(incoming) = self.predict_eta(&route, stop, stop, now).await {
                all.extend(incoming);
            }
        }

        all.sort_by(|a, b| {
            a.eta_minutes
                .partial_cmp(&b.eta_minutes)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        all.truncate(self.config.max_board_results);
        all
    }

    /// Set the weather condition. Unknown values are ignored.
    pub async fn set_weather(&self, condition: &str) {
        match Weather::parse(condition) {
            Some(weather) => self.conditions.write().await.weather = weather,
            None => debug!(condition, "ignoring unknown weather condition"),
        }
    }

    /// Set the reported traffic condition. Unknown values are ignored.
    pub async fn set_traffic(&self, condition: &str) {
        match Traffic::parse(condition) {
            Some(traffic) => self.conditions.write().await.traffic = traffic,
            None => debug!(condition, "ignoring unknown traffic condition"),
        }
    }

    /// Current simulation conditions.
    pub async fn conditions(&self) -> Conditions {
        *self.conditions.read().await
    }

    /// Snapshot of every live bus, sorted by id.
    pub async fn fleet_snapshot(&self) -> Vec<LiveBus> {
        self.buses.read().await.values().cloned().collect()
    }

    /// Number of retained ticket events.
    pub async fn ticket_history_len(&self) -> usize {
        self.ticket_history.lock().await.len()
    }
}
