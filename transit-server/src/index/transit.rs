//! The static transit index: per-route ordered stop sequences, the
//! stop → routes map, and the directed edge-distance graph.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::domain::{RouteId, Stop};
use crate::geo::{self, LatLng, ROAD_FACTOR};
use crate::matcher;

use super::records::{EdgeRecord, RouteStopRecord};

/// Error raised when the ingested records are contradictory.
///
/// Fatal to startup: a broken route ordering would silently corrupt
/// every downstream distance and direction computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestionError {
    /// A route number in the dataset failed to parse.
    #[error("unparseable route number {raw:?}")]
    InvalidRoute { raw: String },

    /// The same stop appears twice on one route after re-sequencing.
    #[error("stop {stop_id} appears more than once on route {route}")]
    DuplicateStop { route: RouteId, stop_id: String },
}

/// A stop together with its (re-sequenced) position on a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    pub stop: Stop,

    /// 1-based sequence number, contiguous per route after build.
    pub sequence: u32,
}

/// An autocomplete suggestion: a stop plus the routes serving it.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub stop: Stop,
    pub routes: Vec<RouteId>,
}

/// How many routes a suggestion lists at most.
const MAX_SUGGESTION_ROUTES: usize = 5;

/// Static, read-only index over the transit network.
///
/// Internal maps are `BTreeMap`s so that every "scan candidates in
/// order" operation has a documented, stable iteration order. The fuzzy
/// resolvers in this crate rely on first-match-wins semantics, which
/// must never depend on incidental hash ordering.
#[derive(Debug, Default)]
pub struct TransitIndex {
    /// Ordered stop sequence per route.
    routes: BTreeMap<RouteId, Vec<RouteStop>>,

    /// Lower-cased stop name (and stop id) → routes serving it.
    stop_to_routes: BTreeMap<String, BTreeSet<RouteId>>,

    /// One representative stop per lower-cased name, for point lookups.
    stops_by_name: BTreeMap<String, Stop>,

    /// Measured road distance per directed (route, from id, to id) edge.
    edges: HashMap<(RouteId, String, String), f64>,

    /// Count of distinct stop ids across all routes.
    total_stops: usize,
}

impl TransitIndex {
    /// Build the index from normalized route-stop and edge records.
    ///
    /// Sequencing policy: per route, rows are stably sorted by their
    /// declared sequence number (original file order breaks ties) and
    /// renumbered 1..n. Gaps and duplicated sequence numbers are thus
    /// closed rather than rejected. A stop id appearing twice on one
    /// route is a real contradiction and fails the build.
    pub fn build(
        route_stops: &[RouteStopRecord],
        edge_records: &[EdgeRecord],
    ) -> Result<Self, IngestionError> {
        let mut grouped: BTreeMap<RouteId, Vec<&RouteStopRecord>> = BTreeMap::new();
        for record in route_stops {
            let route =
                RouteId::parse(&record.route_number).map_err(|_| IngestionError::InvalidRoute {
                    raw: record.route_number.clone(),
                })?;
            grouped.entry(route).or_default().push(record);
        }

        let mut index = TransitIndex::default();
        let mut all_stop_ids: HashSet<String> = HashSet::new();

        for (route, mut rows) in grouped {
            // Stable: ties keep original file order.
            rows.sort_by_key(|r| r.stop_sequence);

            let mut seen_ids: HashSet<&str> = HashSet::new();
            let mut ordered = Vec::with_capacity(rows.len());

            for (i, row) in rows.iter().enumerate() {
                if !seen_ids.insert(row.stop_id.as_str()) {
                    return Err(IngestionError::DuplicateStop {
                        route: route.clone(),
                        stop_id: row.stop_id.clone(),
                    });
                }

                let stop = Stop::new(
                    row.stop_id.clone(),
                    &row.stop_name,
                    LatLng::new(row.latitude, row.longitude),
                );

                index
                    .stop_to_routes
                    .entry(stop.name.clone())
                    .or_default()
                    .insert(route.clone());
                index
                    .stop_to_routes
                    .entry(stop.id.to_lowercase())
                    .or_default()
                    .insert(route.clone());
                index
                    .stops_by_name
                    .entry(stop.name.clone())
                    .or_insert_with(|| stop.clone());
                all_stop_ids.insert(stop.id.clone());

                ordered.push(RouteStop {
                    stop,
                    sequence: (i + 1) as u32,
                });
            }

            index.routes.insert(route, ordered);
        }

        for edge in edge_records {
            let route = RouteId::parse(&edge.route_number).map_err(|_| {
                IngestionError::InvalidRoute {
                    raw: edge.route_number.clone(),
                }
            })?;
            index.edges.insert(
                (route, edge.from_stop.to_lowercase(), edge.to_stop.to_lowercase()),
                edge.distance_km,
            );
        }

        index.total_stops = all_stop_ids.len();
        Ok(index)
    }

    /// Routes serving a stop, resolved fuzzily.
    ///
    /// An exact key hit (lower-cased name or stop id) wins outright;
    /// otherwise the union of routes over every key the matcher accepts,
    /// scanning keys in sorted order.
    pub fn routes_for_stop(&self, query: &str) -> BTreeSet<RouteId> {
        let key = query.trim().to_lowercase();

        if let Some(routes) = self.stop_to_routes.get(&key) {
            return routes.clone();
        }

        let mut union = BTreeSet::new();
        for (name, routes) in &self.stop_to_routes {
            if matcher::matches(&key, name) {
                union.extend(routes.iter().cloned());
            }
        }
        union
    }

    /// The ordered stop sequence of a route, if the route exists.
    pub fn stops_on_route(&self, route: &RouteId) -> Option<&[RouteStop]> {
        self.routes.get(route).map(|v| v.as_slice())
    }

    /// Iterate all routes in sorted order.
    pub fn routes(&self) -> impl Iterator<Item = (&RouteId, &[RouteStop])> {
        self.routes.iter().map(|(r, s)| (r, s.as_slice()))
    }

    /// Road distance along a route between two 0-based stop indices.
    ///
    /// Sums the measured edge for each consecutive pair; pairs without a
    /// measured edge fall back to the haversine estimate corrected by
    /// [`ROAD_FACTOR`]. Returns 0.0 when the range is empty or reversed.
    pub fn segment_distance(&self, route: &RouteId, from_idx: usize, to_idx: usize) -> f64 {
        let Some(stops) = self.routes.get(route) else {
            return 0.0;
        };
        if from_idx >= to_idx || to_idx >= stops.len() {
            return 0.0;
        }

        let mut total = 0.0;
        for pair in stops[from_idx..=to_idx].windows(2) {
            let (a, b) = (&pair[0].stop, &pair[1].stop);
            let key = (route.clone(), a.id.to_lowercase(), b.id.to_lowercase());
            total += match self.edges.get(&key) {
                Some(km) => *km,
                None => geo::haversine_km(&a.position, &b.position) * ROAD_FACTOR,
            };
        }
        total
    }

    /// The 1-based sequence number of the first stop on `route` whose
    /// name the matcher accepts for `query`.
    pub fn stop_sequence_on_route(&self, route: &RouteId, query: &str) -> Option<u32> {
        self.routes.get(route)?.iter().find_map(|rs| {
            matcher::matches(query, &rs.stop.name).then_some(rs.sequence)
        })
    }

    /// Resolve a free-text query to a stop.
    ///
    /// Exact name hit first, then the first fuzzy match scanning names
    /// in sorted order, deterministic across runs by construction.
    pub fn find_stop(&self, query: &str) -> Option<&Stop> {
        let key = query.trim().to_lowercase();

        if let Some(stop) = self.stops_by_name.get(&key) {
            return Some(stop);
        }

        self.stops_by_name
            .iter()
            .find(|(name, _)| matcher::matches(&key, name))
            .map(|(_, stop)| stop)
    }

    /// The stop closest to a coordinate, with its great-circle distance
    /// in kilometres.
    ///
    /// Names are scanned in sorted order and the comparison is strict,
    /// so equidistant stops resolve to the first name.
    pub fn nearest_stop(&self, position: &LatLng) -> Option<(&Stop, f64)> {
        let mut best: Option<(&Stop, f64)> = None;
        for stop in self.stops_by_name.values() {
            let dist = geo::haversine_km(position, &stop.position);
            if best.as_ref().is_none_or(|(_, d)| dist < *d) {
                best = Some((stop, dist));
            }
        }
        best
    }

    /// Autocomplete suggestions: stops whose name contains the query,
    /// ordered by how many routes serve them (busier stops first), then
    /// by name.
    pub fn suggestions(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<Suggestion> = self
            .stops_by_name
            .iter()
            .filter(|(name, _)| name.contains(&needle))
            .map(|(name, stop)| {
                let routes: Vec<RouteId> = self
                    .stop_to_routes
                    .get(name)
                    .map(|set| set.iter().take(MAX_SUGGESTION_ROUTES).cloned().collect())
                    .unwrap_or_default();
                Suggestion {
                    stop: stop.clone(),
                    routes,
                }
            })
            .collect();

        hits.sort_by(|a, b| {
            b.routes
                .len()
                .cmp(&a.routes.len())
                .then_with(|| a.stop.name.cmp(&b.stop.name))
        });
        hits.truncate(limit);
        hits
    }

    /// Number of distinct stops in the network.
    pub fn total_stops(&self) -> usize {
        self.total_stops
    }

    /// Number of routes in the network.
    pub fn total_routes(&self) -> usize {
        self.routes.len()
    }
}
