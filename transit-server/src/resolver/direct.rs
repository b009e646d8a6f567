//! Direct single-route search.

use tracing::debug;

use crate::domain::{RouteId, Stop};
use crate::index::TransitIndex;
use crate::matcher;

use super::config::ResolverConfig;

/// A direct itinerary on a single route.
#[derive(Debug, Clone)]
pub struct DirectRoute {
    pub route: RouteId,

    /// The matched boarding stop.
    pub source_stop: Stop,

    /// The matched alighting stop.
    pub destination_stop: Stop,

    /// 0-based index of the boarding stop in the route's sequence.
    pub source_index: usize,

    /// 0-based index of the alighting stop; always `> source_index`.
    pub dest_index: usize,

    /// Number of stop-to-stop hops travelled.
    pub stops_between: u32,

    pub distance_km: f64,

    /// Closed-form travel time estimate (minutes).
    pub estimated_time_minutes: f64,

    /// Travel time used for ranking. Equals the closed-form estimate
    /// unless a predictor refined it.
    pub predicted_time_minutes: f64,
}

/// Congestion multiplier applied to the free-flow travel time.
///
/// Morning peak 8–10, evening peak 17–20, midday 11–16, night 21–23 and
/// 0–6; everything else (hour 7) is neutral.
pub fn traffic_multiplier(hour: u32) -> f64 {
    match hour {
        8..=10 => 1.5,
        17..=20 => 1.7,
        11..=16 => 1.2,
        21..=23 | 0..=6 => 0.9,
        _ => 1.0,
    }
}

/// Closed-form travel time: free-flow time scaled by congestion, plus a
/// fixed dwell per stop.
fn travel_time_minutes(
    config: &ResolverConfig,
    distance_km: f64,
    stops_between: u32,
    hour: u32,
) -> f64 {
    let base = (distance_km / config.avg_speed_kmh) * 60.0;
    base * traffic_multiplier(hour) + stops_between as f64 * config.stop_delay_minutes
}

/// Find every route that carries the rider directly from `source` to
/// `destination`, with `destination` reached strictly after `source`.
///
/// Each route's ordered stop list is scanned once. The boarding stop is
/// the *first* match for `source`; the alighting stop is the *last*
/// match for `destination` found after it (later matches keep winning
/// for the rest of the scan). The source-first/destination-last
/// asymmetry is deliberate, if odd: on routes that pass a named road
/// twice it boards at the first occurrence and rides to the farthest.
///
/// Results are sorted ascending by hop count.
pub fn find_direct_routes(
    index: &TransitIndex,
    config: &ResolverConfig,
    source: &str,
    destination: &str,
    hour: u32,
) -> Vec<DirectRoute> {
    let mut results = Vec::new();

    for (route, stops) in index.routes() {
        let mut source_idx: Option<usize> = None;
        let mut dest_idx: Option<usize> = None;

        for (idx, rs) in stops.iter().enumerate() {
            if source_idx.is_none() && matcher::matches(source, &rs.stop.name) {
                source_idx = Some(idx);
            }

            if matcher::matches(destination, &rs.stop.name) {
                if let Some(s) = source_idx {
                    if idx > s {
                        dest_idx = Some(idx);
                    }
                }
            }
        }

        let (Some(s), Some(d)) = (source_idx, dest_idx) else {
            continue;
        };
        debug_assert!(d > s);

        let stops_between = (d - s) as u32;
        let distance_km = index.segment_distance(route, s, d);
        let estimated = travel_time_minutes(config, distance_km, stops_between, hour);

        debug!(
            route = %route,
            stops_between,
            distance_km,
            "direct route candidate"
        );

        results.push(DirectRoute {
            route: route.clone(),
            source_stop: stops[s].stop.clone(),
            destination_stop: stops[d].stop.clone(),
            source_index: s,
            dest_index: d,
            stops_between,
            distance_km,
            estimated_time_minutes: estimated,
            predicted_time_minutes: estimated,
        });
    }

    // Stable: routes with equal hop counts keep sorted-route order.
    results.sort_by_key(|r| r.stops_between);
    results
}
