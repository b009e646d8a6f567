//! Two-leg transfer search.
//!
//! Transfers are only offered when no single route connects the two
//! stops: direct routes take precedence outright. At most one transfer
//! is modelled.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::domain::RouteId;
use crate::index::TransitIndex;

use super::config::ResolverConfig;

/// One leg of a transfer itinerary.
#[derive(Debug, Clone)]
pub struct TransferLeg {
    pub route: RouteId,

    /// Lower-cased boarding stop name.
    pub from_stop: String,

    /// Lower-cased alighting stop name.
    pub to_stop: String,

    /// Hops travelled on this leg.
    pub stops: u32,

    /// Fixed-model leg time (minutes).
    pub estimated_time_minutes: f64,
}

/// A two-leg itinerary changing buses once at `transfer_point`.
#[derive(Debug, Clone)]
pub struct TransferRoute {
    pub first_leg: TransferLeg,
    pub second_leg: TransferLeg,

    /// Lower-cased name of the stop where the rider changes buses.
    pub transfer_point: String,

    /// Expected wait for the connecting bus (minutes).
    pub transfer_wait_minutes: f64,

    pub total_stops: u32,

    /// Leg times plus transfer wait (minutes).
    pub total_time_minutes: f64,

    /// Always 1: only single-transfer itineraries are modelled.
    pub num_transfers: u32,
}

/// Find two-leg itineraries from `source` to `destination`.
///
/// Returns empty when any direct route exists. Otherwise every
/// (source-route, destination-route) pair is examined in sorted order;
/// candidate transfer points are the stops the two routes share by
/// name, validated so that the first route reaches the transfer point
/// strictly after `source` and the second reaches `destination`
/// strictly after the transfer point. Itineraries are sorted ascending
/// by total time and capped at the configured maximum.
pub fn find_transfer_routes(
    index: &TransitIndex,
    config: &ResolverConfig,
    source: &str,
    destination: &str,
) -> Vec<TransferRoute> {
    let source_routes = index.routes_for_stop(source);
    let dest_routes = index.routes_for_stop(destination);

    if !source_routes.is_disjoint(&dest_routes) {
        // A shared route means a direct itinerary exists.
        return Vec::new();
    }

    let mut results = Vec::new();

    for source_route in &source_routes {
        let Some(source_stops) = index.stops_on_route(source_route) else {
            continue;
        };
        let source_names: BTreeSet<&str> =
            source_stops.iter().map(|rs| rs.stop.name.as_str()).collect();

        for dest_route in &dest_routes {
            let Some(dest_stops) = index.stops_on_route(dest_route) else {
                continue;
            };
            let dest_names: BTreeSet<&str> =
                dest_stops.iter().map(|rs| rs.stop.name.as_str()).collect();

            for transfer_point in source_names.intersection(&dest_names) {
                if let Some(itinerary) = build_transfer(
                    index,
                    config,
                    source,
                    destination,
                    source_route,
                    dest_route,
                    transfer_point,
                ) {
                    results.push(itinerary);
                }
            }
        }
    }

    results.sort_by(|a, b| {
        a.total_time_minutes
            .partial_cmp(&b.total_time_minutes)
            .unwrap_or(Ordering::Equal)
    });
    results.truncate(config.max_transfer_results);
    results
}

/// Validate direction on both legs and assemble the itinerary.
fn build_transfer(
    index: &TransitIndex,
    config: &ResolverConfig,
    source: &str,
    destination: &str,
    source_route: &RouteId,
    dest_route: &RouteId,
    transfer_point: &str,
) -> Option<TransferRoute> {
    let source_seq = index.stop_sequence_on_route(source_route, source)?;
    let transfer_seq_out = index.stop_sequence_on_route(source_route, transfer_point)?;
    if transfer_seq_out <= source_seq {
        return None;
    }

    let transfer_seq_in = index.stop_sequence_on_route(dest_route, transfer_point)?;
    let dest_seq = index.stop_sequence_on_route(dest_route, destination)?;
    if dest_seq <= transfer_seq_in {
        return None;
    }

    let first_stops = transfer_seq_out - source_seq;
    let second_stops = dest_seq - transfer_seq_in;

    let first_time = first_stops as f64 * config.leg_minutes_per_stop;
    let second_time = second_stops as f64 * config.leg_minutes_per_stop;

    Some(TransferRoute {
        first_leg: TransferLeg {
            route: source_route.clone(),
            from_stop: source.trim().to_lowercase(),
            to_stop: transfer_point.to_string(),
            stops: first_stops,
            estimated_time_minutes: first_time,
        },
        second_leg: TransferLeg {
            route: dest_route.clone(),
            from_stop: transfer_point.to_string(),
            to_stop: destination.trim().to_lowercase(),
            stops: second_stops,
            estimated_time_minutes: second_time,
        },
        transfer_point: transfer_point.to_string(),
        transfer_wait_minutes: config.transfer_wait_minutes,
        total_stops: first_stops + second_stops,
        total_time_minutes: first_time + second_time + config.transfer_wait_minutes,
        num_transfers: 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RouteStopRecord;

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

    /// Route 1: Source → X; route 2: X → Mid → Target. No shared route
    /// between Source and Target, so only a transfer at X works.
    fn transfer_index() -> TransitIndex {
        TransitIndex::build(
            &[
                rs("1", "S1", "Source Road", 1),
                rs("1", "S2", "Xchange", 2),
                rs("2", "S2", "Xchange", 1),
                rs("2", "S3", "Midpoint", 2),
                rs("2", "S4", "Target Colony", 3),
            ],
            &[],
        )
        .unwrap()
    }

    #[test]
    fn single_transfer_found() {
        let index = transfer_index();
        let config = ResolverConfig::default();

        let routes = find_transfer_routes(&index, &config, "Source Road", "Target Colony");
        assert_eq!(routes.len(), 1);

        let t = &routes[0];
        assert_eq!(t.num_transfers, 1);
        assert_eq!(t.transfer_point, "xchange");
        assert_eq!(t.first_leg.route.as_str(), "1");
        assert_eq!(t.second_leg.route.as_str(), "2");
        assert_eq!(t.first_leg.stops, 1);
        assert_eq!(t.second_leg.stops, 2);
        // 1*3 + 2*3 + 10 minutes wait.
        assert!((t.total_time_minutes - 19.0).abs() < 1e-9);
    }

    #[test]
    fn direct_route_suppresses_transfers() {
        // Route 9 serves both endpoints; transfers must not be offered.
        let index = TransitIndex::build(
            &[
                rs("9", "S1", "Source Road", 1),
                rs("9", "S4", "Target Colony", 2),
                rs("1", "S1", "Source Road", 1),
                rs("1", "S2", "Xchange", 2),
                rs("2", "S2", "Xchange", 1),
                rs("2", "S4", "Target Colony", 2),
            ],
            &[],
        )
        .unwrap();
        let config = ResolverConfig::default();

        let routes = find_transfer_routes(&index, &config, "Source Road", "Target Colony");
        assert!(routes.is_empty());
    }

    #[test]
    fn wrong_direction_first_leg_rejected() {
        // Transfer stop precedes the source on route 1.
        let index = TransitIndex::build(
            &[
                rs("1", "S2", "Xchange", 1),
                rs("1", "S1", "Source Road", 2),
                rs("2", "S2", "Xchange", 1),
                rs("2", "S4", "Target Colony", 2),
            ],
            &[],
        )
        .unwrap();
        let config = ResolverConfig::default();

        let routes = find_transfer_routes(&index, &config, "Source Road", "Target Colony");
        assert!(routes.is_empty());
    }

    #[test]
    fn wrong_direction_second_leg_rejected() {
        // Destination precedes the transfer stop on route 2.
        let index = TransitIndex::build(
            &[
                rs("1", "S1", "Source Road", 1),
                rs("1", "S2", "Xchange", 2),
                rs("2", "S4", "Target Colony", 1),
                rs("2", "S2", "Xchange", 2),
            ],
            &[],
        )
        .unwrap();
        let config = ResolverConfig::default();

        let routes = find_transfer_routes(&index, &config, "Source Road", "Target Colony");
        assert!(routes.is_empty());
    }

    #[test]
    fn capped_at_configured_maximum() {
        // Seven parallel connecting routes through distinct hubs; each
        // yields one itinerary, and only the five fastest survive.
        let mut records = vec![rs("1", "S1", "Source Road", 1)];
        for i in 0..7 {
            let hub_id = format!("H{i}");
            let hub_name = format!("Hub Number {i}");
            records.push(rs("1", &hub_id, &hub_name, 2 + i));
            let connecting = format!("5{i}");
            records.push(rs(&connecting, &hub_id, &hub_name, 1));
            records.push(rs(&connecting, "S9", "Target Colony", 2));
        }

        let index = TransitIndex::build(&records, &[]).unwrap();
        let config = ResolverConfig::default();

        let routes = find_transfer_routes(&index, &config, "Source Road", "Target Colony");
        assert_eq!(routes.len(), 5);
        for pair in routes.windows(2) {
            assert!(pair[0].total_time_minutes <= pair[1].total_time_minutes);
        }
    }
}
