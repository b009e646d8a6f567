//! Normalized input records, as produced by the offline ETL pipeline.

use serde::Deserialize;

/// One row of the ordered route-stop dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteStopRecord {
    /// Route number, as spelled in the dataset.
    pub route_number: String,

    /// Dataset stop id.
    pub stop_id: String,

    /// Stop name (possibly suffix-tagged; see [`crate::matcher`]).
    pub stop_name: String,

    /// Declared position of the stop along the route. May carry gaps or
    /// duplicates; the index re-sequences deterministically at build.
    pub stop_sequence: u32,

    pub latitude: f64,
    pub longitude: f64,
}

/// One row of the measured road-distance edge dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRecord {
    /// Route number, as spelled in the dataset.
    pub route_number: String,

    /// Stop id the edge leaves from.
    pub from_stop: String,

    /// Stop id the edge arrives at. Directed: `from_stop` precedes
    /// `to_stop` in route order.
    pub to_stop: String,

    /// Measured road distance in kilometres.
    pub distance_km: f64,
}
