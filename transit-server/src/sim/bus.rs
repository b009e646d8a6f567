//! Live bus state.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::{BusId, RouteId};
use crate::geo::LatLng;

/// Rider-facing classification of a bus's schedule deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayStatus {
    Early,
    OnTime,
    SlightlyDelayed,
    Delayed,
    HeavilyDelayed,
}

impl DelayStatus {
    /// Classify a delay in minutes. Boundaries: −1, 2, 5, 10.
    pub fn classify(delay_minutes: f64) -> Self {
        if delay_minutes < -1.0 {
            DelayStatus::Early
        } else if delay_minutes < 2.0 {
            DelayStatus::OnTime
        } else if delay_minutes < 5.0 {
            DelayStatus::SlightlyDelayed
        } else if delay_minutes < 10.0 {
            DelayStatus::Delayed
        } else {
            DelayStatus::HeavilyDelayed
        }
    }
}

impl fmt::Display for DelayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DelayStatus::Early => "Early",
            DelayStatus::OnTime => "On Time",
            DelayStatus::SlightlyDelayed => "Slightly Delayed",
            DelayStatus::Delayed => "Delayed",
            DelayStatus::HeavilyDelayed => "Heavily Delayed",
        };
        f.write_str(s)
    }
}

/// One simulated bus.
///
/// In production this state would be driven by ticket-machine events;
/// the simulation drives it with the tick loop instead.
#[derive(Debug, Clone)]
pub struct LiveBus {
    pub id: BusId,
    pub route: RouteId,

    /// 0-based index into the route's ordered stop list.
    pub current_stop_index: usize,

    /// Fraction of the way to the next stop, in [0, 1).
    pub progress_to_next: f64,

    /// Interpolated map position.
    pub position: LatLng,

    /// Schedule deviation in minutes; negative means early.
    pub delay_minutes: f64,

    pub passengers: u32,

    /// When this bus last reached a stop or reported a ticket event.
    pub last_update_time: DateTime<Utc>,
}

impl LiveBus {
    pub fn delay_status(&self) -> DelayStatus {
        DelayStatus::classify(self.delay_minutes)
    }
}
