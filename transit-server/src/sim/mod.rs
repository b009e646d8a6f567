//! Live fleet simulation.
//!
//! Stands in for the ticket-machine feed: buses are spawned onto the
//! network, moved by a periodic tick, and queried for predicted
//! arrivals. All randomness flows through one seeded RNG so a given
//! seed replays the same trajectory.

mod bus;
mod conditions;
mod engine;

pub use bus::{DelayStatus, LiveBus};
pub use conditions::{Conditions, Traffic, Weather, congestion_factor};
pub use engine::{FleetError, IncomingBus, LiveFleetRegistry, SimConfig, TicketEvent};
