//! Core domain types shared across the crate.

mod bus_id;
mod route_id;
mod stop;

pub use bus_id::BusId;
pub use route_id::{InvalidRouteId, RouteId};
pub use stop::Stop;
