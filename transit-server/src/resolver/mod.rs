//! Route resolution: direct single-route itineraries, two-leg transfer
//! itineraries, and deterministic ranking.
//!
//! All searches scan routes and stop names in sorted order. The fuzzy
//! matcher makes "which stop did the user mean" ambiguous, so stable
//! iteration order is a correctness requirement here, not a nicety:
//! first-match-wins must give the same answer on every run.

mod config;
mod direct;
mod rank;
mod transfer;

pub use config::ResolverConfig;
pub use direct::{DirectRoute, find_direct_routes, traffic_multiplier};
pub use rank::{Rankable, Ranked, RouteLabel, rank_routes};
pub use transfer::{TransferLeg, TransferRoute, find_transfer_routes};
