//! Searchable indices over the route/stop/edge dataset.
//!
//! Built once at startup from the normalized records the offline ETL
//! produces, then read-only: concurrent readers need no synchronisation.

mod records;
mod transit;

pub use records::{EdgeRecord, RouteStopRecord};
pub use transit::{IngestionError, RouteStop, Suggestion, TransitIndex};
