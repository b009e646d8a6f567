//! Vehicle identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a simulated vehicle, e.g. `12_BUS_0`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BusId(String);

impl BusId {
    /// Create a bus id from an arbitrary string.
    pub fn new(s: impl Into<String>) -> Self {
        BusId(s.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BusId({})", self.0)
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
