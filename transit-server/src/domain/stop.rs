//! Bus stop type.

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

/// A bus stop as recorded in the dataset.
///
/// Stop names are *not* unique: the upstream data carries duplicated and
/// suffix-tagged spellings (`Anna Salai (12.9810N)`, `LIC #2`). Names are
/// stored lower-cased by the index; fuzzy comparison lives in
/// [`crate::matcher`]. Stops are created once at index build time and
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Dataset stop id, unique across the network.
    pub id: String,

    /// Stop name, lower-cased at index build time.
    pub name: String,

    /// Stop coordinates.
    pub position: LatLng,
}

impl Stop {
    /// Create a stop, lower-casing and trimming the name.
    pub fn new(id: impl Into<String>, name: &str, position: LatLng) -> Self {
        Self {
            id: id.into(),
            name: name.trim().to_lowercase(),
            position,
        }
    }
}
