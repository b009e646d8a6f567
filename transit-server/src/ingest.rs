//! Readers for the normalized CSV datasets produced by the offline ETL
//! pipeline.
//!
//! No cleaning happens here: deduplication, name resolution and
//! reverse geocoding are the ETL's job. These readers only parse the
//! already-normalized `route_stop_ordered.csv` / `route_edges.csv`
//! shaped files into record structs.

use std::path::Path;

use crate::index::{EdgeRecord, RouteStopRecord};

/// Error reading or parsing a normalized dataset file.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The file could not be opened or a row failed to parse.
    #[error("failed to read {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

fn csv_err(path: &Path, source: csv::Error) -> IngestError {
    IngestError::Csv {
        path: path.display().to_string(),
        source,
    }
}

/// Read the ordered route-stop dataset.
pub fn read_route_stops(path: impl AsRef<Path>) -> Result<Vec<RouteStopRecord>, IngestError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_err(path, e))?;
    reader
        .deserialize()
        .map(|row| row.map_err(|e| csv_err(path, e)))
        .collect()
}

/// Read the measured edge-distance dataset.
pub fn read_edges(path: impl AsRef<Path>) -> Result<Vec<EdgeRecord>, IngestError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_err(path, e))?;
    reader
        .deserialize()
        .map(|row| row.map_err(|e| csv_err(path, e)))
        .collect()
}
