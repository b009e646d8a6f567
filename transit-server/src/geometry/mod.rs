//! Road geometry between stops.
//!
//! The simulation interpolates bus positions along road polylines. The
//! polylines come from an OSRM instance via [`OsrmClient`], always
//! wrapped in [`CachedGeometry`] so a slow or down routing server never
//! stalls a tick.

mod cache;
mod osrm;

pub use cache::{CachedGeometry, GeometryCacheConfig};
pub use osrm::{OsrmClient, OsrmConfig};

use crate::geo::LatLng;

#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing backend rejected the request: {status}")]
    BadStatus { status: reqwest::StatusCode },

    #[error("routing response had no usable geometry")]
    EmptyGeometry,
}

/// A source of road polylines between two points.
pub trait RoadGeometryProvider: Send + Sync {
    fn polyline(
        &self,
        from: LatLng,
        to: LatLng,
    ) -> impl std::future::Future<Output = Result<Vec<LatLng>, GeometryError>> + Send;
}
