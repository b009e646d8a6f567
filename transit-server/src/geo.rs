//! Geographic primitives: coordinates, great-circle distance, and
//! polyline interpolation.

use serde::{Deserialize, Serialize};

/// Earth's mean radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Correction factor applied to straight-line distances when a measured
/// road edge is missing from the dataset. Roads are not straight lines.
pub const ROAD_FACTOR: f64 = 1.3;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Create a coordinate pair.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation towards `other` by fraction `t` in [0, 1].
    pub fn lerp(&self, other: &LatLng, t: f64) -> LatLng {
        LatLng {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }
}

/// Great-circle distance between two coordinates in kilometres.
pub fn haversine_km(a: &LatLng, b: &LatLng) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Position along a polyline at fractional `progress` in [0, 1].
///
/// Progress is proportional to vertex count, not to segment length; this
/// matches how the road-geometry provider densifies its polylines. A path
/// with fewer than two points yields its sole point (or `None` if empty).
pub fn interpolate_along(path: &[LatLng], progress: f64) -> Option<LatLng> {
    match path {
        [] => None,
        [only] => Some(*only),
        _ => {
            let progress = progress.clamp(0.0, 1.0);
            let scaled = progress * (path.len() - 1) as f64;
            let lower = scaled.floor() as usize;
            let upper = (lower + 1).min(path.len() - 1);
            let remainder = scaled - lower as f64;
            Some(path[lower].lerp(&path[upper], remainder))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_for_same_point() {
        let p = LatLng::new(13.06, 80.24);
        assert!(haversine_km(&p, &p) < 1e-9);
    }

    #[test]
    fn haversine_known_distance() {
        // One degree of latitude is ~111 km.
        let a = LatLng::new(13.0, 80.0);
        let b = LatLng::new(14.0, 80.0);
        let d = haversine_km(&a, &b);
        assert!((d - 111.2).abs() < 1.0, "got {d}");
    }

    #[test]
    fn haversine_symmetric() {
        let a = LatLng::new(13.06, 80.24);
        let b = LatLng::new(13.08, 80.27);
        assert!((haversine_km(&a, &b) - haversine_km(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn interpolate_empty_path() {
        assert!(interpolate_along(&[], 0.5).is_none());
    }

    #[test]
    fn interpolate_single_point() {
        let p = LatLng::new(1.0, 2.0);
        assert_eq!(interpolate_along(&[p], 0.7), Some(p));
    }

    #[test]
    fn interpolate_endpoints() {
        let path = [LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)];
        assert_eq!(interpolate_along(&path, 0.0), Some(path[0]));
        assert_eq!(interpolate_along(&path, 1.0), Some(path[1]));
    }

    #[test]
    fn interpolate_midpoint_of_two_segment_path() {
        let path = [
            LatLng::new(0.0, 0.0),
            LatLng::new(1.0, 0.0),
            LatLng::new(1.0, 1.0),
        ];
        // progress 0.5 lands exactly on the middle vertex
        assert_eq!(interpolate_along(&path, 0.5), Some(path[1]));
        // progress 0.25 is halfway along the first segment
        let p = interpolate_along(&path, 0.25).unwrap();
        assert!((p.lat - 0.5).abs() < 1e-12);
        assert!((p.lng - 0.0).abs() < 1e-12);
    }

    #[test]
    fn interpolate_clamps_out_of_range_progress() {
        let path = [LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)];
        assert_eq!(interpolate_along(&path, -0.5), Some(path[0]));
        assert_eq!(interpolate_along(&path, 1.5), Some(path[1]));
    }
}
