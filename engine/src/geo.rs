//! Great-circle distance on a spherical Earth.
//!
//! GPS fixes arrive as decimal-degree coordinate pairs; everything the
//! engine decides about them (duplicate visits, accuracy warnings) is in
//! terms of metres between two fixes.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres, as used by the haversine approximation.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Distance in metres to another coordinate pair.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        haversine(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Haversine distance in metres between two decimal-degree coordinates.
///
/// Pure and total: NaN inputs propagate NaN rather than producing a
/// defined failure.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine(51.5074, -0.1278, 51.5074, -0.1278), 0.0);
    }

    #[test]
    fn symmetric() {
        let ab = haversine(51.5074, -0.1278, 53.4808, -2.2426);
        let ba = haversine(53.4808, -2.2426, 51.5074, -0.1278);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn london_to_manchester() {
        // Trafalgar Square to Manchester city centre, roughly 262 km.
        let d = haversine(51.5074, -0.1278, 53.4808, -2.2426);
        assert!((d - 262_000.0).abs() < 2_000.0, "got {d}");
    }

    #[test]
    fn small_offset_is_small() {
        // ~10m north of the origin point.
        let d = haversine(51.5074, -0.1278, 51.50749, -0.1278);
        assert!(d > 5.0 && d < 15.0, "got {d}");
    }

    #[test]
    fn nan_propagates() {
        assert!(haversine(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }

    #[test]
    fn coordinates_distance_matches_free_fn() {
        let a = Coordinates::new(51.5074, -0.1278);
        let b = Coordinates::new(55.9533, -3.1883);
        assert_eq!(
            a.distance_to(&b),
            haversine(51.5074, -0.1278, 55.9533, -3.1883)
        );
    }
}
