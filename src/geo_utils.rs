//! # Geographic Utilities
//!
//! Distance and centroid helpers used by the sequence engine.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance_meters`] | Great-circle distance between two coordinates |
//! | [`centroid`] | Arithmetic mean of a set of coordinates |
//!
//! ## Example
//!
//! ```rust
//! use officer_leaderboard::{Coordinate, geo_utils};
//!
//! let beat = vec![
//!     Coordinate::new(51.5074, -0.1278),
//!     Coordinate::new(51.5080, -0.1290),
//! ];
//!
//! let step = geo_utils::haversine_distance_meters(&beat[0], &beat[1]);
//! println!("Step: {:.0}m", step);
//!
//! let center = geo_utils::centroid(&beat);
//! println!("Center: {:.4}, {:.4}", center.lat, center.lon);
//! ```
//!
//! ## Algorithm Notes
//!
//! Distances use the haversine formula on a sphere of radius 6,371,000 m, not `geo`'s
//! mean Earth radius. The 150 m continuity boundary is defined against this exact radius.

use crate::Coordinate;

/// Sphere radius used for all distance calculations, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// =============================================================================
// Distance Functions
// =============================================================================

/// Calculate the great-circle distance between two coordinates using the Haversine formula.
///
/// Returns the distance in meters. Always finite and non-negative for finite inputs;
/// NaN or out-of-range coordinates are a caller error.
///
/// # Example
///
/// ```rust
/// use officer_leaderboard::{Coordinate, geo_utils};
///
/// let london = Coordinate::new(51.5074, -0.1278);
/// let paris = Coordinate::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance_meters(&london, &paris);
/// assert!((distance - 343_500.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let sin_lat = (d_lat / 2.0).sin();
    let sin_lon = (d_lon / 2.0).sin();

    let h = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lon * sin_lon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

// =============================================================================
// Center/Centroid Functions
// =============================================================================

/// Compute the centroid of a set of coordinates.
///
/// Returns the arithmetic mean of all latitude and longitude values. Returns (0, 0)
/// for empty input.
///
/// # Notes
///
/// Patrol sequences span a few hundred meters at most, so plain averaging is accurate.
/// Sets crossing the antimeridian would need a spherical centroid instead.
///
/// # Example
///
/// ```rust
/// use officer_leaderboard::{Coordinate, geo_utils};
///
/// let points = vec![
///     Coordinate::new(51.50, -0.10),
///     Coordinate::new(51.52, -0.12),
/// ];
///
/// let center = geo_utils::centroid(&points);
/// assert!((center.lat - 51.51).abs() < 0.001);
/// assert!((center.lon - (-0.11)).abs() < 0.001);
/// ```
pub fn centroid(points: &[Coordinate]) -> Coordinate {
    if points.is_empty() {
        return Coordinate::new(0.0, 0.0);
    }

    let sum_lat: f64 = points.iter().map(|p| p.lat).sum();
    let sum_lon: f64 = points.iter().map(|p| p.lon).sum();
    let n = points.len() as f64;

    Coordinate::new(sum_lat / n, sum_lon / n)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_haversine_distance_same_point() {
        let p = Coordinate::new(51.5074, -0.1278);
        assert_eq!(haversine_distance_meters(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_distance_known_value() {
        // London to Paris is approximately 344 km
        let london = Coordinate::new(51.5074, -0.1278);
        let paris = Coordinate::new(48.8566, 2.3522);
        let dist = haversine_distance_meters(&london, &paris);
        assert!(approx_eq(dist, 343_500.0, 5000.0));
    }

    #[test]
    fn test_haversine_distance_symmetric() {
        let a = Coordinate::new(51.5, -0.12);
        let b = Coordinate::new(51.501, -0.121);
        assert_eq!(haversine_distance_meters(&a, &b), haversine_distance_meters(&b, &a));
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        // One degree along a meridian is R * pi / 180
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let expected = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        assert!(approx_eq(haversine_distance_meters(&a, &b), expected, 1e-6));
    }

    #[test]
    fn test_centroid() {
        let points = vec![
            Coordinate::new(51.50, -0.10),
            Coordinate::new(51.52, -0.12),
        ];
        let center = centroid(&points);
        assert!(approx_eq(center.lat, 51.51, 0.001));
        assert!(approx_eq(center.lon, -0.11, 0.001));
    }

    #[test]
    fn test_centroid_empty() {
        let center = centroid(&[]);
        assert_eq!(center, Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn test_centroid_single_point() {
        let p = Coordinate::new(51.5074, -0.1278);
        assert_eq!(centroid(&[p]), p);
    }

    #[test]
    fn test_centroid_order_independent() {
        let a = Coordinate::new(1.0, 2.0);
        let b = Coordinate::new(3.0, 4.0);
        let c = Coordinate::new(5.0, 6.0);
        assert_eq!(centroid(&[a, b, c]), centroid(&[c, a, b]));
    }
}
