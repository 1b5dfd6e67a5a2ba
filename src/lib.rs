//! # Officer Leaderboard
//!
//! Patrol sequence inference and anonymised leaderboards for geolocated parking tickets.
//!
//! This library provides:
//! - Great-circle distance and centroid helpers for WGS84 coordinates
//! - A single-pass sequence engine that groups tickets into inferred patrol runs
//! - Secret-keyed SHA-256 fingerprints for stable, privacy-preserving tie-breaks
//! - Ranked "Parking Officer N" leaderboards and a per-street leaderboard
//!
//! ## Features
//!
//! - **`serde`** - Serialize/Deserialize derives on all public data types
//! - **`parallel`** - Enable parallel decoration with rayon
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use officer_leaderboard::{build_sequences, decorate_sequences, Coordinate, TicketPoint};
//!
//! let at = |minute| Utc.with_ymd_and_hms(2024, 1, 1, 9, minute, 0).unwrap();
//! let points = vec![
//!     TicketPoint::new("t-1", "Camden", at(0), Coordinate::new(51.5, -0.12)),
//!     TicketPoint::new("t-2", "Camden", at(5), Coordinate::new(51.5, -0.12)),
//!     TicketPoint::new("t-3", "Camden", at(40), Coordinate::new(51.5, -0.12)),
//! ];
//!
//! let sequences = build_sequences(&points);
//! assert_eq!(sequences.len(), 2); // 35 minute gap starts a new run
//!
//! let board = decorate_sequences(&sequences, "local-daily-secret");
//! assert_eq!(board[0].label, "Parking Officer 1");
//! assert_eq!(board[0].sequence.tickets, 2);
//! ```

use chrono::{DateTime, Utc};

pub mod error;
pub use error::LeaderboardError;

pub mod geo_utils;
pub use geo_utils::{centroid, haversine_distance_meters};

// Bounding boxes for query filtering
pub mod bounds;
pub use bounds::{Bbox, MAX_BBOX_AREA_DEG2};

// Sequence construction, fingerprinting and ranking
pub mod sequences;
pub use sequences::{
    DecoratedOfficerSequence, OfficerSequence, SequenceConfig,
    DISTANCE_THRESHOLD_M, TIME_THRESHOLD_MS,
    build_sequences, build_sequences_with_config, decorate_sequences, sequence_hash,
    validate_points,
};

#[cfg(feature = "parallel")]
pub use sequences::decorate_sequences_parallel;

pub mod leaderboard;
pub use leaderboard::{
    LeaderboardQuery, OfficerLeaderboardRow, StreetLeaderboardRow,
    filter_and_order, officer_leaderboard, street_leaderboard,
};

pub mod config;
pub use config::LeaderboardOptions;

// ============================================================================
// Core Types
// ============================================================================

/// A WGS84 coordinate in decimal degrees.
///
/// # Example
/// ```
/// use officer_leaderboard::Coordinate;
/// let point = Coordinate::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check if the coordinate is finite and within lat/lon range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lon >= -180.0
            && self.lon <= 180.0
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.lon, c.lat)
    }
}

/// A single observed parking ticket.
///
/// Estimates are in pence. A missing estimate counts as zero wherever
/// estimates are summed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TicketPoint {
    /// Opaque unique identifier
    pub id: String,
    /// Administrative area, used for grouping
    pub borough: String,
    pub issued_at: DateTime<Utc>,
    /// Lower bound of the estimated penalty
    pub est_min_p: Option<i64>,
    /// Upper bound of the estimated penalty
    pub est_max_p: Option<i64>,
    pub coordinate: Coordinate,
    /// Street name, only used by the street leaderboard
    #[cfg_attr(feature = "serde", serde(default))]
    pub street: Option<String>,
}

impl TicketPoint {
    /// Create a ticket with no estimates and no street.
    pub fn new(
        id: impl Into<String>,
        borough: impl Into<String>,
        issued_at: DateTime<Utc>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            id: id.into(),
            borough: borough.into(),
            issued_at,
            est_min_p: None,
            est_max_p: None,
            coordinate,
            street: None,
        }
    }

    /// Set the estimated penalty range.
    pub fn with_estimates(mut self, est_min_p: Option<i64>, est_max_p: Option<i64>) -> Self {
        self.est_min_p = est_min_p;
        self.est_max_p = est_max_p;
        self
    }

    /// Set the street the ticket was issued on.
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(51.5074, -0.1278).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_coordinate_into_geo_point() {
        let point: geo::Point<f64> = Coordinate::new(51.5, -0.12).into();
        assert_eq!(point.x(), -0.12);
        assert_eq!(point.y(), 51.5);
    }

    #[test]
    fn test_ticket_builders() {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let ticket = TicketPoint::new("t-1", "Camden", issued_at, Coordinate::new(51.5, -0.12))
            .with_estimates(Some(3000), None)
            .with_street("High Street");

        assert_eq!(ticket.id, "t-1");
        assert_eq!(ticket.est_min_p, Some(3000));
        assert_eq!(ticket.est_max_p, None);
        assert_eq!(ticket.street.as_deref(), Some("High Street"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_ticket_json_uses_camel_case() {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let ticket = TicketPoint::new("t-1", "Camden", issued_at, Coordinate::new(51.5, -0.12))
            .with_estimates(Some(3000), Some(6000));

        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["estMinP"], 3000);
        assert_eq!(json["estMaxP"], 6000);
        assert_eq!(json["coordinate"]["lat"], 51.5);
        assert!(json.get("issuedAt").is_some());

        let back: TicketPoint = serde_json::from_value(json).unwrap();
        assert_eq!(back, ticket);
    }
}
