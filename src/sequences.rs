//! # Patrol Sequences
//!
//! Groups a time-ordered ticket stream into inferred patrol runs and ranks them.
//!
//! A run continues while the next ticket is in the same borough, on the same UTC day,
//! no more than 12 minutes after the previous ticket and no more than 150 m from it.
//! Breaking any one of those conditions starts a new run. Both thresholds are
//! inclusive: a gap of exactly 12:00 or exactly 150 m still continues.
//!
//! ## Pipeline
//!
//! 1. [`build_sequences`] - single forward pass, one open sequence at a time
//! 2. [`sequence_hash`] - secret-keyed SHA-256 fingerprint per sequence
//! 3. [`decorate_sequences`] - centroid + hash, then rank by tickets, max estimate, hash
//!
//! Input must already be sorted by `(borough, day, issued_at)`. The engine does not
//! re-sort; use [`validate_points`] to check the precondition, or
//! [`crate::filter_and_order`] to establish it.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use log::debug;
use sha2::{Digest, Sha256};
use std::cmp::Ordering;

use crate::geo_utils::{centroid, haversine_distance_meters};
use crate::{Coordinate, LeaderboardError, TicketPoint};

/// Maximum distance between consecutive tickets of one run, in meters.
pub const DISTANCE_THRESHOLD_M: f64 = 150.0;

/// Maximum time between consecutive tickets of one run, in milliseconds.
pub const TIME_THRESHOLD_MS: i64 = 12 * 60 * 1000;

/// Thresholds for sequence continuity.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceConfig {
    /// Maximum distance from the previous ticket. Default: 150.0 meters
    pub max_distance_m: f64,
    /// Maximum time since the previous ticket. Default: 12 minutes
    pub max_time_gap: Duration,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            max_distance_m: DISTANCE_THRESHOLD_M,
            max_time_gap: Duration::milliseconds(TIME_THRESHOLD_MS),
        }
    }
}

/// One inferred patrol run: consecutive tickets in one borough on one day.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct OfficerSequence {
    pub borough: String,
    /// UTC calendar date shared by every ticket in the run
    pub day: NaiveDate,
    /// Ticket coordinates in issue order
    pub points: Vec<Coordinate>,
    pub tickets: u32,
    /// Sum of member tickets' minimum estimates (pence)
    pub est_min_p: i64,
    /// Sum of member tickets' maximum estimates (pence)
    pub est_max_p: i64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl OfficerSequence {
    fn start(point: &TicketPoint, day: NaiveDate) -> Self {
        Self {
            borough: point.borough.clone(),
            day,
            points: vec![point.coordinate],
            tickets: 1,
            est_min_p: point.est_min_p.unwrap_or(0),
            est_max_p: point.est_max_p.unwrap_or(0),
            first_seen: point.issued_at,
            last_seen: point.issued_at,
        }
    }

    /// Check the four continuity conditions against the next ticket.
    fn continues_with(&self, point: &TicketPoint, day: NaiveDate, config: &SequenceConfig) -> bool {
        if self.borough != point.borough || self.day != day {
            return false;
        }

        if point.issued_at - self.last_seen > config.max_time_gap {
            return false;
        }

        // Measured from the most recent ticket, not the centroid or the first ticket
        let exceeds_distance = self
            .points
            .last()
            .is_some_and(|last| haversine_distance_meters(last, &point.coordinate) > config.max_distance_m);

        !exceeds_distance
    }

    fn extend(&mut self, point: &TicketPoint) {
        self.points.push(point.coordinate);
        self.tickets += 1;
        self.est_min_p += point.est_min_p.unwrap_or(0);
        self.est_max_p += point.est_max_p.unwrap_or(0);
        self.last_seen = point.issued_at;
    }
}

/// A ranked, labeled sequence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoratedOfficerSequence {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub sequence: OfficerSequence,
    /// Unweighted mean of the sequence's points
    pub centroid: Coordinate,
    /// Lowercase hex SHA-256 fingerprint, see [`sequence_hash`]
    pub hash: String,
    /// 1-based leaderboard position
    pub rank: u32,
    /// Pseudonym derived only from `rank`
    pub label: String,
}

impl DecoratedOfficerSequence {
    fn unranked(sequence: &OfficerSequence, secret: &str) -> Self {
        Self {
            centroid: centroid(&sequence.points),
            hash: sequence_hash(sequence, secret),
            sequence: sequence.clone(),
            rank: 0,
            label: String::new(),
        }
    }
}

// ============================================================================
// Sequence Construction
// ============================================================================

/// Partition time-ordered tickets into patrol sequences using the default thresholds.
///
/// Sequences are returned in the order they were opened. Every ticket lands in exactly
/// one sequence.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use officer_leaderboard::{build_sequences, Coordinate, TicketPoint};
///
/// let here = Coordinate::new(51.5, -0.12);
/// let at = |minute| Utc.with_ymd_and_hms(2024, 1, 1, 9, minute, 0).unwrap();
/// let points = vec![
///     TicketPoint::new("a", "Camden", at(0), here),
///     TicketPoint::new("b", "Camden", at(5), here),
///     TicketPoint::new("c", "Camden", at(6), here),
/// ];
///
/// let sequences = build_sequences(&points);
/// assert_eq!(sequences.len(), 1);
/// assert_eq!(sequences[0].tickets, 3);
/// ```
pub fn build_sequences(points: &[TicketPoint]) -> Vec<OfficerSequence> {
    build_sequences_with_config(points, &SequenceConfig::default())
}

/// Partition time-ordered tickets into patrol sequences with custom thresholds.
pub fn build_sequences_with_config(
    points: &[TicketPoint],
    config: &SequenceConfig,
) -> Vec<OfficerSequence> {
    let mut sequences: Vec<OfficerSequence> = Vec::new();

    for point in points {
        let day = point.issued_at.date_naive();

        // Only the most recently opened sequence is ever extended
        match sequences.last_mut() {
            Some(open) if open.continues_with(point, day, config) => open.extend(point),
            _ => sequences.push(OfficerSequence::start(point, day)),
        }
    }

    debug!(
        "[Sequences] Built {} sequences from {} points",
        sequences.len(),
        points.len()
    );

    sequences
}

// ============================================================================
// Fingerprints and Ranking
// ============================================================================

/// Compute the secret-keyed fingerprint of a sequence.
///
/// SHA-256 over `secret|borough|day|first_seen|last_seen|tickets`, with the borough
/// lowercased and timestamps in ISO-8601 with millisecond precision
/// (`2024-01-01T09:00:00.000Z`). Returns 64 lowercase hex characters.
///
/// The digest is a stable anonymous identifier, not a credential: the secret only
/// keeps outsiders from matching labels back to real dates and times.
pub fn sequence_hash(sequence: &OfficerSequence, secret: &str) -> String {
    let fields = [
        secret.to_string(),
        sequence.borough.to_lowercase(),
        sequence.day.format("%Y-%m-%d").to_string(),
        iso_millis(&sequence.first_seen),
        iso_millis(&sequence.last_seen),
        sequence.tickets.to_string(),
    ];

    let mut hasher = Sha256::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            hasher.update(b"|");
        }
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}

fn iso_millis(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Leaderboard order: more tickets, then larger max estimate, then ascending hash.
fn leaderboard_order(a: &DecoratedOfficerSequence, b: &DecoratedOfficerSequence) -> Ordering {
    b.sequence
        .tickets
        .cmp(&a.sequence.tickets)
        .then_with(|| b.sequence.est_max_p.cmp(&a.sequence.est_max_p))
        .then_with(|| a.hash.cmp(&b.hash))
}

fn rank(mut decorated: Vec<DecoratedOfficerSequence>) -> Vec<DecoratedOfficerSequence> {
    decorated.sort_by(leaderboard_order);

    for (i, entry) in decorated.iter_mut().enumerate() {
        let rank = i as u32 + 1;
        entry.rank = rank;
        entry.label = format!("Parking Officer {}", rank);
    }

    decorated
}

/// Attach centroids and fingerprints, then rank the sequences.
///
/// Ranks run 1..=N without gaps. For a fixed input and secret the output is identical
/// on every call.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use officer_leaderboard::{build_sequences, decorate_sequences, Coordinate, TicketPoint};
///
/// let at = |hour| Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap();
/// let here = Coordinate::new(51.5, -0.12);
/// let points = vec![
///     TicketPoint::new("a", "Camden", at(9), here).with_estimates(Some(3000), Some(6000)),
///     TicketPoint::new("b", "Camden", at(11), here).with_estimates(Some(3000), Some(8000)),
/// ];
///
/// let board = decorate_sequences(&build_sequences(&points), "local-daily-secret");
/// assert_eq!(board[0].sequence.est_max_p, 8000);
/// assert_eq!(board[1].label, "Parking Officer 2");
/// ```
pub fn decorate_sequences(sequences: &[OfficerSequence], secret: &str) -> Vec<DecoratedOfficerSequence> {
    let decorated = sequences
        .iter()
        .map(|s| DecoratedOfficerSequence::unranked(s, secret))
        .collect();

    rank(decorated)
}

/// Same as [`decorate_sequences`], but computes centroids and fingerprints with rayon.
///
/// The output is identical to the sequential version.
#[cfg(feature = "parallel")]
pub fn decorate_sequences_parallel(
    sequences: &[OfficerSequence],
    secret: &str,
) -> Vec<DecoratedOfficerSequence> {
    use rayon::prelude::*;

    let decorated = sequences
        .par_iter()
        .map(|s| DecoratedOfficerSequence::unranked(s, secret))
        .collect();

    rank(decorated)
}

// ============================================================================
// Precondition Checks
// ============================================================================

/// Check the engine's input preconditions.
///
/// Rejects coordinates that are non-finite or out of range, negative estimates, and
/// tickets out of `(borough, day, issued_at)` order. The engine never calls this;
/// callers that cannot trust their input may.
pub fn validate_points(points: &[TicketPoint]) -> Result<(), LeaderboardError> {
    let mut previous: Option<(&str, NaiveDate, DateTime<Utc>)> = None;

    for point in points {
        if !point.coordinate.is_valid() {
            return Err(LeaderboardError::invalid_point(&point.id, "coordinate out of range"));
        }
        if point.est_min_p.is_some_and(|p| p < 0) || point.est_max_p.is_some_and(|p| p < 0) {
            return Err(LeaderboardError::invalid_point(&point.id, "negative estimate"));
        }

        let key = (point.borough.as_str(), point.issued_at.date_naive(), point.issued_at);
        if previous.is_some_and(|prev| key < prev) {
            return Err(LeaderboardError::Unsorted { id: point.id.clone() });
        }
        previous = Some(key);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
