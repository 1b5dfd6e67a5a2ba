//! Leaderboard queries over in-memory tickets.
//!
//! Applies the borough / time window / bbox filters and the `(borough, day, issued_at)`
//! ordering that the sequence engine expects, then builds either the officer
//! leaderboard or the per-street leaderboard.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::HashMap;
use std::time::Instant;

use crate::sequences::{build_sequences, decorate_sequences, DecoratedOfficerSequence};
use crate::{Bbox, Coordinate, LeaderboardError, LeaderboardOptions, TicketPoint};

/// Filters for a leaderboard request. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeaderboardQuery {
    /// Exact borough name
    pub borough: Option<String>,
    /// Inclusive lower bound on `issued_at`
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `issued_at`
    pub until: Option<DateTime<Utc>>,
    pub bbox: Option<Bbox>,
}

impl LeaderboardQuery {
    /// Reject a window whose `since` is after its `until`.
    pub fn validate(&self) -> Result<(), LeaderboardError> {
        match (self.since, self.until) {
            (Some(since), Some(until)) if since > until => Err(LeaderboardError::InvalidDateRange),
            _ => Ok(()),
        }
    }

    /// Check if a ticket passes every filter.
    pub fn matches(&self, point: &TicketPoint) -> bool {
        self.borough.as_ref().map_or(true, |b| *b == point.borough)
            && self.since.map_or(true, |since| point.issued_at >= since)
            && self.until.map_or(true, |until| point.issued_at <= until)
            && self.bbox.map_or(true, |bbox| bbox.contains(&point.coordinate))
    }
}

/// Outward view of a ranked sequence. Hash, day and point list stay internal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct OfficerLeaderboardRow {
    pub rank: u32,
    pub label: String,
    pub borough: String,
    pub centroid: Coordinate,
    pub tickets: u32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub est_min_p: i64,
    pub est_max_p: i64,
}

impl From<&DecoratedOfficerSequence> for OfficerLeaderboardRow {
    fn from(d: &DecoratedOfficerSequence) -> Self {
        Self {
            rank: d.rank,
            label: d.label.clone(),
            borough: d.sequence.borough.clone(),
            centroid: d.centroid,
            tickets: d.sequence.tickets,
            first_seen: d.sequence.first_seen,
            last_seen: d.sequence.last_seen,
            est_min_p: d.sequence.est_min_p,
            est_max_p: d.sequence.est_max_p,
        }
    }
}

/// Ticket totals for one street.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StreetLeaderboardRow {
    pub street: String,
    pub borough: String,
    pub tickets: u32,
    pub est_min_p: i64,
    pub est_max_p: i64,
}

/// Keep the tickets matching `query`, sorted by `(borough, day, issued_at)`.
///
/// The sort is stable, so tickets sharing a timestamp keep their input order.
pub fn filter_and_order(points: &[TicketPoint], query: &LeaderboardQuery) -> Vec<TicketPoint> {
    let mut selected: Vec<TicketPoint> = points.iter().filter(|p| query.matches(p)).cloned().collect();

    selected.sort_by(|a, b| {
        a.borough
            .cmp(&b.borough)
            .then_with(|| a.issued_at.date_naive().cmp(&b.issued_at.date_naive()))
            .then_with(|| a.issued_at.cmp(&b.issued_at))
    });

    debug!(
        "[Leaderboard] Selected {} of {} tickets",
        selected.len(),
        points.len()
    );

    selected
}

/// Build the ranked officer leaderboard for the tickets matching `query`.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use officer_leaderboard::{
///     officer_leaderboard, Coordinate, LeaderboardOptions, LeaderboardQuery, TicketPoint,
/// };
///
/// let at = |minute| Utc.with_ymd_and_hms(2024, 1, 1, 9, minute, 0).unwrap();
/// let here = Coordinate::new(51.5, -0.12);
/// // Out of order on purpose; the query step sorts them
/// let points = vec![
///     TicketPoint::new("b", "Camden", at(5), here),
///     TicketPoint::new("a", "Camden", at(0), here),
///     TicketPoint::new("c", "Hackney", at(1), here),
/// ];
///
/// let query = LeaderboardQuery { borough: Some("Camden".into()), ..Default::default() };
/// let board = officer_leaderboard(&points, &query, &LeaderboardOptions::default()).unwrap();
///
/// assert_eq!(board.len(), 1);
/// assert_eq!(board[0].sequence.tickets, 2);
/// ```
pub fn officer_leaderboard(
    points: &[TicketPoint],
    query: &LeaderboardQuery,
    options: &LeaderboardOptions,
) -> Result<Vec<DecoratedOfficerSequence>, LeaderboardError> {
    query.validate()?;

    let start = Instant::now();
    let ordered = filter_and_order(points, query);
    let sequences = build_sequences(&ordered);
    let board = decorate_sequences(&sequences, &options.daily_secret);

    info!(
        "[Leaderboard] Ranked {} sequences from {} tickets in {:?}",
        board.len(),
        ordered.len(),
        start.elapsed()
    );

    Ok(board)
}

/// Build the per-street leaderboard for the tickets matching `query`.
///
/// Tickets without a street are skipped. Rows are ordered by ticket count, then summed
/// maximum estimate, then street and borough name.
pub fn street_leaderboard(
    points: &[TicketPoint],
    query: &LeaderboardQuery,
) -> Result<Vec<StreetLeaderboardRow>, LeaderboardError> {
    query.validate()?;

    let mut totals: HashMap<(&str, &str), StreetLeaderboardRow> = HashMap::new();

    for point in points.iter().filter(|p| query.matches(p)) {
        let Some(street) = point.street.as_deref() else {
            continue;
        };

        let row = totals
            .entry((street, point.borough.as_str()))
            .or_insert_with(|| StreetLeaderboardRow {
                street: street.to_string(),
                borough: point.borough.clone(),
                tickets: 0,
                est_min_p: 0,
                est_max_p: 0,
            });
        row.tickets += 1;
        row.est_min_p += point.est_min_p.unwrap_or(0);
        row.est_max_p += point.est_max_p.unwrap_or(0);
    }

    let mut rows: Vec<StreetLeaderboardRow> = totals.into_values().collect();
    rows.sort_by(|a, b| {
        b.tickets
            .cmp(&a.tickets)
            .then_with(|| b.est_max_p.cmp(&a.est_max_p))
            .then_with(|| a.street.cmp(&b.street))
            .then_with(|| a.borough.cmp(&b.borough))
    });

    debug!("[Leaderboard] {} streets in street leaderboard", rows.len());

    Ok(rows)
}

// ============================================================================
// Tests
// ============================================================================
