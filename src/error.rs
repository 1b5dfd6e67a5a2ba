//! Error type for query validation, configuration and precondition checks.
//!
//! The sequence engine itself is total and never returns these.

use thiserror::Error;

/// Errors that can occur while preparing or validating leaderboard input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LeaderboardError {
    /// Bounding box text or values were malformed.
    #[error("Invalid bbox: {message}")]
    InvalidBbox {
        /// Description of what went wrong.
        message: String,
    },

    /// Bounding box covers more area than allowed.
    #[error("bbox area {area:.2} exceeds the allowed limit. Please zoom in further.")]
    BboxTooLarge {
        /// Requested area in square degrees.
        area: f64,
    },

    /// `since` is later than `until`.
    #[error("Invalid date range: since must be <= until")]
    InvalidDateRange,

    /// Configured leaderboard secret is too short.
    #[error("Leaderboard secret must be at least {min} characters")]
    SecretTooShort {
        /// Minimum accepted length.
        min: usize,
    },

    /// A ticket failed precondition checks.
    #[error("Invalid ticket {id}: {reason}")]
    InvalidPoint {
        /// Ticket identifier.
        id: String,
        /// Which precondition failed.
        reason: String,
    },

    /// A ticket is out of (borough, day, issued_at) order.
    #[error("Ticket {id} is out of (borough, day, issued_at) order")]
    Unsorted {
        /// Identifier of the first out-of-order ticket.
        id: String,
    },
}

impl LeaderboardError {
    pub(crate) fn invalid_bbox(message: impl Into<String>) -> Self {
        Self::InvalidBbox { message: message.into() }
    }

    pub(crate) fn invalid_point(id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPoint { id: id.to_string(), reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LeaderboardError::invalid_bbox("bbox must contain four comma-separated numbers").to_string(),
            "Invalid bbox: bbox must contain four comma-separated numbers"
        );
        assert_eq!(
            LeaderboardError::SecretTooShort { min: 16 }.to_string(),
            "Leaderboard secret must be at least 16 characters"
        );
        assert_eq!(
            LeaderboardError::invalid_point("t-1", "negative estimate").to_string(),
            "Invalid ticket t-1: negative estimate"
        );
    }
}
