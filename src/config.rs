//! Leaderboard options and their environment configuration.

use log::warn;

use crate::LeaderboardError;

/// Environment variable holding the fingerprint secret.
pub const SECRET_ENV_VAR: &str = "LEADERBOARD_DAILY_SECRET";

/// Secret used when [`SECRET_ENV_VAR`] is unset. Only suitable for local runs.
pub const DEFAULT_DAILY_SECRET: &str = "local-daily-secret";

/// Shortest accepted secret, in characters.
pub const MIN_SECRET_LEN: usize = 16;

/// Options for building the officer leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardOptions {
    /// Key for [`crate::sequence_hash`]. Rotated per deployment or per day.
    pub daily_secret: String,
}

impl Default for LeaderboardOptions {
    fn default() -> Self {
        Self {
            daily_secret: DEFAULT_DAILY_SECRET.to_string(),
        }
    }
}

impl LeaderboardOptions {
    /// Create options with an explicit secret.
    pub fn new(daily_secret: impl Into<String>) -> Result<Self, LeaderboardError> {
        let daily_secret = daily_secret.into();
        if daily_secret.chars().count() < MIN_SECRET_LEN {
            return Err(LeaderboardError::SecretTooShort { min: MIN_SECRET_LEN });
        }
        Ok(Self { daily_secret })
    }

    /// Read the secret from `LEADERBOARD_DAILY_SECRET`.
    pub fn from_env() -> Result<Self, LeaderboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the secret through `lookup`, falling back to the local default when unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LeaderboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(SECRET_ENV_VAR) {
            Some(secret) => Self::new(secret),
            None => {
                warn!("[Config] {} not set, using local default secret", SECRET_ENV_VAR);
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_secret_is_valid() {
        let options = LeaderboardOptions::default();
        assert_eq!(LeaderboardOptions::new(options.daily_secret.clone()), Ok(options));
    }

    #[test]
    fn test_rejects_short_secret() {
        assert_eq!(
            LeaderboardOptions::new("too-short"),
            Err(LeaderboardError::SecretTooShort { min: 16 })
        );
    }

    #[test]
    fn test_from_lookup_uses_variable() {
        let options = LeaderboardOptions::from_lookup(|key| {
            (key == SECRET_ENV_VAR).then(|| "a-much-longer-secret-value".to_string())
        })
        .unwrap();
        assert_eq!(options.daily_secret, "a-much-longer-secret-value");
    }

    #[test]
    fn test_from_lookup_falls_back_when_unset() {
        let options = LeaderboardOptions::from_lookup(|_| None).unwrap();
        assert_eq!(options.daily_secret, DEFAULT_DAILY_SECRET);
    }

    #[test]
    fn test_from_lookup_validates_variable() {
        let result = LeaderboardOptions::from_lookup(|_| Some("short".to_string()));
        assert!(matches!(result, Err(LeaderboardError::SecretTooShort { .. })));
    }
}
