use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Payload of a session token.
///
/// Binds a subject (user identifier) to an absolute expiry. Both are required:
/// a token missing either one does not deserialize and is treated as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl SessionClaims {
    /// Create claims for `subject` valid for `ttl` starting at `now`.
    ///
    /// A zero or negative `ttl` produces claims that are already expired.
    pub fn new(subject: impl ToString, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            sub: subject.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Check if the claims are expired at `current_timestamp`.
    ///
    /// Expiry is inclusive: a token is no longer valid at its `exp` second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
