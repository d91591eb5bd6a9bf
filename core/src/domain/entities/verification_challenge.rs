//! Pending verification challenge entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default lifetime of a challenge (24 hours)
pub const DEFAULT_CHALLENGE_TTL_SECONDS: i64 = 24 * 60 * 60;

/// How long stores keep an expired challenge so `Expired` can still be reported
pub const CHALLENGE_GRACE_SECONDS: i64 = 60 * 60;

/// A server-held challenge pairing an opaque token with a hashed one-time code
///
/// The plaintext code is never part of this record; only the keyed digest of
/// `canonical || token || code` is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationChallenge {
    /// Opaque random identifier, the holder's capability to verify
    pub token: String,

    /// Hex-encoded keyed digest of the code
    pub code_hash: String,

    /// When the challenge was issued
    pub issued_at: DateTime<Utc>,
}

impl VerificationChallenge {
    pub fn new(token: String, code_hash: String, issued_at: DateTime<Utc>) -> Self {
        Self {
            token,
            code_hash,
            issued_at,
        }
    }

    /// Expired strictly after `issued_at + ttl`
    ///
    /// A check exactly at the boundary is still accepted.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl_seconds: i64) -> bool {
        now - self.issued_at > Duration::seconds(ttl_seconds)
    }

    pub fn expires_at(&self, ttl_seconds: i64) -> DateTime<Utc> {
        self.issued_at + Duration::seconds(ttl_seconds)
    }

    /// Token equality without short-circuiting on the first differing byte
    pub fn token_matches(&self, token: &str) -> bool {
        constant_time_eq::constant_time_eq(self.token.as_bytes(), token.as_bytes())
    }
}
