//! Types for verification service results

use chrono::{DateTime, Utc};

/// Result of issuing a challenge
#[derive(Debug, Clone)]
pub struct SendCodeResult {
    /// Challenge token; present it again when verifying
    pub token: String,
    /// The SMS message ID from the provider
    pub message_id: String,
    /// When the challenge was persisted
    pub issued_at: DateTime<Utc>,
    /// After this instant the code is rejected as expired
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful code check
#[derive(Debug, Clone)]
pub struct VerifyCodeResult {
    /// Number now verified for the holder
    pub canonical: String,
    pub verified_at: DateTime<Utc>,
}
