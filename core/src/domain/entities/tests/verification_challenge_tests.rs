//! Unit tests for the verification challenge entity

use chrono::{Duration, TimeZone, Utc};
use crate::domain::entities::verification_challenge::{
    VerificationChallenge, DEFAULT_CHALLENGE_TTL_SECONDS,
};

fn challenge() -> VerificationChallenge {
    let issued_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    VerificationChallenge::new("abc123".to_string(), "deadbeef".to_string(), issued_at)
}

#[test]
fn test_not_expired_at_boundary() {
    let challenge = challenge();
    let boundary = challenge.issued_at + Duration::seconds(DEFAULT_CHALLENGE_TTL_SECONDS);
    assert!(!challenge.is_expired(boundary, DEFAULT_CHALLENGE_TTL_SECONDS));
}

#[test]
fn test_expired_one_second_after_lifetime() {
    let challenge = challenge();
    let later = challenge.issued_at + Duration::hours(24) + Duration::seconds(1);
    assert!(challenge.is_expired(later, DEFAULT_CHALLENGE_TTL_SECONDS));
}

#[test]
fn test_expires_at() {
    let challenge = challenge();
    assert_eq!(
        challenge.expires_at(60),
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 1, 0).unwrap()
    );
}

#[test]
fn test_token_matches() {
    let challenge = challenge();
    assert!(challenge.token_matches("abc123"));
    assert!(!challenge.token_matches("abc124"));
    assert!(!challenge.token_matches(""));
}

#[test]
fn test_serializes_without_plaintext_code() {
    let json = serde_json::to_string(&challenge()).unwrap();
    assert!(json.contains("\"code_hash\":\"deadbeef\""));
    assert!(!json.contains("\"code\""));
}
