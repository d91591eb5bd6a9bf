//! Unit tests for verification service

use chrono::Duration;
use std::sync::Arc;

use mv_shared::config::{RateLimitConfig, VerificationConfig};

use crate::domain::value_objects::HolderContext;
use crate::errors::{DomainError, VerificationError};
use crate::repositories::challenge::{ChallengeStore, InMemoryChallengeStore};
use crate::repositories::verified::InMemoryVerifiedStateStore;
use crate::services::clock::MockClock;
use crate::services::flood::{InMemoryRateLimiter, RateLimiter};
use crate::services::verification::{FixedRandom, TokenData, VerificationService};

use super::mocks::{harness, us_number, MockSmsGateway, SECRET};

fn holder() -> HolderContext {
    HolderContext::new("session-1")
}

fn assert_verification_error<T: std::fmt::Debug>(result: Result<T, DomainError>, kind: VerificationError) {
    match result {
        Err(DomainError::Verification(e)) => assert_eq!(e, kind),
        other => panic!("expected {:?}, got {:?}", kind, other),
    }
}

#[tokio::test]
async fn test_issue_and_verify_scenario() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();

    let sent = h
        .service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();
    assert_eq!(sent.token, "abc123");
    assert_eq!(sent.message_id, "mock-msg-1");
    assert_eq!(sent.expires_at, sent.issued_at + Duration::hours(24));

    let (to, message) = h.gateway.last_message().unwrap();
    assert_eq!(to, "+12025551234");
    assert_eq!(message, "Your verification code for Example is 4821");

    let verified = h
        .service
        .verify(&number, &holder(), Some("abc123"), "4821")
        .await
        .unwrap();
    assert_eq!(verified.canonical, "+12025551234");
    assert!(h.service.is_verified(&number, &holder()).await.unwrap());

    // Stale token after success
    assert_verification_error(
        h.service.verify(&number, &holder(), Some("abc123"), "4821").await,
        VerificationError::NoPendingChallenge,
    );
}

#[tokio::test]
async fn test_store_never_holds_plaintext_code() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();

    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();

    let challenge = h.challenges.get("+12025551234", &holder()).await.unwrap().unwrap();
    assert_eq!(challenge.token, "abc123");
    assert_ne!(challenge.code_hash, "4821");
    assert!(!challenge.code_hash.contains("4821"));
    assert_eq!(challenge.code_hash.len(), 64);
}

#[tokio::test]
async fn test_wrong_code_keeps_challenge_for_retry() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();
    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();

    assert_verification_error(
        h.service.verify(&number, &holder(), Some("abc123"), "0000").await,
        VerificationError::WrongCode,
    );
    assert_eq!(h.service.remaining_attempts(&number).await.unwrap(), 4);
    assert!(h.service.has_pending_challenge(&number, &holder()).await.unwrap());

    h.service
        .verify(&number, &holder(), Some("abc123"), "4821")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sixth_attempt_blocked_until_window_elapses() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();
    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();

    for _ in 0..5 {
        assert_verification_error(
            h.service.verify(&number, &holder(), Some("abc123"), "9999").await,
            VerificationError::WrongCode,
        );
    }

    // Correct code, but flood control wins
    assert_verification_error(
        h.service.verify(&number, &holder(), Some("abc123"), "4821").await,
        VerificationError::TooManyAttempts,
    );
    // Issuance is gated too
    assert_verification_error(
        h.service.issue(&number, &holder(), None, &TokenData::new()).await,
        VerificationError::TooManyAttempts,
    );

    h.clock.advance(Duration::hours(1) + Duration::seconds(1));
    h.service
        .verify(&number, &holder(), Some("abc123"), "4821")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_blocked_attempts_do_not_extend_the_window() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();
    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();

    for _ in 0..5 {
        let _ = h.service.verify(&number, &holder(), Some("abc123"), "9999").await;
    }
    h.clock.advance(Duration::minutes(30));
    for _ in 0..3 {
        let _ = h.service.verify(&number, &holder(), Some("abc123"), "9999").await;
    }

    h.clock.advance(Duration::minutes(30) + Duration::seconds(1));
    assert_eq!(h.service.remaining_attempts(&number).await.unwrap(), 5);
}

#[tokio::test]
async fn test_challenge_expires_after_lifetime() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();
    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();

    h.clock.advance(Duration::hours(24) + Duration::seconds(1));

    assert_verification_error(
        h.service.verify(&number, &holder(), Some("abc123"), "4821").await,
        VerificationError::Expired,
    );
    assert!(!h.service.has_pending_challenge(&number, &holder()).await.unwrap());
    assert!(!h.service.is_verified(&number, &holder()).await.unwrap());
}

#[tokio::test]
async fn test_challenge_valid_at_exact_lifetime() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();
    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();

    h.clock.advance(Duration::hours(24));
    h.service
        .verify(&number, &holder(), Some("abc123"), "4821")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reissue_supersedes_previous_token() {
    let h = harness(FixedRandom::with_sequence(&["1111", "2222"], &["first", "second"]));
    let number = us_number();

    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();
    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();

    assert_verification_error(
        h.service.verify(&number, &holder(), Some("first"), "1111").await,
        VerificationError::NoPendingChallenge,
    );
    h.service
        .verify(&number, &holder(), Some("second"), "2222")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_missing_and_mismatched_challenge_look_the_same() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();

    let missing = h
        .service
        .verify(&number, &holder(), Some("abc123"), "4821")
        .await
        .unwrap_err();

    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();
    let mismatched = h
        .service
        .verify(&number, &holder(), Some("forged"), "4821")
        .await
        .unwrap_err();

    assert_eq!(missing.code(), mismatched.code());
    assert!(missing.is_concealed_failure());

    let wrong = h
        .service
        .verify(&number, &holder(), Some("abc123"), "0000")
        .await
        .unwrap_err();
    assert!(wrong.is_concealed_failure());

    // All three counted as failed attempts
    assert_eq!(h.service.remaining_attempts(&number).await.unwrap(), 2);
}

#[tokio::test]
async fn test_server_side_token() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();
    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();

    h.service.verify(&number, &holder(), None, "4821").await.unwrap();
    assert!(h.service.is_verified(&number, &holder()).await.unwrap());
}

#[tokio::test]
async fn test_empty_code_is_wrong_code_without_flood_event() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();
    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();

    assert_verification_error(
        h.service.verify(&number, &holder(), Some("abc123"), "  ").await,
        VerificationError::WrongCode,
    );
    assert_eq!(h.service.remaining_attempts(&number).await.unwrap(), 5);
}

#[tokio::test]
async fn test_challenge_is_holder_scoped() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();
    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();

    let other = HolderContext::new("session-2");
    assert_verification_error(
        h.service.verify(&number, &other, Some("abc123"), "4821").await,
        VerificationError::NoPendingChallenge,
    );
    assert!(!h.service.is_verified(&number, &other).await.unwrap());
}

#[tokio::test]
async fn test_verified_state_survives_new_unfinished_challenge() {
    let h = harness(FixedRandom::with_sequence(&["4821", "5555"], &["abc123", "def456"]));
    let number = us_number();

    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();
    h.service
        .verify(&number, &holder(), Some("abc123"), "4821")
        .await
        .unwrap();

    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();
    assert!(h.service.is_verified(&number, &holder()).await.unwrap());

    h.service.reset_verified(&number, &holder()).await.unwrap();
    assert!(!h.service.is_verified(&number, &holder()).await.unwrap());
    assert!(!h.service.has_pending_challenge(&number, &holder()).await.unwrap());
}

#[tokio::test]
async fn test_send_failure_leaves_no_challenge() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();
    h.gateway.set_failing(true);

    assert_verification_error(
        h.service.issue(&number, &holder(), None, &TokenData::new()).await,
        VerificationError::SendFailed,
    );
    assert!(h.challenges.is_empty().await);
    assert!(!h.service.has_pending_challenge(&number, &holder()).await.unwrap());
}

#[tokio::test]
async fn test_message_override_and_token_data() {
    let h = harness(FixedRandom::new("0042", "abc123"));
    let number = us_number();
    let mut data = TokenData::new();
    data.insert("user:name".to_string(), "alice".to_string());

    h.service
        .issue(&number, &holder(), Some("[user:name], !site_name code: !code"), &data)
        .await
        .unwrap();

    let (_, message) = h.gateway.last_message().unwrap();
    assert_eq!(message, "alice, Example code: 0042");
}

#[tokio::test]
async fn test_disabled_without_gateway() {
    let clock = MockClock::default();
    let service = VerificationService::new(
        VerificationConfig::new(SECRET),
        Arc::new(InMemoryChallengeStore::new()),
        Arc::new(InMemoryRateLimiter::new(RateLimitConfig::default(), Arc::new(clock))),
        Arc::new(InMemoryVerifiedStateStore::new()),
        None,
    )
    .unwrap();

    assert!(!service.is_enabled());
    assert_verification_error(
        service.issue(&us_number(), &holder(), None, &TokenData::new()).await,
        VerificationError::Disabled,
    );
}

#[tokio::test]
async fn test_verify_is_disabled_without_gateway() {
    let clock = MockClock::default();
    let limiter = Arc::new(InMemoryRateLimiter::new(RateLimitConfig::default(), Arc::new(clock)));
    let service = VerificationService::new(
        VerificationConfig::new(SECRET),
        Arc::new(InMemoryChallengeStore::new()),
        limiter.clone(),
        Arc::new(InMemoryVerifiedStateStore::new()),
        None,
    )
    .unwrap();

    for _ in 0..3 {
        assert_verification_error(
            service.verify(&us_number(), &holder(), Some("abc123"), "4821").await,
            VerificationError::Disabled,
        );
    }
    // No flood events were spent
    assert_eq!(limiter.remaining(us_number().canonical()).await.unwrap(), 5);
}

#[tokio::test]
async fn test_unusable_limits_fail_construction() {
    for limits in [RateLimitConfig::new(5, 0), RateLimitConfig::new(0, 3600)] {
        let clock = MockClock::default();
        let result = VerificationService::new(
            VerificationConfig::new(SECRET),
            Arc::new(InMemoryChallengeStore::new()),
            Arc::new(InMemoryRateLimiter::new(limits, Arc::new(clock))),
            Arc::new(InMemoryVerifiedStateStore::new()),
            Some(Arc::new(MockSmsGateway::new(false))),
        );
        assert!(matches!(result, Err(DomainError::Config { .. })));
    }
}

#[tokio::test]
async fn test_oversized_lifetime_fails_construction() {
    let clock = MockClock::default();
    let result = VerificationService::new(
        VerificationConfig::new(SECRET).with_challenge_ttl(i64::MAX),
        Arc::new(InMemoryChallengeStore::new()),
        Arc::new(InMemoryRateLimiter::new(RateLimitConfig::default(), Arc::new(clock))),
        Arc::new(InMemoryVerifiedStateStore::new()),
        Some(Arc::new(MockSmsGateway::new(false))),
    );

    assert!(matches!(result, Err(DomainError::Config { .. })));
}

#[tokio::test]
async fn test_empty_secret_fails_construction() {
    let clock = MockClock::default();
    let result = VerificationService::new(
        VerificationConfig::new(""),
        Arc::new(InMemoryChallengeStore::new()),
        Arc::new(InMemoryRateLimiter::new(RateLimitConfig::default(), Arc::new(clock))),
        Arc::new(InMemoryVerifiedStateStore::new()),
        Some(Arc::new(MockSmsGateway::new(false))),
    );

    assert!(matches!(result, Err(DomainError::Config { .. })));
}

#[tokio::test]
async fn test_rotating_secret_invalidates_pending_challenges() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();
    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();

    let rotated = VerificationService::new(
        VerificationConfig::new("rotated-secret"),
        h.challenges.clone(),
        Arc::new(InMemoryRateLimiter::new(RateLimitConfig::default(), Arc::new(h.clock.clone()))),
        Arc::new(InMemoryVerifiedStateStore::new()),
        Some(h.gateway.clone()),
    )
    .unwrap()
    .with_clock(Arc::new(h.clock.clone()));

    assert_verification_error(
        rotated.verify(&number, &holder(), Some("abc123"), "4821").await,
        VerificationError::WrongCode,
    );
}

#[tokio::test]
async fn test_concurrent_correct_verifications_succeed_once() {
    let h = harness(FixedRandom::new("4821", "abc123"));
    let number = us_number();
    h.service
        .issue(&number, &holder(), None, &TokenData::new())
        .await
        .unwrap();

    let service = Arc::new(h.service);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            let number = number.clone();
            tokio::spawn(async move {
                service
                    .verify(&number, &holder(), Some("abc123"), "4821")
                    .await
                    .is_ok()
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_purge_expired_challenges() {
    let h = harness(FixedRandom::with_sequence(&["1111"], &["t1", "t2"]));
    let number = us_number();

    h.service
        .issue(&number, &HolderContext::new("old"), None, &TokenData::new())
        .await
        .unwrap();
    h.clock.advance(Duration::hours(25));
    h.service
        .issue(&number, &HolderContext::new("new"), None, &TokenData::new())
        .await
        .unwrap();

    assert_eq!(h.service.purge_expired_challenges().await.unwrap(), 1);
    assert_eq!(h.challenges.len().await, 1);
    assert_eq!(h.gateway.sent_count(), 2);
}
