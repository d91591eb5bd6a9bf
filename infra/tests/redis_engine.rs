//! Redis-backed engine wired by `initialize`
//!
//! Run with a live server: `REDIS_URL=redis://127.0.0.1:6379 cargo test -- --ignored`

use mv_core::{AllowedTypes, HolderContext, TokenData, VerificationError};
use mv_shared::config::{CacheConfig, EngineConfig, SmsConfig, SmsProvider, VerificationConfig};

fn config() -> EngineConfig {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let prefix = format!("mv_it_{}", uuid::Uuid::new_v4().simple());
    EngineConfig {
        verification: VerificationConfig::new("redis-engine-secret"),
        cache: CacheConfig::new(url).with_prefix(prefix),
        sms: SmsConfig {
            provider: SmsProvider::Mock,
            ..SmsConfig::default()
        },
        ..EngineConfig::default()
    }
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_issue_and_reject_over_redis() {
    let services = mv_infra::initialize(&config()).await.unwrap();
    assert!(services.verification.is_enabled());
    assert!(services.health_check().await.unwrap());

    let holder = HolderContext::new("redis-holder");
    let number = services
        .normalizer
        .normalize("+44 7400 123456", None, &AllowedTypes::mobile_only())
        .unwrap();

    let sent = services
        .verification
        .issue(&number, &holder, None, &TokenData::new())
        .await
        .unwrap();
    assert!(services
        .verification
        .has_pending_challenge(&number, &holder)
        .await
        .unwrap());

    // A stale token finds no challenge and costs one attempt
    let error = services
        .verification
        .verify(&number, &holder, Some("not-the-token"), "0000")
        .await
        .unwrap_err();
    assert!(error.is_verification(VerificationError::NoPendingChallenge));
    assert_eq!(
        services.verification.remaining_attempts(&number).await.unwrap(),
        4
    );

    assert!(!services.verification.is_verified(&number, &holder).await.unwrap());

    // Reset drops the pending challenge along with any verified state
    services
        .verification
        .reset_verified(&number, &holder)
        .await
        .unwrap();
    assert!(!services
        .verification
        .has_pending_challenge(&number, &holder)
        .await
        .unwrap());
    assert!(!sent.token.is_empty());
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_verify_without_challenge_over_redis() {
    let services = mv_infra::initialize(&config()).await.unwrap();
    let holder = HolderContext::new("nobody");
    let number = services
        .normalizer
        .normalize("+44 7400 654321", None, &AllowedTypes::mobile_only())
        .unwrap();

    let error = services
        .verification
        .verify(&number, &holder, None, "1234")
        .await
        .unwrap_err();
    assert!(error.is_verification(VerificationError::NoPendingChallenge));
}
