//! Unit tests for the verified-state tracker

use std::sync::Arc;

use crate::domain::value_objects::{AllowedTypes, FieldValue, HolderContext, MobileNumber};
use crate::repositories::verified::InMemoryVerifiedStateStore;
use crate::services::number::tests::stub_parser::StubParser;
use crate::services::number::NumberNormalizer;
use crate::services::verified_state::VerifiedStateTracker;

fn number(raw: &str, region: &str) -> MobileNumber {
    NumberNormalizer::new(Arc::new(StubParser))
        .normalize(raw, Some(region), &AllowedTypes::mobile_only())
        .unwrap()
}

fn tracker() -> VerifiedStateTracker {
    VerifiedStateTracker::new(Arc::new(InMemoryVerifiedStateStore::new()))
}

fn stored(canonical: &str, verified: bool) -> FieldValue {
    FieldValue {
        canonical: canonical.to_string(),
        region: "US".to_string(),
        local_number: "2025551234".to_string(),
        verified,
        tfa: false,
    }
}

#[tokio::test]
async fn test_mark_and_reset() {
    let tracker = tracker();
    let holder = HolderContext::new("s1");
    let number = number("2025551234", "US");

    assert!(!tracker.is_verified(&holder, &number).await.unwrap());
    tracker.mark_verified(&holder, &number).await.unwrap();
    assert!(tracker.is_verified(&holder, &number).await.unwrap());

    tracker.reset(&holder, &number).await.unwrap();
    assert!(!tracker.is_verified(&holder, &number).await.unwrap());
}

#[tokio::test]
async fn test_reformatted_input_stays_verified() {
    let tracker = tracker();
    let holder = HolderContext::new("s1");

    tracker
        .mark_verified(&holder, &number("2025551234", "US"))
        .await
        .unwrap();

    let reformatted = number("(202) 555-1234", "US");
    assert!(tracker.is_verified(&holder, &reformatted).await.unwrap());
}

#[tokio::test]
async fn test_verified_state_is_holder_scoped() {
    let tracker = tracker();
    let number = number("2025551234", "US");

    tracker
        .mark_verified(&HolderContext::new("s1"), &number)
        .await
        .unwrap();
    assert!(!tracker
        .is_verified(&HolderContext::new("s2"), &number)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_carry_over_from_stored_value() {
    let tracker = tracker();
    let holder = HolderContext::new("s1");
    let number = number("2025551234", "US");

    let verified_same = stored("+12025551234", true);
    let unverified_same = stored("+12025551234", false);
    let verified_other = stored("+447400123456", true);

    assert!(tracker.carry_over(&holder, &number, Some(&verified_same)).await.unwrap());
    assert!(!tracker.carry_over(&holder, &number, Some(&unverified_same)).await.unwrap());
    assert!(!tracker.carry_over(&holder, &number, Some(&verified_other)).await.unwrap());
    assert!(!tracker.carry_over(&holder, &number, None).await.unwrap());

    // Carry-over does not write state
    assert!(!tracker.is_verified(&holder, &number).await.unwrap());
}

#[tokio::test]
async fn test_value_change_resets_old_number() {
    let tracker = tracker();
    let holder = HolderContext::new("s1");
    let old = number("2025551234", "US");
    let new = number("07400 123456", "GB");

    tracker.mark_verified(&holder, &old).await.unwrap();

    assert!(!tracker
        .record_value_change(&holder, Some(old.canonical()), &old)
        .await
        .unwrap());
    assert!(tracker.is_verified(&holder, &old).await.unwrap());

    assert!(tracker
        .record_value_change(&holder, Some(old.canonical()), &new)
        .await
        .unwrap());
    assert!(!tracker.is_verified(&holder, &old).await.unwrap());

    assert!(!tracker.record_value_change(&holder, None, &new).await.unwrap());
}

#[tokio::test]
async fn test_reset_holder() {
    let tracker = tracker();
    let holder = HolderContext::new("s1");

    tracker.mark_verified(&holder, &number("2025551234", "US")).await.unwrap();
    tracker.mark_verified(&holder, &number("07400123456", "GB")).await.unwrap();

    assert_eq!(tracker.reset_holder(&holder).await.unwrap(), 2);
}
