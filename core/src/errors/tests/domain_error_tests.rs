//! Unit tests for domain error types

use crate::errors::{DomainError, NumberError, PolicyError, VerificationError};

#[test]
fn test_codes_are_stable() {
    let error: DomainError = NumberError::NoNumber.into();
    assert_eq!(error.code(), "NO_NUMBER");

    let error: DomainError = VerificationError::TooManyAttempts.into();
    assert_eq!(error.code(), "TOO_MANY_ATTEMPTS");

    let error: DomainError = PolicyError::NotUnique.into();
    assert_eq!(error.code(), "NOT_UNIQUE");

    assert_eq!(DomainError::internal("redis down").code(), "INTERNAL_ERROR");
}

#[test]
fn test_wrong_code_and_missing_challenge_are_concealed() {
    let wrong: DomainError = VerificationError::WrongCode.into();
    let missing: DomainError = VerificationError::NoPendingChallenge.into();
    let expired: DomainError = VerificationError::Expired.into();

    assert!(wrong.is_concealed_failure());
    assert!(missing.is_concealed_failure());
    assert!(!expired.is_concealed_failure());
}

#[test]
fn test_kind_helpers() {
    let error: DomainError = NumberError::WrongRegion.into();
    assert!(error.is_number(NumberError::WrongRegion));
    assert!(!error.is_number(NumberError::WrongType));
    assert!(!error.is_verification(VerificationError::Expired));
}

#[test]
fn test_transparent_display() {
    let error: DomainError = VerificationError::Expired.into();
    assert_eq!(error.to_string(), "The verification challenge has expired");

    let error = DomainError::Config {
        message: "secret missing".to_string(),
    };
    assert!(error.to_string().contains("secret missing"));
}
