//! Closed error taxonomy for normalization, verification and field policy

use thiserror::Error;

/// Raw input could not become a `MobileNumber`
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberError {
    #[error("No number was provided")]
    NoNumber,

    #[error("The number could not be parsed")]
    InvalidNumber,

    #[error("The number type is not allowed")]
    WrongType,

    #[error("The number does not belong to the given region")]
    WrongRegion,
}

impl NumberError {
    pub fn code(&self) -> &'static str {
        match self {
            NumberError::NoNumber => "NO_NUMBER",
            NumberError::InvalidNumber => "INVALID_NUMBER",
            NumberError::WrongType => "WRONG_TYPE",
            NumberError::WrongRegion => "WRONG_REGION",
        }
    }
}

/// Challenge issuance or code check failed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationError {
    #[error("Too many verification attempts for this number")]
    TooManyAttempts,

    #[error("The verification message could not be delivered")]
    SendFailed,

    #[error("The verification challenge has expired")]
    Expired,

    #[error("The verification code is wrong")]
    WrongCode,

    #[error("No pending verification challenge")]
    NoPendingChallenge,

    #[error("Verification is disabled: no SMS gateway configured")]
    Disabled,
}

impl VerificationError {
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            VerificationError::SendFailed => "SEND_FAILED",
            VerificationError::Expired => "EXPIRED",
            VerificationError::WrongCode => "WRONG_CODE",
            VerificationError::NoPendingChallenge => "NO_PENDING_CHALLENGE",
            VerificationError::Disabled => "VERIFICATION_DISABLED",
        }
    }
}

/// A normalized number violates the field's storage policy
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyError {
    #[error("The number's region is not allowed for this field")]
    RegionNotAllowed,

    #[error("The number must be verified")]
    VerificationRequired,

    #[error("Two-factor use requires a verified number")]
    TfaRequiresVerification,

    #[error("The number is already in use")]
    NotUnique,
}

impl PolicyError {
    pub fn code(&self) -> &'static str {
        match self {
            PolicyError::RegionNotAllowed => "REGION_NOT_ALLOWED",
            PolicyError::VerificationRequired => "VERIFICATION_REQUIRED",
            PolicyError::TfaRequiresVerification => "TFA_REQUIRES_VERIFICATION",
            PolicyError::NotUnique => "NOT_UNIQUE",
        }
    }
}

/// Why a `NumberParser` rejected its input
///
/// Only logged; the normalizer reports every parse failure as
/// `NumberError::InvalidNumber`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown region hint: {0}")]
    UnknownRegion(String),

    #[error("Input is not a phone number: {0}")]
    NotANumber(String),
}

/// Why an `SmsGateway` did not deliver a message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The provider refused this message or recipient
    #[error("Message rejected: {0}")]
    Rejected(String),

    /// The provider could not be reached or kept failing
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}
