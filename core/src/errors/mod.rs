//! Domain-specific error types and error handling.
//!
//! Callers branch on the variant (or its stable `code()`), never on message
//! text. This crate does not produce user-facing wording.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{GatewayError, NumberError, ParseError, PolicyError, VerificationError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    /// Fatal misconfiguration detected at construction time
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Store or transport failure outside the verification protocol
    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Number(#[from] NumberError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

impl DomainError {
    /// Build an internal error from any displayable cause
    pub fn internal(message: impl std::fmt::Display) -> Self {
        DomainError::Internal {
            message: message.to_string(),
        }
    }

    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Config { .. } => "CONFIGURATION_ERROR",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Number(e) => e.code(),
            DomainError::Verification(e) => e.code(),
            DomainError::Policy(e) => e.code(),
        }
    }

    /// `WrongCode` and `NoPendingChallenge` must look the same to end users
    pub fn is_concealed_failure(&self) -> bool {
        matches!(
            self,
            DomainError::Verification(VerificationError::WrongCode)
                | DomainError::Verification(VerificationError::NoPendingChallenge)
        )
    }

    /// Whether the verification error kind matches
    pub fn is_verification(&self, kind: VerificationError) -> bool {
        matches!(self, DomainError::Verification(e) if *e == kind)
    }

    /// Whether the normalization error kind matches
    pub fn is_number(&self, kind: NumberError) -> bool {
        matches!(self, DomainError::Number(e) if *e == kind)
    }

    /// Whether the policy error kind matches
    pub fn is_policy(&self, kind: PolicyError) -> bool {
        matches!(self, DomainError::Policy(e) if *e == kind)
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
