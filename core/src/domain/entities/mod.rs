//! Domain entities representing core business objects.

pub mod verification_challenge;

// Re-export commonly used types
pub use verification_challenge::{
    VerificationChallenge, CHALLENGE_GRACE_SECONDS, DEFAULT_CHALLENGE_TTL_SECONDS,
};

#[cfg(test)]
mod tests;
