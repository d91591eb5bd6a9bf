//! Verification service module for SMS-based number ownership checks
//!
//! This module provides the challenge workflow:
//! - Code and token generation from a secure random source
//! - Keyed hashing of codes so stores never hold plaintext
//! - Flood gating of issuance and code checks per number
//! - Delivery through a pluggable SMS gateway

mod hashing;
mod locks;
mod message;
mod random;
mod service;
mod traits;
mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use hashing::CodeHasher;
pub use locks::KeyedLocks;
pub use message::{render_message, TokenData};
pub use random::{FixedRandom, RandomSource, SecureRandom};
pub use service::VerificationService;
pub use traits::SmsGateway;
pub use types::{SendCodeResult, VerifyCodeResult};
