//! Shared configuration and utilities for the mobile number verification engine
//!
//! This crate provides common functionality used across all workspace members:
//! - Configuration types and environment loading
//! - Phone number helpers for logging (masking, E.164 shape checks)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    CacheConfig, ChallengeBackend, DatabaseConfig, EngineConfig, Environment, LogFormat,
    LoggingConfig, RateLimitConfig, SmsConfig, SmsProvider, VerificationConfig,
};
pub use utils::phone;
