//! Configuration module with engine-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `verification` - Hashing secret, code length, challenge lifetime and message
//! - `rate_limit` - Flood control window for verification attempts
//! - `cache` - Redis connection and key layout
//! - `database` - MySQL connection pool for challenge persistence
//! - `sms` - SMS provider selection and credentials
//! - `environment` - Environment detection and logging configuration

pub mod cache;
pub mod database;
pub mod environment;
pub mod rate_limit;
pub mod sms;
pub mod verification;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use rate_limit::RateLimitConfig;
pub use sms::{SmsConfig, SmsProvider};
pub use verification::VerificationConfig;

/// Where pending challenges are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeBackend {
    /// Redis keys with TTL
    Redis,
    /// The `mobile_number_verification` MySQL table
    Mysql,
}

impl Default for ChallengeBackend {
    fn default() -> Self {
        ChallengeBackend::Redis
    }
}

impl std::str::FromStr for ChallengeBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(ChallengeBackend::Redis),
            "mysql" | "database" | "db" => Ok(ChallengeBackend::Mysql),
            _ => Err(format!("Invalid challenge backend: {}", s)),
        }
    }
}

/// Complete engine configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Verification challenge configuration
    pub verification: VerificationConfig,

    /// Flood control configuration
    pub rate_limit: RateLimitConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// MySQL configuration (used when challenges live in the database)
    pub database: DatabaseConfig,

    /// SMS provider configuration
    pub sms: SmsConfig,

    /// Challenge persistence backend
    #[serde(default)]
    pub challenge_backend: ChallengeBackend,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            verification: VerificationConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cache: CacheConfig::default(),
            database: DatabaseConfig::default(),
            sms: SmsConfig::default(),
            challenge_backend: ChallengeBackend::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let challenge_backend = std::env::var("MOBILE_NUMBER_CHALLENGE_BACKEND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Self {
            environment,
            verification: VerificationConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            cache: CacheConfig::from_env(),
            database: DatabaseConfig::from_env(),
            sms: SmsConfig::from_env(),
            challenge_backend,
            logging: LoggingConfig::for_environment(environment),
        }
    }
}
