//! # Infrastructure Layer
//!
//! Concrete implementations of the capabilities `mv_core` consumes:
//!
//! - **Phone**: numbering-plan parser backed by the `phonenumber` crate
//! - **Cache**: Redis client plus Redis challenge and verified-state stores
//! - **Services**: Redis sliding-window flood control
//! - **Database**: MySQL challenge store using SQLx
//! - **SMS**: provider integrations (mock, Twilio, failover) and the gateway adapter
//! - **Telemetry**: tracing subscriber setup
//!
//! ## Features
//!
//! - `mysql`: Enable the MySQL challenge store (default)
//! - `twilio-sms`: Enable the Twilio SMS provider (default)

use std::sync::Arc;

use mv_core::{
    ChallengeStore, DomainError, NumberNormalizer, RateLimiter, VerificationService,
    VerifiedStateStore,
};
use mv_shared::config::{ChallengeBackend, EngineConfig};

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// SMS service module - External SMS providers
pub mod sms;

/// Cache module - Redis client and Redis-backed stores
pub mod cache;

/// Phone module - Numbering-plan parsing
pub mod phone;

/// Services module - Infrastructure service implementations
pub mod services;

/// Telemetry module - Tracing subscriber initialisation
pub mod telemetry;

use cache::{RedisChallengeStore, RedisClient, RedisVerifiedStateStore};
use phone::PhoneNumberParser;
use services::RedisRateLimiter;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Stored data could not be (de)serialised
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Config(message) => DomainError::Config { message },
            other => DomainError::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Wired engine components
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Challenge issue/verify state machine
    pub verification: Arc<VerificationService>,
    /// Number normalizer over the `phonenumber` database
    pub normalizer: NumberNormalizer,
    /// Shared Redis connection
    pub redis: Arc<RedisClient>,
}

impl InfrastructureServices {
    /// Whether the shared Redis connection still answers
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        self.redis.health_check().await
    }
}

/// Initialize infrastructure services from configuration
///
/// This function sets up:
/// - The Redis connection
/// - Challenge, flood and verified-state stores
/// - The SMS gateway
/// - The number normalizer
pub async fn initialize(config: &EngineConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!(
        environment = %config.environment,
        "Initializing infrastructure services..."
    );

    let redis = connect_redis(config).await?;
    let verification = Arc::new(build_with_redis(config, redis.clone()).await?);
    let normalizer = NumberNormalizer::new(Arc::new(PhoneNumberParser::new()));

    tracing::info!(
        enabled = verification.is_enabled(),
        "Infrastructure services initialized successfully"
    );

    Ok(InfrastructureServices {
        verification,
        normalizer,
        redis,
    })
}

/// Build the verification service described by `config`
///
/// Connects to Redis for flood control and verified state. Challenges go to
/// Redis or to MySQL depending on `config.challenge_backend`.
pub async fn build_verification_service(
    config: &EngineConfig,
) -> Result<VerificationService, InfrastructureError> {
    let redis = connect_redis(config).await?;
    build_with_redis(config, redis).await
}

/// Connect and refuse to start against a Redis that does not answer PING
async fn connect_redis(config: &EngineConfig) -> Result<Arc<RedisClient>, InfrastructureError> {
    let redis = RedisClient::new(config.cache.clone()).await?;
    if !redis.health_check().await? {
        return Err(InfrastructureError::General(
            "Redis health check failed".to_string(),
        ));
    }
    Ok(Arc::new(redis))
}

async fn build_with_redis(
    config: &EngineConfig,
    redis: Arc<RedisClient>,
) -> Result<VerificationService, InfrastructureError> {
    let challenges = build_challenge_store(config, redis.clone()).await?;
    let rate_limiter: Arc<dyn RateLimiter> =
        Arc::new(RedisRateLimiter::new(redis.clone(), config.rate_limit.clone()));
    let verified: Arc<dyn VerifiedStateStore> = Arc::new(RedisVerifiedStateStore::new(
        redis,
        config.cache.verified_state_ttl,
    ));
    let gateway = sms::create_sms_gateway(&config.sms)?;

    VerificationService::new(
        config.verification.clone(),
        challenges,
        rate_limiter,
        verified,
        gateway,
    )
    .map_err(|e| InfrastructureError::Config(e.to_string()))
}

async fn build_challenge_store(
    config: &EngineConfig,
    redis: Arc<RedisClient>,
) -> Result<Arc<dyn ChallengeStore>, InfrastructureError> {
    match config.challenge_backend {
        ChallengeBackend::Redis => Ok(Arc::new(RedisChallengeStore::new(
            redis,
            config.verification.challenge_ttl_seconds,
        ))),
        #[cfg(feature = "mysql")]
        ChallengeBackend::Mysql => {
            let pool = database::DatabasePool::new(config.database.clone()).await?;
            if !pool.health_check().await? {
                return Err(InfrastructureError::General(
                    "MySQL health check failed".to_string(),
                ));
            }
            let store = database::MySqlChallengeStore::new(pool.pool());
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "mysql"))]
        ChallengeBackend::Mysql => Err(InfrastructureError::Config(
            "MySQL challenge backend requires the `mysql` feature".to_string(),
        )),
    }
}

/// Load engine configuration from the environment
///
/// A `.env` file is read first when present.
pub fn load_config() -> Result<EngineConfig, InfrastructureError> {
    dotenvy::dotenv().ok();

    let config = EngineConfig::from_env();
    config
        .verification
        .validate()
        .map_err(InfrastructureError::Config)?;
    config
        .rate_limit
        .validate()
        .map_err(InfrastructureError::Config)?;

    Ok(config)
}
