//! Redis cache client implementation
//!
//! This module provides a Redis client with a multiplexed connection, retry
//! logic, and the operations the verification stores build on: reads,
//! deletes, atomic pipelines and Lua scripts.

use redis::{
    aio::MultiplexedConnection, AsyncCommands, Client, FromRedisValue, Pipeline, RedisError,
    RedisResult, Script,
};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use mv_shared::config::CacheConfig;

use crate::InfrastructureError;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache client with retry logic
///
/// Cloning is cheap: clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl RedisClient {
    /// Create a new Redis client
    ///
    /// Connection attempts and later operations are retried according to
    /// `config.max_retries` and `config.retry_delay_ms`.
    ///
    /// # Example
    /// ```no_run
    /// use mv_infra::cache::RedisClient;
    /// use mv_shared::config::CacheConfig;
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let config = CacheConfig::new("redis://localhost:6379").with_prefix("mobile_number");
    ///     let client = RedisClient::new(config).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(
            url = %mask_url(&config.url),
            prefix = %config.key_prefix,
            "Creating Redis client"
        );

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, config.max_retries, config.retry_delay_ms)
                .await?;

        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis after {} attempts: {}",
                        attempts, e
                    );
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Configuration this client was created with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get a value, `None` if the key is absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Getting key '{}'", key);

        let key_owned = key.to_string();
        self.execute_with_retry(move |mut conn| {
            let key = key_owned.clone();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to get key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Delete keys, returning how many existed
    pub async fn delete(&self, keys: &[String]) -> Result<u64, InfrastructureError> {
        if keys.is_empty() {
            return Ok(0);
        }
        debug!(count = keys.len(), "Deleting keys");

        let keys_owned = keys.to_vec();
        self.execute_with_retry(move |mut conn| {
            let keys = keys_owned.clone();
            Box::pin(async move { conn.del::<_, u64>(keys).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to delete keys: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    /// Run a pipeline, typically built with `.atomic()`
    pub async fn query_pipeline<T>(&self, pipeline: Pipeline) -> Result<T, InfrastructureError>
    where
        T: FromRedisValue + Send + 'static,
    {
        self.execute_with_retry(move |mut conn| {
            let pipeline = pipeline.clone();
            Box::pin(async move { pipeline.query_async::<_, T>(&mut conn).await })
        })
        .await
        .map_err(|e| {
            error!("Redis pipeline failed: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    /// Invoke a Lua script with the given keys and arguments
    pub async fn run_script<T>(
        &self,
        script: &Script,
        keys: &[String],
        args: &[String],
    ) -> Result<T, InfrastructureError>
    where
        T: FromRedisValue + Send + 'static,
    {
        let script = script.clone();
        let keys = keys.to_vec();
        let args = args.to_vec();
        self.execute_with_retry(move |mut conn| {
            let script = script.clone();
            let keys = keys.clone();
            let args = args.clone();
            Box::pin(async move {
                let mut invocation = script.prepare_invoke();
                for key in &keys {
                    invocation.key(key);
                }
                for arg in &args {
                    invocation.arg(arg);
                }
                invocation.invoke_async::<_, T>(&mut conn).await
            })
        })
        .await
        .map_err(|e| {
            error!("Redis script failed: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await
            .map_err(|e| {
                error!("Redis health check failed: {}", e);
                InfrastructureError::Cache(e)
            })?;

        if response == "PONG" {
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    /// Execute a Redis operation with automatic retry logic
    ///
    /// Only transient failures are retried, with exponential backoff.
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let max_retries = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match operation(conn).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Exponential backoff capped at 5 seconds
fn next_delay(delay: u64) -> u64 {
    (delay * 2).clamp(1, 5000)
}

/// Check if a Redis error is transient and the operation should be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hide the password part of a Redis URL for logs
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            let user = credentials.split(':').next().unwrap_or_default();
            if credentials.contains(':') {
                format!("{}{}:****{}", &url[..scheme_end + 3], user, &url[at..])
            } else {
                format!("{}****{}", &url[..scheme_end + 3], &url[at..])
            }
        }
        _ => url.to_string(),
    }
}
