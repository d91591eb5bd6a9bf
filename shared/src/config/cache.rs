//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Redis configuration for challenges, flood events and verified state
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Prefix applied to every key written by the engine
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Maximum number of attempts for a failing Redis operation
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubled each attempt)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Lifetime of a holder's verified-state hash in seconds (`None` keeps it)
    #[serde(default)]
    pub verified_state_ttl: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            key_prefix: default_key_prefix(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            verified_state_ttl: None,
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let key_prefix = std::env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| default_key_prefix());
        let verified_state_ttl = std::env::var("MOBILE_NUMBER_VERIFIED_TTL")
            .ok()
            .and_then(|v| v.parse().ok());

        Self {
            url,
            key_prefix,
            verified_state_ttl,
            ..Default::default()
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the retry policy
    pub fn with_retries(mut self, max_retries: u32, retry_delay_ms: u64) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.key_prefix, key)
        }
    }
}

fn default_key_prefix() -> String {
    String::from("mobile_number")
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}
