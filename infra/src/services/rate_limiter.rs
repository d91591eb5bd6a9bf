//! Redis-based sliding-window flood control

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use mv_core::{Clock, DomainResult, RateLimiter, SystemClock};
use mv_shared::config::RateLimitConfig;

use crate::cache::keys::flood_key;
use crate::cache::redis_client::RedisClient;

/// Sorted-set sliding window shared by every instance
///
/// Each registered event is a member scored by its timestamp in milliseconds.
/// Pruning and counting run in one atomic pipeline, so concurrent callers
/// never observe a half-pruned window.
pub struct RedisRateLimiter {
    redis_client: Arc<RedisClient>,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl RedisRateLimiter {
    /// Create a new Redis-based rate limiter
    pub fn new(redis_client: Arc<RedisClient>, config: RateLimitConfig) -> Self {
        Self {
            redis_client,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn key(&self, key: &str) -> String {
        flood_key(self.redis_client.config(), key)
    }

    /// Events at or before this score have left the window
    fn cutoff(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp_millis() - self.config.window_millis()
    }

    /// Prune the window and count what is left
    async fn count(&self, key: &str) -> DomainResult<u32> {
        let redis_key = self.key(key);
        let cutoff = self.cutoff(self.clock.now());

        let mut pipeline = redis::pipe();
        pipeline
            .atomic()
            .zrembyscore(&redis_key, "-inf", cutoff)
            .ignore()
            .zcard(&redis_key);
        let (count,): (u32,) = self.redis_client.query_pipeline(pipeline).await?;
        Ok(count)
    }

    /// Seconds until the oldest event leaves the window, `None` while not blocked
    pub async fn retry_after(&self, key: &str) -> DomainResult<Option<u64>> {
        let redis_key = self.key(key);
        let now = self.clock.now();
        let cutoff = self.cutoff(now);

        let mut pipeline = redis::pipe();
        pipeline
            .atomic()
            .zrembyscore(&redis_key, "-inf", cutoff)
            .ignore()
            .zcard(&redis_key)
            .zrange_withscores(&redis_key, 0, 0);
        let (count, oldest): (u32, Vec<(String, i64)>) =
            self.redis_client.query_pipeline(pipeline).await?;

        if count < self.config.max_attempts {
            return Ok(None);
        }

        let retry_after = oldest
            .first()
            .map(|(_, timestamp)| {
                let millis = timestamp + self.config.window_millis() - now.timestamp_millis();
                (millis.max(0) as u64).div_ceil(1000).max(1)
            })
            .unwrap_or(self.config.window_seconds);
        Ok(Some(retry_after))
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn allowed(&self, key: &str) -> DomainResult<bool> {
        Ok(self.count(key).await? < self.config.max_attempts)
    }

    async fn register_event(&self, key: &str) -> DomainResult<()> {
        let redis_key = self.key(key);
        let now = self.clock.now().timestamp_millis();
        // Unique member so events in the same millisecond are all counted
        let member = format!("{}-{}", now, uuid::Uuid::new_v4().simple());

        let mut pipeline = redis::pipe();
        pipeline
            .atomic()
            .zadd(&redis_key, member, now)
            .ignore()
            .pexpire(&redis_key, self.config.window_millis())
            .ignore();
        self.redis_client.query_pipeline::<()>(pipeline).await?;

        debug!(event = "flood_event_registered", "Flood event registered");
        Ok(())
    }

    async fn remaining(&self, key: &str) -> DomainResult<u32> {
        Ok(self.config.max_attempts.saturating_sub(self.count(key).await?))
    }

    async fn clear(&self, key: &str) -> DomainResult<()> {
        self.redis_client.delete(&[self.key(key)]).await?;
        Ok(())
    }

    fn limits(&self) -> &RateLimitConfig {
        &self.config
    }
}
