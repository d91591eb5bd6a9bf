//! Redis-backed verified state

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use mv_core::{DomainError, HolderContext, VerifiedStateStore};

use super::keys::verified_key;
use super::redis_client::RedisClient;

/// One Redis hash per holder: field = canonical number, value = verification time
///
/// With `ttl_seconds` set, the whole hash expires that long after the last
/// number was marked verified.
pub struct RedisVerifiedStateStore {
    redis: Arc<RedisClient>,
    ttl_seconds: Option<u64>,
}

impl RedisVerifiedStateStore {
    pub fn new(redis: Arc<RedisClient>, ttl_seconds: Option<u64>) -> Self {
        Self { redis, ttl_seconds }
    }

    fn key(&self, holder: &HolderContext) -> String {
        verified_key(self.redis.config(), holder.as_str())
    }
}

#[async_trait]
impl VerifiedStateStore for RedisVerifiedStateStore {
    async fn get(&self, holder: &HolderContext, canonical: &str) -> Result<bool, DomainError> {
        let mut pipeline = redis::pipe();
        pipeline.hexists(self.key(holder), canonical);
        let (exists,): (bool,) = self.redis.query_pipeline(pipeline).await?;
        Ok(exists)
    }

    async fn set(&self, holder: &HolderContext, canonical: &str) -> Result<(), DomainError> {
        let key = self.key(holder);

        let mut pipeline = redis::pipe();
        pipeline
            .atomic()
            .hset(&key, canonical, Utc::now().to_rfc3339())
            .ignore();
        if let Some(ttl) = self.ttl_seconds {
            pipeline.expire(&key, ttl as i64).ignore();
        }
        self.redis.query_pipeline::<()>(pipeline).await?;
        Ok(())
    }

    async fn delete(&self, holder: &HolderContext, canonical: &str) -> Result<(), DomainError> {
        let mut pipeline = redis::pipe();
        pipeline.hdel(self.key(holder), canonical).ignore();
        self.redis.query_pipeline::<()>(pipeline).await?;
        Ok(())
    }

    async fn delete_holder(&self, holder: &HolderContext) -> Result<u64, DomainError> {
        let key = self.key(holder);

        let mut pipeline = redis::pipe();
        pipeline.atomic().hlen(&key).del(&key).ignore();
        let (count,): (u64,) = self.redis.query_pipeline(pipeline).await?;
        Ok(count)
    }
}
