//! Redis-backed challenge store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::Script;
use std::sync::Arc;
use tracing::debug;

use mv_core::{
    ChallengeStore, DomainError, HolderContext, VerificationChallenge, CHALLENGE_GRACE_SECONDS,
};
use mv_shared::utils::phone::mask_phone_number;

use super::keys::{challenge_index_key, challenge_key};
use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Delete the challenge only when its stored token equals ARGV[1]
const CONSUME_SCRIPT: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then
  return 0
end
local ok, challenge = pcall(cjson.decode, raw)
if not ok or challenge['token'] ~= ARGV[1] then
  return 0
end
redis.call('DEL', KEYS[1])
redis.call('ZREM', KEYS[2], KEYS[1])
return 1
"#;

/// Delete every indexed challenge scored strictly below ARGV[1]
const PURGE_SCRIPT: &str = r#"
local bound = '(' .. ARGV[1]
local keys = redis.call('ZRANGEBYSCORE', KEYS[1], '-inf', bound)
local removed = 0
for _, key in ipairs(keys) do
  removed = removed + redis.call('DEL', key)
end
redis.call('ZREMRANGEBYSCORE', KEYS[1], '-inf', bound)
return removed
"#;

/// Challenges as JSON strings with a key TTL of lifetime plus grace
///
/// Keys outlive the challenge by [`CHALLENGE_GRACE_SECONDS`] so a late check
/// is still reported as expired rather than as missing. An index sorted set
/// keyed by issue time backs `purge_issued_before`.
pub struct RedisChallengeStore {
    redis: Arc<RedisClient>,
    challenge_ttl_seconds: i64,
    consume_script: Script,
    purge_script: Script,
}

impl RedisChallengeStore {
    pub fn new(redis: Arc<RedisClient>, challenge_ttl_seconds: i64) -> Self {
        Self {
            redis,
            challenge_ttl_seconds,
            consume_script: Script::new(CONSUME_SCRIPT),
            purge_script: Script::new(PURGE_SCRIPT),
        }
    }

    /// Redis expiry applied to challenge keys
    pub fn key_ttl_seconds(&self) -> u64 {
        (self.challenge_ttl_seconds.max(0) + CHALLENGE_GRACE_SECONDS) as u64
    }

    fn key(&self, canonical: &str, holder: &HolderContext) -> String {
        challenge_key(self.redis.config(), canonical, holder.as_str())
    }

    fn index_key(&self) -> String {
        challenge_index_key(self.redis.config())
    }
}

#[async_trait]
impl ChallengeStore for RedisChallengeStore {
    async fn put(
        &self,
        canonical: &str,
        holder: &HolderContext,
        challenge: &VerificationChallenge,
    ) -> Result<(), DomainError> {
        let key = self.key(canonical, holder);
        let value = serde_json::to_string(challenge).map_err(InfrastructureError::from)?;

        let mut pipeline = redis::pipe();
        pipeline
            .atomic()
            .set_ex(&key, value, self.key_ttl_seconds())
            .ignore()
            .zadd(self.index_key(), &key, challenge.issued_at.timestamp_millis())
            .ignore();
        self.redis.query_pipeline::<()>(pipeline).await?;

        debug!(
            phone = %mask_phone_number(canonical),
            event = "challenge_stored",
            "Challenge stored in Redis"
        );
        Ok(())
    }

    async fn get(
        &self,
        canonical: &str,
        holder: &HolderContext,
    ) -> Result<Option<VerificationChallenge>, DomainError> {
        let raw = self.redis.get(&self.key(canonical, holder)).await?;
        match raw {
            Some(raw) => {
                let challenge = serde_json::from_str(&raw).map_err(InfrastructureError::from)?;
                Ok(Some(challenge))
            }
            None => Ok(None),
        }
    }

    async fn consume(
        &self,
        canonical: &str,
        holder: &HolderContext,
        token: &str,
    ) -> Result<bool, DomainError> {
        let keys = [self.key(canonical, holder), self.index_key()];
        let removed: i64 = self
            .redis
            .run_script(&self.consume_script, &keys, &[token.to_string()])
            .await?;
        Ok(removed == 1)
    }

    async fn remove(&self, canonical: &str, holder: &HolderContext) -> Result<(), DomainError> {
        let key = self.key(canonical, holder);

        let mut pipeline = redis::pipe();
        pipeline
            .atomic()
            .del(&key)
            .ignore()
            .zrem(self.index_key(), &key)
            .ignore();
        self.redis.query_pipeline::<()>(pipeline).await?;
        Ok(())
    }

    async fn purge_issued_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let removed: i64 = self
            .redis
            .run_script(
                &self.purge_script,
                &[self.index_key()],
                &[cutoff.timestamp_millis().to_string()],
            )
            .await?;

        debug!(removed, event = "challenges_purged", "Purged challenges from Redis");
        Ok(removed.max(0) as u64)
    }
}
