//! Cache module for Redis-based storage
//!
//! This module provides the Redis client with retry logic and the Redis
//! implementations of the challenge and verified-state stores.

pub mod challenge_store;
pub mod keys;
pub mod redis_client;
pub mod verified_store;

#[cfg(test)]
mod tests;

pub use challenge_store::RedisChallengeStore;
pub use redis_client::RedisClient;
pub use verified_store::RedisVerifiedStateStore;

// Re-export commonly used types
pub use mv_shared::config::cache::CacheConfig;
