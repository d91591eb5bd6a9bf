//! Redis flood control tests, run with `cargo test -- --ignored` against a live server

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use mv_core::{MockClock, RateLimiter};
use mv_shared::config::{CacheConfig, RateLimitConfig};

use crate::cache::RedisClient;
use crate::services::RedisRateLimiter;

async fn limiter(max_attempts: u32, window_seconds: u64) -> (RedisRateLimiter, MockClock) {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let prefix = format!("mv_test_flood_{}", uuid::Uuid::new_v4().simple());
    let redis = Arc::new(
        RedisClient::new(CacheConfig::new(url).with_prefix(prefix))
            .await
            .unwrap(),
    );
    let clock = MockClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
    let limiter = RedisRateLimiter::new(redis, RateLimitConfig::new(max_attempts, window_seconds))
        .with_clock(Arc::new(clock.clone()));
    (limiter, clock)
}

#[tokio::test]
#[ignore] // Requires actual Redis server
async fn test_blocks_after_max_events() {
    let (limiter, _clock) = limiter(5, 3600).await;
    let key = "+12025551234";

    for _ in 0..5 {
        assert!(limiter.allowed(key).await.unwrap());
        limiter.register_event(key).await.unwrap();
    }

    assert!(!limiter.allowed(key).await.unwrap());
    assert_eq!(limiter.remaining(key).await.unwrap(), 0);
    assert_eq!(limiter.retry_after(key).await.unwrap(), Some(3600));

    // Other numbers are unaffected
    assert!(limiter.allowed("+12025551235").await.unwrap());
}

#[tokio::test]
#[ignore] // Requires actual Redis server
async fn test_window_slides() {
    let (limiter, clock) = limiter(2, 60).await;
    let key = "+12025551234";

    limiter.register_event(key).await.unwrap();
    clock.advance(Duration::seconds(30));
    limiter.register_event(key).await.unwrap();
    assert!(!limiter.allowed(key).await.unwrap());
    assert_eq!(limiter.retry_after(key).await.unwrap(), Some(30));

    // The first event leaves the window exactly at its boundary
    clock.advance(Duration::seconds(30));
    assert!(limiter.allowed(key).await.unwrap());
    assert_eq!(limiter.remaining(key).await.unwrap(), 1);
    assert_eq!(limiter.retry_after(key).await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires actual Redis server
async fn test_clear_resets_window() {
    let (limiter, _clock) = limiter(1, 3600).await;
    let key = "+12025551234";

    limiter.register_event(key).await.unwrap();
    assert!(!limiter.allowed(key).await.unwrap());

    limiter.clear(key).await.unwrap();
    assert!(limiter.allowed(key).await.unwrap());
    assert_eq!(limiter.remaining(key).await.unwrap(), 1);
}
