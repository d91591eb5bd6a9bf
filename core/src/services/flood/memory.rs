//! In-process sliding window

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

use mv_shared::config::RateLimitConfig;

use crate::errors::DomainResult;
use crate::services::clock::Clock;

use super::rate_limiter::RateLimiter;

/// Sliding-window limiter holding event timestamps in memory
///
/// Suitable for single-instance deployments and tests. The whole map sits
/// behind one async mutex, which also serialises concurrent updates per key.
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    events: Arc<Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>>,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            events: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn window(&self) -> Duration {
        Duration::seconds(self.config.window_seconds as i64)
    }

    /// Drop events at or before `now - window`, returning how many remain
    fn prune(queue: &mut VecDeque<DateTime<Utc>>, cutoff: DateTime<Utc>) -> usize {
        while queue.front().is_some_and(|ts| *ts <= cutoff) {
            queue.pop_front();
        }
        queue.len()
    }

    async fn count(&self, key: &str) -> usize {
        let cutoff = self.clock.now() - self.window();
        let mut events = self.events.lock().await;
        let count = match events.get_mut(key) {
            Some(queue) => Self::prune(queue, cutoff),
            None => return 0,
        };
        if count == 0 {
            events.remove(key);
        }
        count
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn allowed(&self, key: &str) -> DomainResult<bool> {
        Ok(self.count(key).await < self.config.max_attempts as usize)
    }

    async fn register_event(&self, key: &str) -> DomainResult<()> {
        let now = self.clock.now();
        let cutoff = now - self.window();
        let mut events = self.events.lock().await;
        let queue = events.entry(key.to_string()).or_default();
        Self::prune(queue, cutoff);
        queue.push_back(now);

        tracing::debug!(
            count = queue.len(),
            max = self.config.max_attempts,
            event = "flood_event_registered",
            "Flood event registered"
        );
        Ok(())
    }

    async fn remaining(&self, key: &str) -> DomainResult<u32> {
        let count = self.count(key).await as u32;
        Ok(self.config.max_attempts.saturating_sub(count))
    }

    async fn clear(&self, key: &str) -> DomainResult<()> {
        self.events.lock().await.remove(key);
        Ok(())
    }

    fn limits(&self) -> &RateLimitConfig {
        &self.config
    }
}
