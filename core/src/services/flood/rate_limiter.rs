//! Rate limiting trait for verification attempts

use async_trait::async_trait;

use mv_shared::config::RateLimitConfig;

use crate::errors::DomainResult;

/// Sliding-window event counter
///
/// Keys are canonical numbers. Implementations must stay correct when several
/// attempts for the same key run concurrently, either through a per-key lock
/// or through atomic operations in a shared store.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Whether fewer than the maximum number of events fall inside the window
    async fn allowed(&self, key: &str) -> DomainResult<bool>;

    /// Record one event at the current time and prune aged-out events
    async fn register_event(&self, key: &str) -> DomainResult<()>;

    /// Events still permitted inside the current window
    async fn remaining(&self, key: &str) -> DomainResult<u32>;

    /// Forget every event recorded for the key
    async fn clear(&self, key: &str) -> DomainResult<()>;

    /// Limits the window is enforced with
    fn limits(&self) -> &RateLimitConfig;
}
