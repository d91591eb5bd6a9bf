//! Lookup of numbers already stored by other owners.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Answers uniqueness questions for field submissions
#[async_trait]
pub trait NumberRegistry: Send + Sync {
    /// Whether any stored value already uses `canonical`
    ///
    /// # Arguments
    /// * `canonical` - E.164 number to look up
    /// * `verified_only` - Count only values that were stored as verified
    async fn exists(&self, canonical: &str, verified_only: bool) -> Result<bool, DomainError>;
}
