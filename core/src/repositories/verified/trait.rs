//! Holder-scoped storage of proven numbers.

use async_trait::async_trait;

use crate::domain::value_objects::HolderContext;
use crate::errors::DomainError;

/// Key-value store of `(holder, canonical) -> verified`
///
/// Entries are created only after a correct code check and never expire on
/// their own; their lifetime is bound to the holder context.
#[async_trait]
pub trait VerifiedStateStore: Send + Sync {
    /// Whether the holder has proven control of the number
    async fn get(&self, holder: &HolderContext, canonical: &str) -> Result<bool, DomainError>;

    /// Record the number as verified for the holder
    async fn set(&self, holder: &HolderContext, canonical: &str) -> Result<(), DomainError>;

    /// Forget the verified state of one number
    async fn delete(&self, holder: &HolderContext, canonical: &str) -> Result<(), DomainError>;

    /// Forget everything recorded for the holder, e.g. on logout
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of entries removed
    async fn delete_holder(&self, holder: &HolderContext) -> Result<u64, DomainError>;
}
