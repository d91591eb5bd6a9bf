//! Challenge store trait defining persistence of pending verification challenges.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::VerificationChallenge;
use crate::domain::value_objects::HolderContext;
use crate::errors::DomainError;

/// Persistence for pending challenges, one slot per `(canonical number, holder)`
///
/// State must live outside the process in multi-instance deployments so that a
/// challenge issued on one instance can be verified on another.
///
/// # Security Considerations
/// - Only the code digest is ever stored, never the plaintext code
/// - `consume` must be atomic: two concurrent verifications of the same
///   challenge can never both succeed
/// - Expired challenges should be periodically purged
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    /// Store a challenge, replacing any pending one for the same pair
    ///
    /// # Arguments
    /// * `canonical` - E.164 number the challenge was issued for
    /// * `holder` - Session or principal the challenge belongs to
    /// * `challenge` - Token, code digest and issue time
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::Utc;
    /// # use mv_core::domain::{HolderContext, VerificationChallenge};
    /// # use mv_core::repositories::ChallengeStore;
    /// # async fn example(store: &impl ChallengeStore) -> Result<(), Box<dyn std::error::Error>> {
    /// let holder = HolderContext::new("session-42");
    /// let challenge = VerificationChallenge::new("token".into(), "digest".into(), Utc::now());
    ///
    /// store.put("+12025551234", &holder, &challenge).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn put(
        &self,
        canonical: &str,
        holder: &HolderContext,
        challenge: &VerificationChallenge,
    ) -> Result<(), DomainError>;

    /// Fetch the pending challenge for a pair
    ///
    /// # Returns
    /// * `Ok(Some(VerificationChallenge))` - A challenge is pending, possibly expired
    /// * `Ok(None)` - Nothing pending
    /// * `Err(DomainError)` - Store error occurred
    async fn get(
        &self,
        canonical: &str,
        holder: &HolderContext,
    ) -> Result<Option<VerificationChallenge>, DomainError>;

    /// Delete the pending challenge only if it still carries `token`
    ///
    /// # Returns
    /// * `Ok(true)` - This caller removed the challenge
    /// * `Ok(false)` - The challenge was already consumed or superseded
    /// * `Err(DomainError)` - Store error occurred
    async fn consume(
        &self,
        canonical: &str,
        holder: &HolderContext,
        token: &str,
    ) -> Result<bool, DomainError>;

    /// Delete the pending challenge for a pair, if any
    async fn remove(&self, canonical: &str, holder: &HolderContext) -> Result<(), DomainError>;

    /// Delete every challenge issued before `cutoff`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of challenges removed
    async fn purge_issued_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}
