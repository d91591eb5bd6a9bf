//! Verified-state tracking on top of a holder-scoped store

use std::sync::Arc;

use mv_shared::utils::phone::mask_phone_number;

use crate::domain::value_objects::{FieldValue, HolderContext, MobileNumber};
use crate::errors::DomainResult;
use crate::repositories::verified::VerifiedStateStore;

/// Which numbers each holder has proven
///
/// State is keyed by canonical value, so reformatting the raw input of an
/// already verified number keeps it verified. Entries never flip back to
/// unverified on their own; only `reset`, `reset_holder` and
/// `record_value_change` remove them.
#[derive(Clone)]
pub struct VerifiedStateTracker {
    store: Arc<dyn VerifiedStateStore>,
}

impl VerifiedStateTracker {
    pub fn new(store: Arc<dyn VerifiedStateStore>) -> Self {
        Self { store }
    }

    pub async fn is_verified(&self, holder: &HolderContext, number: &MobileNumber) -> DomainResult<bool> {
        self.store.get(holder, number.canonical()).await
    }

    pub async fn mark_verified(&self, holder: &HolderContext, number: &MobileNumber) -> DomainResult<()> {
        self.store.set(holder, number.canonical()).await?;
        tracing::info!(
            phone = %mask_phone_number(number.canonical()),
            holder = %holder.log_id(),
            event = "number_verified",
            "Number marked verified"
        );
        Ok(())
    }

    pub async fn reset(&self, holder: &HolderContext, number: &MobileNumber) -> DomainResult<()> {
        self.reset_canonical(holder, number.canonical()).await
    }

    /// Forget every verified number of the holder
    pub async fn reset_holder(&self, holder: &HolderContext) -> DomainResult<u64> {
        let removed = self.store.delete_holder(holder).await?;
        tracing::info!(
            holder = %holder.log_id(),
            removed = removed,
            event = "verified_state_cleared",
            "Verified state cleared for holder"
        );
        Ok(removed)
    }

    /// Verified for the holder, or previously stored as verified with the same canonical value
    pub async fn carry_over(
        &self,
        holder: &HolderContext,
        number: &MobileNumber,
        stored: Option<&FieldValue>,
    ) -> DomainResult<bool> {
        if self.is_verified(holder, number).await? {
            return Ok(true);
        }
        Ok(stored.is_some_and(|value| value.verified && number.same_line(&value.canonical)))
    }

    /// Drop verification of the old value when the stored number changes
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The canonical value changed and the old state was reset
    /// * `Ok(false)` - Same line or nothing stored before
    pub async fn record_value_change(
        &self,
        holder: &HolderContext,
        old_canonical: Option<&str>,
        new: &MobileNumber,
    ) -> DomainResult<bool> {
        match old_canonical {
            Some(old) if !old.is_empty() && !new.same_line(old) => {
                self.reset_canonical(holder, old).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn reset_canonical(&self, holder: &HolderContext, canonical: &str) -> DomainResult<()> {
        self.store.delete(holder, canonical).await?;
        tracing::info!(
            phone = %mask_phone_number(canonical),
            holder = %holder.log_id(),
            event = "verified_state_reset",
            "Verified state reset"
        );
        Ok(())
    }
}
