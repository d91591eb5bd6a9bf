//! Field submission validation

use std::sync::Arc;

use mv_shared::utils::phone::mask_phone_number;

use crate::domain::value_objects::{FieldValue, HolderContext};
use crate::errors::{DomainResult, PolicyError};
use crate::repositories::registry::NumberRegistry;
use crate::services::number::NumberNormalizer;
use crate::services::verification::VerificationService;
use crate::services::verified_state::VerifiedStateTracker;

use super::types::{FieldPolicy, FieldSubmission, UniquenessPolicy, VerificationRequirement};

/// Turns a raw submission into the value a field stores
#[derive(Clone)]
pub struct SubmissionValidator {
    normalizer: NumberNormalizer,
    tracker: VerifiedStateTracker,
    registry: Arc<dyn NumberRegistry>,
    verification_enabled: bool,
}

impl SubmissionValidator {
    pub fn new(
        normalizer: NumberNormalizer,
        tracker: VerifiedStateTracker,
        registry: Arc<dyn NumberRegistry>,
        verification_enabled: bool,
    ) -> Self {
        Self {
            normalizer,
            tracker,
            registry,
            verification_enabled,
        }
    }

    /// Share the tracker and enabled state of a running service
    pub fn for_service(
        normalizer: NumberNormalizer,
        service: &VerificationService,
        registry: Arc<dyn NumberRegistry>,
    ) -> Self {
        Self::new(
            normalizer,
            service.tracker().clone(),
            registry,
            service.is_enabled(),
        )
    }

    /// Validate a submission against the field policy
    ///
    /// Checks run in this order, first failure wins:
    /// 1. Normalization (the single allowed region is the default hint)
    /// 2. Region allow-list
    /// 3. `Required` verification, unless the submitter may bypass it
    /// 4. Two-factor flag on an unverified number
    /// 5. Uniqueness, only when the number differs from the stored one
    ///
    /// On success a change of canonical value resets the old number's
    /// verified state for the holder.
    ///
    /// # Arguments
    ///
    /// * `holder` - Session or principal submitting the value
    /// * `policy` - Field settings
    /// * `submission` - Raw input
    /// * `stored` - Value currently stored in the field, if any
    pub async fn validate(
        &self,
        holder: &HolderContext,
        policy: &FieldPolicy,
        submission: &FieldSubmission,
        stored: Option<&FieldValue>,
    ) -> DomainResult<FieldValue> {
        let hint = submission
            .region
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .or_else(|| policy.single_region());

        let number = self
            .normalizer
            .normalize(&submission.raw, hint, &policy.allowed_types)?;

        if !policy.region_allowed(number.region()) {
            return Err(PolicyError::RegionNotAllowed.into());
        }

        let verified = self.tracker.carry_over(holder, &number, stored).await?;

        if policy.effective_verification(self.verification_enabled) == VerificationRequirement::Required
            && !verified
            && !submission.bypass_verification
        {
            return Err(PolicyError::VerificationRequired.into());
        }

        let tfa = policy.tfa_enabled && submission.tfa;
        if tfa && !verified {
            return Err(PolicyError::TfaRequiresVerification.into());
        }

        let changed = stored.map_or(true, |value| !number.same_line(&value.canonical));
        if policy.uniqueness != UniquenessPolicy::No && changed {
            let verified_only = policy.uniqueness == UniquenessPolicy::YesVerified;
            if self.registry.exists(number.canonical(), verified_only).await? {
                tracing::info!(
                    phone = %mask_phone_number(number.canonical()),
                    event = "number_not_unique",
                    "Submitted number already in use"
                );
                return Err(PolicyError::NotUnique.into());
            }
        }

        self.tracker
            .record_value_change(holder, stored.map(|v| v.canonical.as_str()), &number)
            .await?;

        Ok(FieldValue {
            canonical: number.canonical().to_string(),
            region: number.region().to_string(),
            local_number: number.national_number().to_string(),
            verified,
            tfa,
        })
    }
}
