//! Main verification service implementation

use chrono::Duration;
use std::sync::Arc;

use mv_shared::config::VerificationConfig;
use mv_shared::utils::phone::{mask_phone_number, mask_token};

use crate::domain::entities::VerificationChallenge;
use crate::domain::value_objects::{HolderContext, MobileNumber};
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::repositories::challenge::ChallengeStore;
use crate::repositories::verified::VerifiedStateStore;
use crate::services::clock::{Clock, SystemClock};
use crate::services::flood::RateLimiter;
use crate::services::verified_state::VerifiedStateTracker;

use super::hashing::CodeHasher;
use super::locks::KeyedLocks;
use super::message::{render_message, TokenData};
use super::random::{RandomSource, SecureRandom};
use super::traits::SmsGateway;
use super::types::{SendCodeResult, VerifyCodeResult};

/// Challenge lifecycle for `(number, holder)` pairs
///
/// `Unchallenged -> Pending -> Verified`, where issuing again while pending
/// supersedes the previous token. Flood control gates both issuance and code
/// checks; only failed checks count against the limit.
pub struct VerificationService {
    /// Code length, challenge lifetime and message settings
    config: VerificationConfig,
    /// Keyed digest of codes
    hasher: CodeHasher,
    /// Pending challenges
    challenges: Arc<dyn ChallengeStore>,
    /// Per-number flood control
    rate_limiter: Arc<dyn RateLimiter>,
    /// Holder-scoped verified numbers
    tracker: VerifiedStateTracker,
    /// Outbound SMS, `None` disables verification
    gateway: Option<Arc<dyn SmsGateway>>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    /// In-process serialisation per canonical number
    locks: KeyedLocks,
}

impl VerificationService {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `config` - Secret, code length, challenge lifetime and message template
    /// * `challenges` - Challenge store implementation
    /// * `rate_limiter` - Flood control implementation
    /// * `verified` - Holder-scoped verified-state store
    /// * `gateway` - SMS gateway, `None` when verification is disabled
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::Config)` - The configuration or the flood limits are unusable
    pub fn new(
        config: VerificationConfig,
        challenges: Arc<dyn ChallengeStore>,
        rate_limiter: Arc<dyn RateLimiter>,
        verified: Arc<dyn VerifiedStateStore>,
        gateway: Option<Arc<dyn SmsGateway>>,
    ) -> DomainResult<Self> {
        config
            .validate()
            .map_err(|message| DomainError::Config { message })?;
        rate_limiter
            .limits()
            .validate()
            .map_err(|message| DomainError::Config { message })?;
        let hasher = CodeHasher::new(&config.secret)?;

        if gateway.is_none() {
            tracing::warn!(
                event = "verification_disabled",
                "No SMS gateway configured, verification is disabled"
            );
        }

        Ok(Self {
            config,
            hasher,
            challenges,
            rate_limiter,
            tracker: VerifiedStateTracker::new(verified),
            gateway,
            clock: Arc::new(SystemClock),
            random: Arc::new(SecureRandom),
            locks: KeyedLocks::new(),
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the code and token source
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Whether an SMS gateway is configured
    pub fn is_enabled(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn tracker(&self) -> &VerifiedStateTracker {
        &self.tracker
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Issue a challenge and deliver its code
    ///
    /// This method:
    /// 1. Checks flood control for the number
    /// 2. Generates a code and a fresh token
    /// 3. Stores the code digest, superseding any pending challenge of the holder
    /// 4. Renders the message and sends it
    ///
    /// # Arguments
    ///
    /// * `number` - Normalized number to challenge
    /// * `holder` - Session or principal the challenge belongs to
    /// * `message` - Template override; `None` uses the configured template
    /// * `token_data` - Extra `[key]` replacements for the message
    ///
    /// # Returns
    ///
    /// * `Ok(SendCodeResult)` - Token and delivery details
    /// * `Err(DomainError)` - `Disabled`, `TooManyAttempts`, `SendFailed` or a store error
    pub async fn issue(
        &self,
        number: &MobileNumber,
        holder: &HolderContext,
        message: Option<&str>,
        token_data: &TokenData,
    ) -> DomainResult<SendCodeResult> {
        let gateway = self
            .gateway
            .as_ref()
            .ok_or(VerificationError::Disabled)?;

        let canonical = number.canonical();
        let _guard = self.locks.lock(canonical).await;

        if !self.rate_limiter.allowed(canonical).await? {
            tracing::warn!(
                phone = %mask_phone_number(canonical),
                holder = %holder.log_id(),
                event = "flood_limit_reached",
                "Verification issuance blocked by flood control"
            );
            return Err(VerificationError::TooManyAttempts.into());
        }

        let code = self.random.numeric_code(self.config.code_length);
        let token = self.random.token();
        let issued_at = self.clock.now();
        let challenge = VerificationChallenge::new(
            token.clone(),
            self.hasher.hash(canonical, &token, &code),
            issued_at,
        );

        self.challenges.put(canonical, holder, &challenge).await?;

        let template = message.unwrap_or(self.config.message_template.as_str());
        let rendered = render_message(template, &code, &self.config.site_name, token_data);

        let message_id = match gateway.send(canonical, &rendered).await {
            Ok(message_id) => message_id,
            Err(reason) => {
                tracing::warn!(
                    phone = %mask_phone_number(canonical),
                    provider = gateway.provider_name(),
                    reason = %reason,
                    event = "verification_send_failed",
                    "Failed to deliver verification code"
                );
                // Leave no usable challenge behind
                if let Err(e) = self.challenges.consume(canonical, holder, &token).await {
                    tracing::error!(
                        phone = %mask_phone_number(canonical),
                        error = %e,
                        event = "challenge_cleanup_failed",
                        "Failed to remove undelivered challenge"
                    );
                }
                return Err(VerificationError::SendFailed.into());
            }
        };

        tracing::info!(
            phone = %mask_phone_number(canonical),
            holder = %holder.log_id(),
            token = %mask_token(&token),
            provider = gateway.provider_name(),
            message_id = %message_id,
            event = "verification_issued",
            "Verification code sent"
        );

        Ok(SendCodeResult {
            token,
            message_id,
            issued_at,
            expires_at: challenge.expires_at(self.config.challenge_ttl_seconds),
        })
    }

    /// Check a submitted code against the pending challenge
    ///
    /// Fails with `Disabled`, before flood control is consulted, when no
    /// gateway is configured. A missing challenge and a token mismatch both
    /// report `NoPendingChallenge`. Every failed check of a submitted code registers
    /// one flood event; an empty code is rejected without one.
    ///
    /// # Arguments
    ///
    /// * `number` - Normalized number being verified
    /// * `holder` - Session or principal the challenge belongs to
    /// * `token` - Token returned by `issue`; `None` uses the holder's pending token
    /// * `code` - Code the holder received
    pub async fn verify(
        &self,
        number: &MobileNumber,
        holder: &HolderContext,
        token: Option<&str>,
        code: &str,
    ) -> DomainResult<VerifyCodeResult> {
        if self.gateway.is_none() {
            return Err(VerificationError::Disabled.into());
        }

        let canonical = number.canonical();
        let _guard = self.locks.lock(canonical).await;

        if !self.rate_limiter.allowed(canonical).await? {
            tracing::warn!(
                phone = %mask_phone_number(canonical),
                holder = %holder.log_id(),
                event = "flood_limit_reached",
                "Verification attempt blocked by flood control"
            );
            return Err(VerificationError::TooManyAttempts.into());
        }

        let code = code.trim();
        if code.is_empty() {
            return Err(VerificationError::WrongCode.into());
        }

        let challenge = match self.challenges.get(canonical, holder).await? {
            Some(challenge) => challenge,
            None => return self.fail(number, holder, VerificationError::NoPendingChallenge).await,
        };

        let token = token.unwrap_or(challenge.token.as_str());
        if !challenge.token_matches(token) {
            return self.fail(number, holder, VerificationError::NoPendingChallenge).await;
        }

        let now = self.clock.now();
        if challenge.is_expired(now, self.config.challenge_ttl_seconds) {
            return self.fail(number, holder, VerificationError::Expired).await;
        }

        if !self.hasher.matches(&challenge.code_hash, canonical, token, code) {
            return self.fail(number, holder, VerificationError::WrongCode).await;
        }

        // Single use: a concurrent winner on another instance leaves nothing to consume
        if !self.challenges.consume(canonical, holder, token).await? {
            return self.fail(number, holder, VerificationError::NoPendingChallenge).await;
        }

        self.tracker.mark_verified(holder, number).await?;

        Ok(VerifyCodeResult {
            canonical: canonical.to_string(),
            verified_at: now,
        })
    }

    async fn fail<T>(
        &self,
        number: &MobileNumber,
        holder: &HolderContext,
        error: VerificationError,
    ) -> DomainResult<T> {
        self.rate_limiter.register_event(number.canonical()).await?;
        tracing::info!(
            phone = %mask_phone_number(number.canonical()),
            holder = %holder.log_id(),
            reason = error.code(),
            event = "verification_failed",
            "Verification attempt failed"
        );
        Err(error.into())
    }

    /// A non-expired challenge is pending for the pair
    pub async fn has_pending_challenge(
        &self,
        number: &MobileNumber,
        holder: &HolderContext,
    ) -> DomainResult<bool> {
        let now = self.clock.now();
        Ok(self
            .challenges
            .get(number.canonical(), holder)
            .await?
            .is_some_and(|c| !c.is_expired(now, self.config.challenge_ttl_seconds)))
    }

    pub async fn is_verified(&self, number: &MobileNumber, holder: &HolderContext) -> DomainResult<bool> {
        self.tracker.is_verified(holder, number).await
    }

    /// Forget the holder's verified state and pending challenge for the number
    pub async fn reset_verified(&self, number: &MobileNumber, holder: &HolderContext) -> DomainResult<()> {
        self.challenges.remove(number.canonical(), holder).await?;
        self.tracker.reset(holder, number).await
    }

    /// Failed attempts still permitted in the current flood window
    pub async fn remaining_attempts(&self, number: &MobileNumber) -> DomainResult<u32> {
        self.rate_limiter.remaining(number.canonical()).await
    }

    /// Delete challenges that can no longer be verified
    pub async fn purge_expired_challenges(&self) -> DomainResult<u64> {
        let cutoff = self.clock.now() - Duration::seconds(self.config.challenge_ttl_seconds);
        let purged = self.challenges.purge_issued_before(cutoff).await?;
        if purged > 0 {
            tracing::info!(
                purged = purged,
                event = "expired_challenges_purged",
                "Expired verification challenges purged"
            );
        }
        Ok(purged)
    }
}
