//! Twilio SMS Service Implementation
//!
//! Production delivery through the Twilio REST API.
//!
//! ## Features
//!
//! - E.164 recipient check before any request
//! - Retry with exponential backoff on throttling, server errors and timeouts
//! - No retry on client errors
//! - Phone number masking in logs

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use twilio::{Client, OutboundMessage};

use mv_shared::config::SmsConfig;
use mv_shared::phone::{is_e164, mask_phone_number};

use super::sms_service::SmsService;
use crate::InfrastructureError;

/// Twilio limit for a single message body
pub const MAX_MESSAGE_CHARS: usize = 1600;

/// Twilio SMS service configuration
#[derive(Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// From phone number (must be a Twilio phone number)
    pub from_number: String,
    /// Maximum attempts for a failing request
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for a single API request in seconds
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl TwilioConfig {
    /// Build from the engine SMS settings, sending from `from_number`
    pub fn from_sms_config(
        config: &SmsConfig,
        from_number: &str,
    ) -> Result<Self, InfrastructureError> {
        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(InfrastructureError::Config(
                "SMS_API_KEY and SMS_API_SECRET must be set for Twilio".to_string(),
            ));
        }

        if !is_e164(from_number) {
            return Err(InfrastructureError::Config(
                "Twilio sender must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        Ok(Self {
            account_sid: config.api_key.clone(),
            auth_token: config.api_secret.clone(),
            from_number: from_number.to_string(),
            max_retries: 3,
            retry_delay_ms: 1000,
            request_timeout_secs: 30,
        })
    }

    pub fn with_retries(mut self, max_retries: u32, retry_delay_ms: u64) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay_ms = retry_delay_ms;
        self
    }
}

/// What to do after a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryDecision {
    Retry,
    Abort,
}

/// Throttling and server errors are retried, client errors are not
pub(crate) fn retry_decision(error_text: &str) -> RetryDecision {
    let text = error_text.to_lowercase();
    if text.contains("400") || text.contains("invalid") {
        RetryDecision::Abort
    } else {
        RetryDecision::Retry
    }
}

/// Twilio SMS service implementation
pub struct TwilioSmsService {
    client: Client,
    config: TwilioConfig,
}

impl TwilioSmsService {
    /// Create a new Twilio SMS service
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        let client = Client::new(&config.account_sid, &config.auth_token);

        info!(
            from = %mask_phone_number(&config.from_number),
            "Twilio SMS service initialized"
        );

        Ok(Self { client, config })
    }

    /// Recipient and body checks done before talking to Twilio
    pub(crate) fn validate_request(to: &str, message: &str) -> Result<(), InfrastructureError> {
        if !is_e164(to) {
            return Err(InfrastructureError::Sms(
                "Phone number must be in E.164 format (e.g., +14155552671)".to_string(),
            ));
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(InfrastructureError::Sms(format!(
                "Message exceeds maximum length of {} characters",
                MAX_MESSAGE_CHARS
            )));
        }
        Ok(())
    }

    /// Send SMS with retry logic
    async fn send_with_retry(&self, to: &str, message: &str) -> Result<String, InfrastructureError> {
        let max_retries = self.config.max_retries.max(1);
        let timeout = Duration::from_secs(self.config.request_timeout_secs);
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                phone = %mask_phone_number(to),
                "Sending SMS attempt {}/{}",
                attempts,
                max_retries
            );

            let msg = OutboundMessage::new(&self.config.from_number, to, message);
            let error_text = match tokio::time::timeout(timeout, self.client.send_message(msg)).await {
                Ok(Ok(response)) => {
                    info!(
                        phone = %mask_phone_number(to),
                        sid = %response.sid,
                        "SMS sent successfully via Twilio"
                    );
                    return Ok(response.sid);
                }
                Ok(Err(e)) => e.to_string(),
                Err(_) => format!("request timed out after {}s", timeout.as_secs()),
            };

            error!(
                "Failed to send SMS (attempt {}/{}): {}",
                attempts, max_retries, error_text
            );

            if retry_decision(&error_text) == RetryDecision::Abort {
                return Err(InfrastructureError::Sms(format!(
                    "Invalid request: {}",
                    error_text
                )));
            }

            if attempts >= max_retries {
                return Err(InfrastructureError::Sms(format!(
                    "Failed to send SMS after {} attempts: {}",
                    max_retries, error_text
                )));
            }

            warn!("Retrying Twilio request after {:?}", delay);
            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }
}

#[async_trait]
impl SmsService for TwilioSmsService {
    async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
    ) -> Result<String, InfrastructureError> {
        Self::validate_request(phone_number, message)?;
        self.send_with_retry(phone_number, message).await
    }

    fn provider_name(&self) -> &str {
        "Twilio"
    }
}
