//! SMS provider interface
//!
//! Providers deliver already rendered text; message wording is decided by
//! the verification service.

use async_trait::async_trait;

use crate::InfrastructureError;

/// SMS provider trait for sending text messages
///
/// Implementations include:
/// - Twilio SMS API
/// - Failover between two providers
/// - Mock implementation for development
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Send an SMS message to a phone number
    ///
    /// # Arguments
    ///
    /// * `phone_number` - The recipient's phone number (E.164 format)
    /// * `message` - The message content to send
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider identifier for the sent message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_sms(&self, phone_number: &str, message: &str)
        -> Result<String, InfrastructureError>;

    /// Get the service provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is available
    ///
    /// Default implementation always returns true.
    async fn is_available(&self) -> bool {
        true
    }
}
