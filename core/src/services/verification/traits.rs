//! Trait for SMS delivery integration

use async_trait::async_trait;

use crate::errors::GatewayError;

/// Outbound SMS capability
///
/// A deployment without a gateway has verification disabled.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Deliver a rendered message to an E.164 number
    ///
    /// Returns the provider's message id.
    async fn send(&self, number: &str, message: &str) -> Result<String, GatewayError>;

    /// Provider identifier for logs
    fn provider_name(&self) -> &str;
}
