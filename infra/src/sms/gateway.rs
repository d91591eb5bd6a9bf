//! Bridge from infrastructure SMS providers to the core `SmsGateway`

use async_trait::async_trait;
use std::sync::Arc;

use mv_core::{GatewayError, SmsGateway};

use super::sms_service::SmsService;
use crate::InfrastructureError;

/// Exposes any [`SmsService`] as the core delivery capability
#[derive(Clone)]
pub struct SmsGatewayAdapter {
    inner: Arc<dyn SmsService>,
}

impl SmsGatewayAdapter {
    pub fn new(inner: Arc<dyn SmsService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl SmsGateway for SmsGatewayAdapter {
    async fn send(&self, number: &str, message: &str) -> Result<String, GatewayError> {
        self.inner
            .send_sms(number, message)
            .await
            .map_err(gateway_error)
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

/// Provider failures are refusals; anything else means the provider is unusable
fn gateway_error(error: InfrastructureError) -> GatewayError {
    match error {
        InfrastructureError::Sms(message) => GatewayError::Rejected(message),
        other => GatewayError::Unavailable(other.to_string()),
    }
}
