//! SMS Service Module
//!
//! Delivery of rendered verification messages through pluggable providers.
//!
//! ## Features
//!
//! - **SMS Service Trait**: Common interface for all SMS providers
//! - **Mock Implementation**: Console output for development
//! - **Twilio Support**: Production SMS via Twilio API
//! - **Failover**: Twilio primary sender with a Twilio backup sender
//! - **Gateway Adapter**: Any provider as the core `SmsGateway`

use std::sync::Arc;
use std::time::Duration;

use mv_core::SmsGateway;
use mv_shared::config::{SmsConfig, SmsProvider};

use crate::InfrastructureError;

pub mod failover_sms;
pub mod gateway;
pub mod mock_sms;
pub mod sms_service;

// Twilio SMS service (feature-gated)
#[cfg(feature = "twilio-sms")]
pub mod twilio;

pub use failover_sms::FailoverSmsService;
pub use gateway::SmsGatewayAdapter;
pub use mock_sms::MockSmsService;
pub use sms_service::SmsService;

#[cfg(feature = "twilio-sms")]
pub use twilio::{TwilioConfig, TwilioSmsService};

#[cfg(test)]
mod tests;

/// Create the SMS provider selected by `config`
///
/// # Returns
///
/// * `Ok(None)` - `SmsProvider::None`, verification stays disabled
/// * `Ok(Some(service))` - The configured provider
/// * `Err(InfrastructureError::Config)` - The provider is selected but unusable
pub fn create_sms_service(
    config: &SmsConfig,
) -> Result<Option<Box<dyn SmsService>>, InfrastructureError> {
    match config.provider {
        SmsProvider::None => Ok(None),
        SmsProvider::Mock => Ok(Some(Box::new(MockSmsService::new()))),
        SmsProvider::Twilio => create_twilio_service(config, &config.from_number).map(Some),
        SmsProvider::Failover => {
            let backup_from = config.backup_from_number.as_deref().ok_or_else(|| {
                InfrastructureError::Config(
                    "SMS_BACKUP_FROM_NUMBER is required for the failover provider".to_string(),
                )
            })?;
            let primary = create_twilio_service(config, &config.from_number)?;
            let backup = create_twilio_service(config, backup_from)?;
            Ok(Some(Box::new(FailoverSmsService::new(
                primary,
                backup,
                Duration::from_secs(config.failover_timeout_secs),
            ))))
        }
    }
}

#[cfg(feature = "twilio-sms")]
fn create_twilio_service(
    config: &SmsConfig,
    from_number: &str,
) -> Result<Box<dyn SmsService>, InfrastructureError> {
    let twilio_config = TwilioConfig::from_sms_config(config, from_number)?;
    Ok(Box::new(TwilioSmsService::new(twilio_config)?))
}

#[cfg(not(feature = "twilio-sms"))]
fn create_twilio_service(
    _config: &SmsConfig,
    _from_number: &str,
) -> Result<Box<dyn SmsService>, InfrastructureError> {
    Err(InfrastructureError::Config(
        "Twilio delivery requires the `twilio-sms` feature".to_string(),
    ))
}

/// Create the core gateway for `config`, `None` disables verification
pub fn create_sms_gateway(
    config: &SmsConfig,
) -> Result<Option<Arc<dyn SmsGateway>>, InfrastructureError> {
    let Some(service) = create_sms_service(config)? else {
        tracing::warn!(
            event = "sms_provider_none",
            "No SMS provider configured, verification is disabled"
        );
        return Ok(None);
    };

    tracing::info!(provider = service.provider_name(), "SMS gateway ready");
    let gateway: Arc<dyn SmsGateway> = Arc::new(SmsGatewayAdapter::new(Arc::from(service)));
    Ok(Some(gateway))
}
