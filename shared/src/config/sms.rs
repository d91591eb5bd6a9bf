//! SMS provider configuration module

use serde::{Deserialize, Serialize};

/// Supported SMS providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// No provider: verification is disabled
    None,
    /// Log-only provider for development
    Mock,
    /// Twilio REST API
    Twilio,
    /// Twilio primary sender with a Twilio backup sender
    Failover,
}

impl std::str::FromStr for SmsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "disabled" | "" => Ok(SmsProvider::None),
            "mock" => Ok(SmsProvider::Mock),
            "twilio" => Ok(SmsProvider::Twilio),
            "failover" => Ok(SmsProvider::Failover),
            _ => Err(format!("Invalid SMS provider: {}", s)),
        }
    }
}

/// SMS service configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Which provider delivers verification codes
    pub provider: SmsProvider,
    /// API account identifier
    #[serde(default)]
    pub api_key: String,
    /// API secret/token
    #[serde(default)]
    pub api_secret: String,
    /// Sender phone number
    #[serde(default)]
    pub from_number: String,
    /// Sender used by the failover provider when the primary one fails
    #[serde(default)]
    pub backup_from_number: Option<String>,
    /// Seconds before a failed primary provider is retried
    #[serde(default = "default_failover_timeout")]
    pub failover_timeout_secs: u64,
}

impl std::fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("backup_from_number", &self.backup_from_number)
            .field("failover_timeout_secs", &self.failover_timeout_secs)
            .finish()
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::Mock,
            api_key: String::new(),
            api_secret: String::new(),
            from_number: String::new(),
            backup_from_number: None,
            failover_timeout_secs: default_failover_timeout(),
        }
    }
}

impl SmsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var("SMS_PROVIDER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(SmsProvider::Mock),
            api_key: std::env::var("SMS_API_KEY").unwrap_or_default(),
            api_secret: std::env::var("SMS_API_SECRET").unwrap_or_default(),
            from_number: std::env::var("SMS_FROM_NUMBER").unwrap_or_default(),
            backup_from_number: std::env::var("SMS_BACKUP_FROM_NUMBER").ok(),
            failover_timeout_secs: std::env::var("SMS_FAILOVER_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_failover_timeout),
        }
    }

    /// Configuration without any provider
    pub fn disabled() -> Self {
        Self {
            provider: SmsProvider::None,
            ..Default::default()
        }
    }
}

fn default_failover_timeout() -> u64 {
    30
}
