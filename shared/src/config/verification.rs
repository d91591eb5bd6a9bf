//! Verification challenge configuration module

use serde::{Deserialize, Serialize};

/// Shortest accepted verification code
pub const MIN_CODE_LENGTH: usize = 4;

/// Longest accepted verification code
pub const MAX_CODE_LENGTH: usize = 10;

/// Longest accepted challenge lifetime (30 days)
pub const MAX_CHALLENGE_TTL_SECONDS: i64 = 30 * 86_400;

/// Configuration for issuing and checking verification challenges
///
/// The `secret` keys the code digest. Rotating it invalidates every
/// pending challenge.
#[derive(Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Deployment-level hashing key
    pub secret: String,

    /// Number of digits in a generated code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Challenge lifetime in seconds
    #[serde(default = "default_challenge_ttl")]
    pub challenge_ttl_seconds: i64,

    /// Site identity substituted for `!site_name`
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Default SMS template; `!code` and `!site_name` are substituted
    #[serde(default = "default_message_template")]
    pub message_template: String,
}

impl std::fmt::Debug for VerificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationConfig")
            .field("secret", &"<redacted>")
            .field("code_length", &self.code_length)
            .field("challenge_ttl_seconds", &self.challenge_ttl_seconds)
            .field("site_name", &self.site_name)
            .field("message_template", &self.message_template)
            .finish()
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            code_length: default_code_length(),
            challenge_ttl_seconds: default_challenge_ttl(),
            site_name: default_site_name(),
            message_template: default_message_template(),
        }
    }
}

impl VerificationConfig {
    /// Create a configuration with the given secret and default settings
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("MOBILE_NUMBER_SECRET").unwrap_or_default(),
            code_length: std::env::var("MOBILE_NUMBER_CODE_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.code_length),
            challenge_ttl_seconds: std::env::var("MOBILE_NUMBER_CHALLENGE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.challenge_ttl_seconds),
            site_name: std::env::var("MOBILE_NUMBER_SITE_NAME").unwrap_or(defaults.site_name),
            message_template: std::env::var("MOBILE_NUMBER_MESSAGE")
                .unwrap_or(defaults.message_template),
        }
    }

    /// Set the code length
    pub fn with_code_length(mut self, length: usize) -> Self {
        self.code_length = length;
        self
    }

    /// Set the challenge lifetime in seconds
    pub fn with_challenge_ttl(mut self, seconds: i64) -> Self {
        self.challenge_ttl_seconds = seconds;
        self
    }

    /// Set the site name used in messages
    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = site_name.into();
        self
    }

    /// Check the configuration for fatal problems
    pub fn validate(&self) -> Result<(), String> {
        if self.secret.trim().is_empty() {
            return Err("verification secret must not be empty".to_string());
        }
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&self.code_length) {
            return Err(format!(
                "code length must be between {} and {}, got {}",
                MIN_CODE_LENGTH, MAX_CODE_LENGTH, self.code_length
            ));
        }
        if !(1..=MAX_CHALLENGE_TTL_SECONDS).contains(&self.challenge_ttl_seconds) {
            return Err(format!(
                "challenge lifetime must be between 1 and {} seconds, got {}",
                MAX_CHALLENGE_TTL_SECONDS, self.challenge_ttl_seconds
            ));
        }
        Ok(())
    }
}

fn default_code_length() -> usize {
    4
}

fn default_challenge_ttl() -> i64 {
    86_400 // 24 hours
}

fn default_site_name() -> String {
    String::from("our site")
}

fn default_message_template() -> String {
    String::from("Your verification code for !site_name is !code")
}
