//! Flood control configuration module

use serde::{Deserialize, Serialize};

/// Longest accepted flood window (30 days)
pub const MAX_WINDOW_SECONDS: u64 = 30 * 86_400;

/// Sliding-window limit on verification attempts per canonical number
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Max failed attempts inside the window before the number is blocked
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Window length in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_seconds: default_window_seconds(),
        }
    }
}

impl RateLimitConfig {
    /// Create a configuration with explicit limits
    pub fn new(max_attempts: u32, window_seconds: u64) -> Self {
        Self {
            max_attempts,
            window_seconds,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            max_attempts: std::env::var("MOBILE_NUMBER_FLOOD_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_max_attempts),
            window_seconds: std::env::var("MOBILE_NUMBER_FLOOD_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_window_seconds),
        }
    }

    /// Check the limits for fatal problems
    ///
    /// A zero window would disable flood control and a zero maximum would
    /// block every number, so both are rejected.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("flood control maximum must be at least 1".to_string());
        }
        if !(1..=MAX_WINDOW_SECONDS).contains(&self.window_seconds) {
            return Err(format!(
                "flood window must be between 1 and {} seconds, got {}",
                MAX_WINDOW_SECONDS, self.window_seconds
            ));
        }
        Ok(())
    }

    /// Window length in milliseconds
    pub fn window_millis(&self) -> i64 {
        (self.window_seconds as i64).saturating_mul(1000)
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_window_seconds() -> u64 {
    3600 // 1 hour
}
