//! Mock SMS Service Implementation
//!
//! Logs messages instead of sending them. Used in development, where the
//! console stands in for the handset.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use mv_shared::phone::{is_e164, mask_phone_number};

use super::sms_service::SmsService;
use crate::InfrastructureError;

/// Mock SMS service for development and testing
///
/// This implementation:
/// - Prints messages to the console when enabled
/// - Rejects numbers that are not E.164
/// - Generates mock message IDs
/// - Tracks message count and the last message for tests
#[derive(Clone)]
pub struct MockSmsService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures
    simulate_failure: Arc<AtomicBool>,
    /// Whether to print messages to console
    console_output: bool,
    /// Recipient and text of the most recent message
    last_message: Arc<Mutex<Option<(String, String)>>>,
}

impl MockSmsService {
    /// Create a new mock SMS service
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create a mock service with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: Arc::new(AtomicBool::new(simulate_failure)),
            console_output,
            last_message: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the message counter
    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Recipient and text of the most recent successful send
    pub fn last_message(&self) -> Option<(String, String)> {
        self.last_message.lock().ok().and_then(|last| last.clone())
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
    ) -> Result<String, InfrastructureError> {
        if !is_e164(phone_number) {
            return Err(InfrastructureError::Sms(format!(
                "Invalid phone number format: {}",
                mask_phone_number(phone_number)
            )));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                provider = "mock",
                phone = %mask_phone_number(phone_number),
                "Mock SMS service simulating failure"
            );
            return Err(InfrastructureError::Sms(
                "Simulated SMS sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK SMS #{} to {}", count, phone_number);
            println!("{}", message);
            println!("{}\n", "=".repeat(60));
        }

        if let Ok(mut last) = self.last_message.lock() {
            *last = Some((phone_number.to_string(), message.to_string()));
        }

        info!(
            target: "sms_service",
            provider = "mock",
            phone = %mask_phone_number(phone_number),
            message_id = %message_id,
            message_length = message.chars().count(),
            "SMS sent successfully (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }

    async fn is_available(&self) -> bool {
        !self.simulate_failure.load(Ordering::SeqCst)
    }
}
