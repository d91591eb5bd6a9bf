//! Random codes and tokens

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, Rng, RngCore};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Bytes of entropy in a challenge token
pub const TOKEN_BYTES: usize = 32;

/// Source of verification codes and challenge tokens
pub trait RandomSource: Send + Sync {
    /// Uniformly random decimal code of exactly `length` digits, zero padded
    fn numeric_code(&self, length: usize) -> String;

    /// Unique opaque token for one issuance
    fn token(&self) -> String;
}

/// Operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureRandom;

impl RandomSource for SecureRandom {
    fn numeric_code(&self, length: usize) -> String {
        let upper = 10u64.pow(length as u32);
        let value = OsRng.gen_range(0..upper);
        format!("{:0width$}", value, width = length)
    }

    fn token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

/// Scripted values for deterministic tests
///
/// Values are handed out in order; once a queue runs dry its last value
/// repeats.
#[derive(Debug)]
pub struct FixedRandom {
    codes: Mutex<VecDeque<String>>,
    tokens: Mutex<VecDeque<String>>,
}

impl FixedRandom {
    pub fn new(code: &str, token: &str) -> Self {
        Self::with_sequence(&[code], &[token])
    }

    pub fn with_sequence(codes: &[&str], tokens: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            tokens: Mutex::new(tokens.iter().map(|t| t.to_string()).collect()),
        }
    }

    fn next(queue: &Mutex<VecDeque<String>>) -> String {
        let mut queue = match queue.lock() {
            Ok(queue) => queue,
            Err(poisoned) => poisoned.into_inner(),
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_default()
        } else {
            queue.front().cloned().unwrap_or_default()
        }
    }
}

impl RandomSource for FixedRandom {
    fn numeric_code(&self, _length: usize) -> String {
        Self::next(&self.codes)
    }

    fn token(&self) -> String {
        Self::next(&self.tokens)
    }
}
