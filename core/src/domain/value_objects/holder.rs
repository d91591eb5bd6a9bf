//! Holder context: the session or principal a number is verified for.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex digits of the digest kept by `log_id`
const LOG_ID_LEN: usize = 12;

/// Opaque key scoping challenges and verified state
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderContext(String);

impl HolderContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Truncated SHA-256 of the id, safe to write to logs
    ///
    /// A prefix of the digest Redis key names use, so log lines can be
    /// matched to keys without revealing the session or principal id.
    pub fn log_id(&self) -> String {
        let digest = hex::encode(Sha256::digest(self.0.as_bytes()));
        digest[..LOG_ID_LEN].to_string()
    }
}

impl From<&str> for HolderContext {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for HolderContext {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for HolderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
