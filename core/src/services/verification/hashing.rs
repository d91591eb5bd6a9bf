//! Keyed digest of verification codes

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{DomainError, DomainResult};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 over `canonical || token || code`, keyed by the deployment secret
///
/// Each part is length-prefixed so that shifting characters between parts
/// cannot produce the same digest. Rotating the secret invalidates every
/// pending challenge.
#[derive(Clone)]
pub struct CodeHasher {
    keyed: HmacSha256,
}

impl CodeHasher {
    /// Fails with `DomainError::Config` on an empty secret
    pub fn new(secret: &str) -> DomainResult<Self> {
        if secret.is_empty() {
            return Err(DomainError::Config {
                message: "verification secret must not be empty".to_string(),
            });
        }
        let keyed = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| DomainError::Config {
            message: format!("invalid verification secret: {}", e),
        })?;
        Ok(Self { keyed })
    }

    /// Hex-encoded digest
    pub fn hash(&self, canonical: &str, token: &str, code: &str) -> String {
        hex::encode(self.digest(canonical, token, code))
    }

    /// Constant-time comparison of a stored digest with a fresh one
    pub fn matches(&self, stored: &str, canonical: &str, token: &str, code: &str) -> bool {
        let computed = self.hash(canonical, token, code);
        constant_time_eq(stored.as_bytes(), computed.as_bytes())
    }

    fn digest(&self, canonical: &str, token: &str, code: &str) -> Vec<u8> {
        let mut mac = self.keyed.clone();
        for part in [canonical, token, code] {
            mac.update(&(part.len() as u32).to_be_bytes());
            mac.update(part.as_bytes());
        }
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for CodeHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeHasher").field("secret", &"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_is_config_error() {
        let error = CodeHasher::new("").unwrap_err();
        assert_eq!(error.code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_hash_is_deterministic_hex() {
        let hasher = CodeHasher::new("s3cret").unwrap();
        let first = hasher.hash("+12025551234", "abc123", "4821");
        let second = hasher.hash("+12025551234", "abc123", "4821");

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!first.contains("4821"));
    }

    #[test]
    fn test_every_input_changes_the_digest() {
        let hasher = CodeHasher::new("s3cret").unwrap();
        let base = hasher.hash("+12025551234", "abc123", "4821");

        assert_ne!(base, hasher.hash("+12025551235", "abc123", "4821"));
        assert_ne!(base, hasher.hash("+12025551234", "abc124", "4821"));
        assert_ne!(base, hasher.hash("+12025551234", "abc123", "4822"));
        assert_ne!(base, CodeHasher::new("other").unwrap().hash("+12025551234", "abc123", "4821"));
    }

    #[test]
    fn test_parts_are_delimited() {
        let hasher = CodeHasher::new("s3cret").unwrap();
        assert_ne!(hasher.hash("+1", "23", "4"), hasher.hash("+12", "3", "4"));
    }

    #[test]
    fn test_matches() {
        let hasher = CodeHasher::new("s3cret").unwrap();
        let stored = hasher.hash("+12025551234", "abc123", "4821");

        assert!(hasher.matches(&stored, "+12025551234", "abc123", "4821"));
        assert!(!hasher.matches(&stored, "+12025551234", "abc123", "1234"));
        assert!(!hasher.matches("", "+12025551234", "abc123", "4821"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let hasher = CodeHasher::new("s3cret").unwrap();
        assert!(!format!("{:?}", hasher).contains("s3cret"));
    }
}
