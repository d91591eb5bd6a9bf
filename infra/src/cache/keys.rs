//! Redis key layout
//!
//! Numbers and holder contexts never appear in key names in clear; both are
//! replaced by their SHA-256 digest.

use sha2::{Digest, Sha256};

use mv_shared::config::CacheConfig;

/// SHA-256 hex digest of an identifier
pub fn hash_identifier(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// `<prefix>:challenge:<sha(canonical)>:<sha(holder)>`
pub fn challenge_key(config: &CacheConfig, canonical: &str, holder: &str) -> String {
    config.make_key(&format!(
        "challenge:{}:{}",
        hash_identifier(canonical),
        hash_identifier(holder)
    ))
}

/// Sorted set of challenge keys scored by issue time in milliseconds
pub fn challenge_index_key(config: &CacheConfig) -> String {
    config.make_key("challenge_index")
}

/// `<prefix>:flood:<sha(key)>`
pub fn flood_key(config: &CacheConfig, key: &str) -> String {
    config.make_key(&format!("flood:{}", hash_identifier(key)))
}

/// Hash of verified canonical numbers for one holder
pub fn verified_key(config: &CacheConfig, holder: &str) -> String {
    config.make_key(&format!("verified:{}", hash_identifier(holder)))
}
