use crate::cache::keys::*;
use mv_shared::config::cache::CacheConfig;

#[test]
fn test_hash_identifier_is_stable_hex() {
    let digest = hash_identifier("+12025551234");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(digest, hash_identifier("+12025551234"));
    assert_ne!(digest, hash_identifier("+12025551235"));
}

#[test]
fn test_keys_do_not_contain_numbers_or_holders() {
    let config = CacheConfig::default();
    let key = challenge_key(&config, "+12025551234", "session-1");

    assert!(key.starts_with("mobile_number:challenge:"));
    assert!(!key.contains("2025551234"));
    assert!(!key.contains("session-1"));

    let verified = verified_key(&config, "session-1");
    assert!(verified.starts_with("mobile_number:verified:"));
    assert!(!verified.contains("session-1"));
}

#[test]
fn test_challenge_keys_are_scoped_by_holder() {
    let config = CacheConfig::default();
    assert_ne!(
        challenge_key(&config, "+12025551234", "a"),
        challenge_key(&config, "+12025551234", "b")
    );
    assert_ne!(
        challenge_key(&config, "+12025551234", "a"),
        challenge_key(&config, "+12025551235", "a")
    );
}

#[test]
fn test_prefix_is_applied() {
    let config = CacheConfig::default().with_prefix("tenant");
    assert_eq!(challenge_index_key(&config), "tenant:challenge_index");
    assert!(flood_key(&config, "+12025551234").starts_with("tenant:flood:"));

    let bare = CacheConfig::default().with_prefix("");
    assert_eq!(challenge_index_key(&bare), "challenge_index");
}
