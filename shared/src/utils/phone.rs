//! Phone number helpers shared by logging and delivery code
//!
//! Parsing and classification live behind the `NumberParser` capability in
//! `mv_core`; these helpers only deal with already-canonical strings.

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number regex (E.164 format)
static E164_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{1,14}$").expect("E.164 pattern is valid")
});

/// Check if a string is shaped like an E.164 number (`+` and up to 15 digits)
pub fn is_e164(phone: &str) -> bool {
    E164_REGEX.is_match(phone)
}

/// Mask a phone number for logs, keeping the last 4 digits
///
/// ```
/// use mv_shared::phone::mask_phone_number;
/// assert_eq!(mask_phone_number("+12025551234"), "+*******1234");
/// ```
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let visible: String = chars[chars.len() - 4..].iter().collect();
    let masked_count = chars.len() - 4;

    if chars[0] == '+' {
        format!("+{}{}", "*".repeat(masked_count - 1), visible)
    } else {
        format!("{}{}", "*".repeat(masked_count), visible)
    }
}

/// Shorten an opaque token for logs
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    format!("{}…", prefix)
}
