//! Stored value of a mobile number field.

use serde::{Deserialize, Serialize};

/// What a field persists after a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    /// E.164 number
    pub canonical: String,
    /// ISO 3166-1 alpha-2 region
    pub region: String,
    /// National significant digits including leading zeros
    pub local_number: String,
    /// Verified at submission time
    pub verified: bool,
    /// Enabled as a second authentication factor
    pub tfa: bool,
}
