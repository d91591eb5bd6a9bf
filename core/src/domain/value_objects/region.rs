//! Region listing entries.

use serde::{Deserialize, Serialize};

/// One entry of a country selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOption {
    /// ISO 3166-1 alpha-2 code
    pub region: String,
    /// `"United Kingdom (+44)"` or `"GB (+44)"`
    pub label: String,
}
