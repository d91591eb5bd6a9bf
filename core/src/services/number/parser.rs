//! Parsing capability consumed by the normalizer

use crate::domain::value_objects::{NumberFormat, NumberType};
use crate::errors::ParseError;

/// Structured result of parsing a raw number
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedNumber {
    /// Country calling code, e.g. `44`
    pub country_code: u16,
    /// National number without leading zeros
    pub national_number: u64,
    /// Zeros the national number carries in front (Italian style numbers)
    pub leading_zeros: u8,
}

impl ParsedNumber {
    pub fn new(country_code: u16, national_number: u64, leading_zeros: u8) -> Self {
        Self {
            country_code,
            national_number,
            leading_zeros,
        }
    }

    /// National significant digits, left padded with the leading zeros
    pub fn national_significant_digits(&self) -> String {
        format!(
            "{}{}",
            "0".repeat(self.leading_zeros as usize),
            self.national_number
        )
    }

    /// `+<country code><national significant digits>`
    pub fn e164(&self) -> String {
        format!("+{}{}", self.country_code, self.national_significant_digits())
    }
}

/// Phone number parsing and classification
///
/// Implementations wrap a numbering-plan database. Region codes are ISO 3166-1
/// alpha-2, upper case.
pub trait NumberParser: Send + Sync {
    /// Parse `raw` using `region_hint` for numbers written in national format
    ///
    /// # Returns
    ///
    /// * `Ok(ParsedNumber)` - The input is syntactically a phone number
    /// * `Err(ParseError)` - Why the input is not a number, for logs only
    fn parse(&self, raw: &str, region_hint: Option<&str>) -> Result<ParsedNumber, ParseError>;

    /// Whether the number exists in the numbering plan
    fn is_valid(&self, number: &ParsedNumber) -> bool;

    /// Line type of the number
    fn classify(&self, number: &ParsedNumber) -> NumberType;

    /// Region the number belongs to, `None` for non-geographic numbers
    fn region_of(&self, number: &ParsedNumber) -> Option<String>;

    /// Render the number in the given style
    fn format(&self, number: &ParsedNumber, style: NumberFormat) -> String;

    /// Country calling code for a region, `None` for unknown regions
    fn country_code_for_region(&self, region: &str) -> Option<u16>;

    /// Every region the numbering-plan database knows about
    fn supported_regions(&self) -> Vec<String>;

    /// Human readable region name, when the implementation has one
    fn region_name(&self, _region: &str) -> Option<String> {
        None
    }
}
