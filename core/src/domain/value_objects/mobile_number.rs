//! Normalized mobile number value object.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use mv_shared::utils::phone::is_e164;

use crate::errors::NumberError;

/// Classification of a parsed number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberType {
    /// Definitely a mobile line
    Mobile,
    /// Numbering plan does not distinguish fixed and mobile lines
    FixedLineOrMobile,
    /// Fixed line, toll free, VoIP, pager and everything else
    Other,
}

/// Display styles supported by the number parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberFormat {
    /// `+442079460018`
    E164,
    /// `+44 20 7946 0018`
    International,
    /// `020 7946 0018`
    National,
}

/// Set of number types a field accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedTypes(BTreeSet<NumberType>);

impl AllowedTypes {
    pub fn new(types: impl IntoIterator<Item = NumberType>) -> Self {
        Self(types.into_iter().collect())
    }

    /// Only lines classified as mobile
    pub fn mobile_only() -> Self {
        Self::new([NumberType::Mobile])
    }

    /// Mobile lines plus plans that cannot tell fixed from mobile
    pub fn dual_use() -> Self {
        Self::new([NumberType::Mobile, NumberType::FixedLineOrMobile])
    }

    pub fn contains(&self, number_type: NumberType) -> bool {
        self.0.contains(&number_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = NumberType> + '_ {
        self.0.iter().copied()
    }
}

/// Mobile plus fixed-line-or-mobile, so NANP numbers are accepted
impl Default for AllowedTypes {
    fn default() -> Self {
        Self::dual_use()
    }
}

/// A validated, canonical phone number
///
/// Instances only come out of `NumberNormalizer::normalize`, so holding one
/// means the raw input parsed, classified and matched its region. Stored
/// numbers are re-checked on deserialization and rejected unless the
/// canonical form is E.164 and agrees with its parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StoredMobileNumber")]
pub struct MobileNumber {
    canonical: String,
    region: String,
    national_number: String,
    country_code: u16,
    number_type: NumberType,
}

impl MobileNumber {
    pub(crate) fn new(
        canonical: String,
        region: String,
        national_number: String,
        country_code: u16,
        number_type: NumberType,
    ) -> Self {
        Self {
            canonical,
            region,
            national_number,
            country_code,
            number_type,
        }
    }

    /// E.164 form, the identity of the line
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// ISO 3166-1 alpha-2 region code
    pub fn region(&self) -> &str {
        &self.region
    }

    /// National significant digits including leading zeros
    pub fn national_number(&self) -> &str {
        &self.national_number
    }

    pub fn country_code(&self) -> u16 {
        self.country_code
    }

    pub fn number_type(&self) -> NumberType {
        self.number_type
    }

    /// RFC 3966 link target
    pub fn tel_uri(&self) -> String {
        format!("tel:{}", self.canonical)
    }

    /// Whether `other` is the same line
    pub fn same_line(&self, other: &str) -> bool {
        self.canonical == other
    }
}

#[derive(Deserialize)]
struct StoredMobileNumber {
    canonical: String,
    region: String,
    national_number: String,
    country_code: u16,
    number_type: NumberType,
}

impl TryFrom<StoredMobileNumber> for MobileNumber {
    type Error = NumberError;

    fn try_from(stored: StoredMobileNumber) -> Result<Self, Self::Error> {
        let digits_only = !stored.national_number.is_empty()
            && stored.national_number.bytes().all(|b| b.is_ascii_digit());
        // Empty for non-geographic numbers
        let region_ok = stored.region.is_empty()
            || (stored.region.len() == 2 && stored.region.bytes().all(|b| b.is_ascii_uppercase()));
        let assembled = format!("+{}{}", stored.country_code, stored.national_number);

        if !digits_only || !region_ok || !is_e164(&stored.canonical) || stored.canonical != assembled {
            return Err(NumberError::InvalidNumber);
        }

        Ok(Self::new(
            stored.canonical,
            stored.region,
            stored.national_number,
            stored.country_code,
            stored.number_type,
        ))
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}
