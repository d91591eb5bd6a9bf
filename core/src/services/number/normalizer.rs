//! Raw input to canonical `MobileNumber`

use std::collections::HashSet;
use std::sync::Arc;

use mv_shared::utils::phone::mask_phone_number;

use crate::domain::value_objects::{
    AllowedTypes, MobileNumber, NumberFormat, RegionOption,
};
use crate::errors::NumberError;

use super::parser::NumberParser;

/// Validates and canonicalises phone numbers
///
/// Pure over the injected parser: no I/O, no state.
#[derive(Clone)]
pub struct NumberNormalizer {
    parser: Arc<dyn NumberParser>,
}

impl NumberNormalizer {
    pub fn new(parser: Arc<dyn NumberParser>) -> Self {
        Self { parser }
    }

    /// Normalize raw input into a `MobileNumber`
    ///
    /// Checks run in this order, first failure wins:
    /// 1. Empty or blank input fails with `NoNumber`
    /// 2. Unknown region hint, unparseable or invalid input fails with `InvalidNumber`
    /// 3. A type outside `allowed_types` fails with `WrongType`
    /// 4. A supplied hint that differs from the number's region fails with `WrongRegion`
    ///
    /// # Arguments
    ///
    /// * `raw` - User input in national or international format
    /// * `region_hint` - Region selected next to the input, if any
    /// * `allowed_types` - Line types the caller accepts
    pub fn normalize(
        &self,
        raw: &str,
        region_hint: Option<&str>,
        allowed_types: &AllowedTypes,
    ) -> Result<MobileNumber, NumberError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(NumberError::NoNumber);
        }

        let hint = match region_hint.map(str::trim).filter(|r| !r.is_empty()) {
            Some(region) => {
                let region = region.to_ascii_uppercase();
                if self.parser.country_code_for_region(&region).is_none() {
                    tracing::debug!(
                        region = %region,
                        event = "normalize_unknown_region",
                        "Region hint is not a known region"
                    );
                    return Err(NumberError::InvalidNumber);
                }
                Some(region)
            }
            None => None,
        };

        let parsed = self.parser.parse(raw, hint.as_deref()).map_err(|reason| {
            tracing::debug!(
                reason = %reason,
                event = "normalize_parse_failed",
                "Input could not be parsed as a phone number"
            );
            NumberError::InvalidNumber
        })?;

        if !self.parser.is_valid(&parsed) {
            tracing::debug!(
                phone = %mask_phone_number(&parsed.e164()),
                event = "normalize_invalid_number",
                "Parsed number is not valid in its numbering plan"
            );
            return Err(NumberError::InvalidNumber);
        }

        let number_type = self.parser.classify(&parsed);
        if !allowed_types.contains(number_type) {
            tracing::debug!(
                phone = %mask_phone_number(&parsed.e164()),
                number_type = ?number_type,
                event = "normalize_wrong_type",
                "Number type is not allowed"
            );
            return Err(NumberError::WrongType);
        }

        let region = self.parser.region_of(&parsed).unwrap_or_default();
        if let Some(hint) = hint {
            if region != hint {
                tracing::debug!(
                    phone = %mask_phone_number(&parsed.e164()),
                    hint = %hint,
                    region = %region,
                    event = "normalize_wrong_region",
                    "Number does not belong to the hinted region"
                );
                return Err(NumberError::WrongRegion);
            }
        }

        let canonical = self.parser.format(&parsed, NumberFormat::E164);

        Ok(MobileNumber::new(
            canonical,
            region,
            parsed.national_significant_digits(),
            parsed.country_code,
            number_type,
        ))
    }

    /// Render a normalized number for display
    pub fn format(&self, number: &MobileNumber, style: NumberFormat) -> String {
        match self.parser.parse(number.canonical(), None) {
            Ok(parsed) => self.parser.format(&parsed, style),
            Err(_) => number.canonical().to_string(),
        }
    }

    /// Country calling code of a region
    pub fn country_code(&self, region: &str) -> Option<u16> {
        self.parser
            .country_code_for_region(&region.trim().to_ascii_uppercase())
    }

    /// Region options for a country selector, sorted by label
    ///
    /// # Arguments
    ///
    /// * `filter` - Restrict to these regions; empty means all supported regions
    /// * `with_names` - Use `"<Name> (+<code>)"` labels where a name is known
    pub fn list_regions(&self, filter: &[String], with_names: bool) -> Vec<RegionOption> {
        let filter: HashSet<String> = filter
            .iter()
            .map(|r| r.trim().to_ascii_uppercase())
            .collect();

        let mut options: Vec<RegionOption> = self
            .parser
            .supported_regions()
            .into_iter()
            .filter(|region| filter.is_empty() || filter.contains(region))
            .filter_map(|region| {
                let code = self.parser.country_code_for_region(&region)?;
                let name = if with_names {
                    self.parser.region_name(&region).filter(|n| !n.is_empty())
                } else {
                    None
                };
                let label = match name {
                    Some(name) => format!("{} (+{})", name, code),
                    None => format!("{} (+{})", region, code),
                };
                Some(RegionOption { region, label })
            })
            .collect();

        options.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.region.cmp(&b.region)));
        options
    }
}
