//! `NumberParser` over the libphonenumber metadata shipped with `phonenumber`

use phonenumber::metadata::DATABASE;
use phonenumber::{country, Mode, PhoneNumber, Type};
use std::collections::{BTreeSet, HashMap};

use mv_core::{NumberFormat, NumberParser, NumberType, ParseError, ParsedNumber};

/// Largest country calling code in the ITU-T E.164 plan
const MAX_COUNTRY_CODE: u16 = 999;

/// Parser backed by the embedded libphonenumber database
///
/// Region names are not part of the metadata; supply them with
/// [`PhoneNumberParser::with_region_names`] for labelled region lists.
#[derive(Debug, Clone, Default)]
pub struct PhoneNumberParser {
    region_names: HashMap<String, String>,
}

impl PhoneNumberParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach display names, keyed by ISO 3166-1 alpha-2 code
    pub fn with_region_names<I, K, V>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.region_names.extend(
            names
                .into_iter()
                .map(|(region, name)| (region.into().to_ascii_uppercase(), name.into())),
        );
        self
    }

    fn to_phone_number(number: &ParsedNumber) -> Option<PhoneNumber> {
        phonenumber::parse(None, number.e164()).ok()
    }
}

fn region_code(id: country::Id) -> String {
    format!("{:?}", id)
}

impl NumberParser for PhoneNumberParser {
    fn parse(&self, raw: &str, region_hint: Option<&str>) -> Result<ParsedNumber, ParseError> {
        let country = region_hint
            .map(|hint| {
                hint.parse::<country::Id>()
                    .map_err(|_| ParseError::UnknownRegion(hint.to_string()))
            })
            .transpose()?;

        let number = phonenumber::parse(country, raw)
            .map_err(|e| ParseError::NotANumber(e.to_string()))?;
        Ok(ParsedNumber::new(
            number.code().value(),
            number.national().value(),
            number.national().zeros(),
        ))
    }

    fn is_valid(&self, number: &ParsedNumber) -> bool {
        Self::to_phone_number(number).is_some_and(|phone| phonenumber::is_valid(&phone))
    }

    fn classify(&self, number: &ParsedNumber) -> NumberType {
        let Some(phone) = Self::to_phone_number(number) else {
            return NumberType::Other;
        };
        match phone.number_type(&DATABASE) {
            Type::Mobile => NumberType::Mobile,
            Type::FixedLineOrMobile => NumberType::FixedLineOrMobile,
            _ => NumberType::Other,
        }
    }

    fn region_of(&self, number: &ParsedNumber) -> Option<String> {
        Self::to_phone_number(number)?.country().id().map(region_code)
    }

    fn format(&self, number: &ParsedNumber, style: NumberFormat) -> String {
        let Some(phone) = Self::to_phone_number(number) else {
            return number.e164();
        };
        let mode = match style {
            NumberFormat::E164 => Mode::E164,
            NumberFormat::International => Mode::International,
            NumberFormat::National => Mode::National,
        };
        phone.format().mode(mode).to_string()
    }

    fn country_code_for_region(&self, region: &str) -> Option<u16> {
        // Non-geographic entities ("001") are not regions
        if region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        DATABASE
            .by_id(&region.to_ascii_uppercase())
            .map(|metadata| metadata.country_code())
    }

    fn supported_regions(&self) -> Vec<String> {
        let regions: BTreeSet<String> = (1..=MAX_COUNTRY_CODE)
            .flat_map(|code| DATABASE.by_code(&code).into_iter().flatten())
            .map(|metadata| metadata.id().to_string())
            .filter(|id| id.len() == 2 && id.chars().all(|c| c.is_ascii_alphabetic()))
            .collect();
        regions.into_iter().collect()
    }

    fn region_name(&self, region: &str) -> Option<String> {
        self.region_names.get(&region.to_ascii_uppercase()).cloned()
    }
}
