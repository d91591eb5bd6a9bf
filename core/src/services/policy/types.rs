//! Field policy settings and submissions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::value_objects::AllowedTypes;

/// Whether a field asks for proof of ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationRequirement {
    None,
    #[default]
    Optional,
    Required,
}

/// Whether a number may appear in more than one stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniquenessPolicy {
    #[default]
    No,
    /// Unique among all stored values
    Yes,
    /// Unique among values stored as verified
    YesVerified,
}

/// Settings of one mobile number field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPolicy {
    pub allowed_types: AllowedTypes,
    /// Empty means every region
    pub allowed_regions: BTreeSet<String>,
    pub verification: VerificationRequirement,
    pub uniqueness: UniquenessPolicy,
    /// Field offers the two-factor flag
    pub tfa_enabled: bool,
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self {
            allowed_types: AllowedTypes::default(),
            allowed_regions: BTreeSet::new(),
            verification: VerificationRequirement::default(),
            uniqueness: UniquenessPolicy::default(),
            tfa_enabled: false,
        }
    }
}

impl FieldPolicy {
    pub fn with_allowed_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_regions = regions
            .into_iter()
            .map(|r| r.as_ref().trim().to_ascii_uppercase())
            .collect();
        self
    }

    pub fn with_verification(mut self, verification: VerificationRequirement) -> Self {
        self.verification = verification;
        self
    }

    pub fn with_uniqueness(mut self, uniqueness: UniquenessPolicy) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    pub fn with_allowed_types(mut self, allowed_types: AllowedTypes) -> Self {
        self.allowed_types = allowed_types;
        self
    }

    pub fn with_tfa(mut self, enabled: bool) -> Self {
        self.tfa_enabled = enabled;
        self
    }

    /// Requirement in force; nothing can be required without a gateway
    pub fn effective_verification(&self, verification_enabled: bool) -> VerificationRequirement {
        if verification_enabled {
            self.verification
        } else {
            VerificationRequirement::None
        }
    }

    /// The only allowed region, used as hint when the submission has none
    pub fn single_region(&self) -> Option<&str> {
        match self.allowed_regions.len() {
            1 => self.allowed_regions.iter().next().map(String::as_str),
            _ => None,
        }
    }

    pub fn region_allowed(&self, region: &str) -> bool {
        self.allowed_regions.is_empty() || self.allowed_regions.contains(region)
    }
}

/// Raw field input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSubmission {
    pub raw: String,
    /// Region selected next to the input
    pub region: Option<String>,
    /// Two-factor flag requested
    pub tfa: bool,
    /// Submitter may skip a `Required` verification
    pub bypass_verification: bool,
}

impl FieldSubmission {
    pub fn new(raw: impl Into<String>, region: Option<&str>) -> Self {
        Self {
            raw: raw.into(),
            region: region.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_tfa(mut self) -> Self {
        self.tfa = true;
        self
    }

    pub fn with_bypass(mut self) -> Self {
        self.bypass_verification = true;
        self
    }
}
