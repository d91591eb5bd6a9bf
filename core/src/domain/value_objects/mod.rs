//! Value objects representing immutable domain concepts.

pub mod field_value;
pub mod holder;
pub mod mobile_number;
pub mod region;

pub use field_value::FieldValue;
pub use holder::HolderContext;
pub use mobile_number::{AllowedTypes, MobileNumber, NumberFormat, NumberType};
pub use region::RegionOption;

#[cfg(test)]
mod tests;
