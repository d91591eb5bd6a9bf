//! Number normalization on top of an external parsing capability
//!
//! The numbering-plan database is not part of this crate. It is consumed
//! through [`NumberParser`], and [`NumberNormalizer`] turns raw user input
//! into a canonical [`MobileNumber`](crate::domain::MobileNumber) or a
//! [`NumberError`](crate::errors::NumberError).

mod normalizer;
mod parser;


pub use normalizer::NumberNormalizer;
pub use parser::{NumberParser, ParsedNumber};
