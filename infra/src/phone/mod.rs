//! Numbering-plan parsing backed by the `phonenumber` crate

mod number_parser;


pub use number_parser::PhoneNumberParser;
