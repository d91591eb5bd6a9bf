//! Storage policy of a mobile number field
//!
//! Applies region allow-lists, verification requirements, the two-factor
//! flag and uniqueness to a normalized submission before it is persisted.

mod types;
mod validator;


pub use types::{FieldPolicy, FieldSubmission, UniquenessPolicy, VerificationRequirement};
pub use validator::SubmissionValidator;
