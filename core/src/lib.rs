//! # Mobile Verify Core
//!
//! Domain layer of the mobile number verification engine: number
//! normalization, challenge issuance and checking, flood control, and
//! per-holder verified state. Storage, number parsing and SMS delivery are
//! consumed through traits and implemented in `mv_infra`.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
