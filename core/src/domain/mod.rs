//! Domain layer containing value objects and entities of the verification protocol.

pub mod entities;
pub mod value_objects;

// Re-export commonly used domain types
pub use entities::*;
pub use value_objects::*;
