//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management and health check
//! - The MySQL challenge store and its schema

pub mod connection;
pub mod repositories;


// Re-export commonly used types
pub use connection::DatabasePool;
pub use repositories::MySqlChallengeStore;
