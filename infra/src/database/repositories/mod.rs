//! SQLx repository implementations

pub mod challenge_repository;

pub use challenge_repository::MySqlChallengeStore;
