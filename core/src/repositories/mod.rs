pub mod challenge;
pub mod registry;
pub mod verified;

pub use challenge::{ChallengeStore, InMemoryChallengeStore};
pub use registry::{InMemoryNumberRegistry, NumberRegistry};
pub use verified::{InMemoryVerifiedStateStore, VerifiedStateStore};
