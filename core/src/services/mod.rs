//! Business services containing the verification protocol.

pub mod clock;
pub mod flood;
pub mod number;
pub mod policy;
pub mod verification;
pub mod verified_state;

// Re-export commonly used types
pub use clock::{Clock, MockClock, SystemClock};
pub use flood::{InMemoryRateLimiter, RateLimiter};
pub use number::{NumberNormalizer, NumberParser, ParsedNumber};
pub use policy::{
    FieldPolicy, FieldSubmission, SubmissionValidator, UniquenessPolicy, VerificationRequirement,
};
pub use verification::{
    render_message, CodeHasher, FixedRandom, KeyedLocks, RandomSource, SecureRandom,
    SendCodeResult, SmsGateway, TokenData, VerificationService, VerifyCodeResult,
};
pub use verified_state::VerifiedStateTracker;
