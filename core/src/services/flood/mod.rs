//! Flood control: sliding-window attempt limits keyed by canonical number

mod memory;
mod rate_limiter;


pub use memory::InMemoryRateLimiter;
pub use rate_limiter::RateLimiter;
