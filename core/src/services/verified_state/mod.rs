//! Per-holder record of proven numbers

mod tracker;

#[cfg(test)]
mod tests;

pub use tracker::VerifiedStateTracker;
