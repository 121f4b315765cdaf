//! Nullable infrastructure for deterministic testing.
//!
//! The governance engines only touch the outside world through the clock and
//! their event listeners. This crate provides test-friendly implementations
//! that return deterministic values and can be controlled programmatically.

pub mod clock;
pub mod events;

pub use clock::NullClock;
pub use events::NullEventLog;
