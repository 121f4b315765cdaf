//! Fundamental types for the agora governance engines.
//!
//! This crate defines the identities and time values shared by every other
//! crate in the workspace: account addresses, timestamps and the clock seam.

pub mod address;
pub mod error;
pub mod time;

pub use address::Address;
pub use error::TypesError;
pub use time::{Clock, SystemClock, Timestamp};
