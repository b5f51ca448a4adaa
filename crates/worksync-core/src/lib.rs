//! Core attendance logic for worksync
//!
//! This crate contains:
//! - The aggregator (day / month / year windows, personal vs. team hours
//!   against the OECD reference bands)
//! - The check-in state machine (CheckedOut <-> CheckedIn) bound to the
//!   logged-in identity

mod aggregator;
mod events;
mod session;

pub use aggregator::*;
pub use events::*;
pub use session::*;
