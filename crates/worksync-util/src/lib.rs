//! Shared utilities for worksync
//!
//! This crate provides:
//! - ID types (EmployeeId, RecordId)
//! - Time utilities (mockable wall clock, weekend check, formatting)
//! - Error types
//! - Default paths for config and data directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
