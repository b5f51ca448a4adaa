//! Persistence layer for worksync
//!
//! Provides:
//! - A flat key-value slot store (SQLite on disk, or in memory)
//! - The attendance record list, lazily seeded with synthetic history
//! - The current-identity slot

mod identity;
mod memory;
mod records;
mod seed;
mod sqlite;
mod traits;

pub use identity::*;
pub use memory::*;
pub use records::*;
pub use seed::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;
use worksync_util::WorksyncError;

/// Slot holding the serialized attendance record list
pub const STORAGE_KEY_ATTENDANCE: &str = "worksync_attendance";

/// Slot holding the serialized current identity
pub const STORAGE_KEY_USER: &str = "worksync_current_user";

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<StoreError> for WorksyncError {
    fn from(e: StoreError) -> Self {
        WorksyncError::store(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
