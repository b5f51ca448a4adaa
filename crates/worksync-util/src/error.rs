//! Error types for worksync

use thiserror::Error;

use crate::{EmployeeId, RecordId};

/// Core error type for attendance operations
#[derive(Debug, Error)]
pub enum WorksyncError {
    #[error("Unknown employee code: {0}")]
    UnknownEmployee(String),

    #[error("No employee is logged in")]
    NotLoggedIn,

    #[error("{employee_id} is already checked in (record {record_id})")]
    AlreadyCheckedIn {
        employee_id: EmployeeId,
        record_id: RecordId,
    },

    #[error("{0} is not checked in")]
    NotCheckedIn(EmployeeId),

    #[error("Record {0} is already closed")]
    RecordAlreadyClosed(RecordId),

    #[error("Check-out precedes check-in for record {0}")]
    CheckOutBeforeCheckIn(RecordId),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WorksyncError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Message suitable for showing inline to the person at the keyboard.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownEmployee(_) => "Employee code not found. Please check and try again.".into(),
            Self::NotLoggedIn => "Please log in with your employee code first.".into(),
            Self::AlreadyCheckedIn { .. } => "You are already checked in.".into(),
            Self::NotCheckedIn(_) => "You are not checked in.".into(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorksyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_employee_has_friendly_message() {
        let err = WorksyncError::UnknownEmployee("9999".into());
        assert_eq!(err.to_string(), "Unknown employee code: 9999");
        assert!(err.user_message().contains("not found"));
    }

    #[test]
    fn internal_errors_fall_back_to_display() {
        let err = WorksyncError::internal("boom");
        assert_eq!(err.user_message(), "Internal error: boom");
    }
}
