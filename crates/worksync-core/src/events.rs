//! Events emitted by the attendance session

use worksync_api::{AttendanceRecord, Employee};
use worksync_util::EmployeeId;

use crate::CheckState;

/// Events emitted by the attendance session
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// Identity stored; `state` is derived from today's records
    LoggedIn {
        employee: Employee,
        state: CheckState,
    },

    LoggedOut {
        employee_id: EmployeeId,
    },

    /// A new open record was persisted
    CheckedIn {
        record: AttendanceRecord,
    },

    /// The open record was closed and persisted
    CheckedOut {
        record: AttendanceRecord,
        duration_minutes: u32,
    },
}
