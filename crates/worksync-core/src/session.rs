//! Check-in state machine bound to the logged-in identity

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use worksync_api::{AttendanceRecord, Employee, Roster};
use worksync_store::{IdentityStore, RecordStore};
use worksync_util::{EmployeeId, RecordId, Result, WorksyncError};

use crate::CoreEvent;

/// Whether the logged-in employee has an open record for today
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckState {
    CheckedOut,
    CheckedIn {
        record_id: RecordId,
        since: DateTime<Local>,
    },
}

impl CheckState {
    pub fn is_checked_in(&self) -> bool {
        matches!(self, CheckState::CheckedIn { .. })
    }
}

/// Login, logout, check-in and check-out for one employee at a time.
///
/// The check state is never stored on its own. Login and restore derive it
/// from the record list (an open record dated today). Each transition
/// re-reads the held record by id, falling back to today's records.
pub struct AttendanceSession {
    records: Arc<RecordStore>,
    identity: IdentityStore,
    current: Option<Employee>,
    state: CheckState,
}

impl AttendanceSession {
    pub fn new(records: Arc<RecordStore>, identity: IdentityStore) -> Self {
        Self {
            records,
            identity,
            current: None,
            state: CheckState::CheckedOut,
        }
    }

    /// Pick up a previously stored identity, if any.
    ///
    /// A stored employee that is no longer on the roster is cleared.
    pub fn restore(&mut self, now: DateTime<Local>) -> Result<Option<&Employee>> {
        self.current = None;
        self.state = CheckState::CheckedOut;

        let Some(stored) = self.identity.current()? else {
            return Ok(None);
        };

        let Some(employee) = self.roster().find(&stored.id).cloned() else {
            warn!(employee_id = %stored.id, "Stored identity is not on the roster, logging out");
            self.identity.clear()?;
            return Ok(None);
        };

        self.state = self.derive_state(&employee.id, now)?;
        debug!(employee_id = %employee.id, checked_in = self.state.is_checked_in(), "Session restored");
        self.current = Some(employee);
        Ok(self.current.as_ref())
    }

    /// Log in by employee code. Unknown codes change nothing.
    pub fn login(&mut self, code: &str, now: DateTime<Local>) -> Result<CoreEvent> {
        let code = code.trim();
        let employee = self
            .roster()
            .find(&EmployeeId::new(code))
            .cloned()
            .ok_or_else(|| WorksyncError::UnknownEmployee(code.to_string()))?;

        self.identity.set(&employee)?;
        self.state = self.derive_state(&employee.id, now)?;
        self.current = Some(employee.clone());

        info!(
            employee_id = %employee.id,
            checked_in = self.state.is_checked_in(),
            "Employee logged in"
        );

        Ok(CoreEvent::LoggedIn {
            employee,
            state: self.state.clone(),
        })
    }

    /// Clear the identity. Records, including an open one, are untouched.
    pub fn logout(&mut self) -> Result<CoreEvent> {
        let employee = self.current.take().ok_or(WorksyncError::NotLoggedIn)?;
        self.identity.clear()?;
        self.state = CheckState::CheckedOut;

        info!(employee_id = %employee.id, "Employee logged out");
        Ok(CoreEvent::LoggedOut {
            employee_id: employee.id,
        })
    }

    /// Open a record for today
    pub fn check_in(&mut self, now: DateTime<Local>) -> Result<CoreEvent> {
        let employee_id = self.require_employee()?.id.clone();

        self.state = match self.held_open_record()? {
            Some(record) => CheckState::CheckedIn {
                record_id: record.id,
                since: record.check_in,
            },
            None => self.derive_state(&employee_id, now)?,
        };
        if let CheckState::CheckedIn { record_id, .. } = &self.state {
            return Err(WorksyncError::AlreadyCheckedIn {
                employee_id,
                record_id: record_id.clone(),
            });
        }

        let record = AttendanceRecord::open(employee_id.clone(), now);
        self.records.save(&record)?;
        self.state = CheckState::CheckedIn {
            record_id: record.id.clone(),
            since: record.check_in,
        };

        info!(employee_id = %employee_id, record_id = %record.id, "Checked in");
        Ok(CoreEvent::CheckedIn { record })
    }

    /// Close the open record at `now`.
    ///
    /// The record this session checked in is closed by id, so a shift that
    /// crosses midnight still closes. Without one, today's records are
    /// scanned.
    pub fn check_out(&mut self, now: DateTime<Local>) -> Result<CoreEvent> {
        let employee_id = self.require_employee()?.id.clone();

        let open = match self.held_open_record()? {
            Some(record) => Some(record),
            None => self.records.find_open(&employee_id, now.date_naive())?,
        };
        let Some(mut record) = open else {
            self.state = CheckState::CheckedOut;
            return Err(WorksyncError::NotCheckedIn(employee_id));
        };

        let duration_minutes = record.close(now)?;
        self.records.save(&record)?;
        self.state = CheckState::CheckedOut;

        info!(
            employee_id = %employee_id,
            record_id = %record.id,
            duration_minutes,
            "Checked out"
        );
        Ok(CoreEvent::CheckedOut {
            record,
            duration_minutes,
        })
    }

    pub fn current_employee(&self) -> Option<&Employee> {
        self.current.as_ref()
    }

    pub fn state(&self) -> &CheckState {
        &self.state
    }

    /// The logged-in employee's records dated today, in storage order
    pub fn today_records(&self, now: DateTime<Local>) -> Result<Vec<AttendanceRecord>> {
        let employee = self.require_employee()?;
        Ok(self.records.records_for(&employee.id, now.date_naive())?)
    }

    pub fn roster(&self) -> &Roster {
        self.records.roster()
    }

    fn require_employee(&self) -> Result<&Employee> {
        self.current.as_ref().ok_or(WorksyncError::NotLoggedIn)
    }

    /// The record behind `CheckedIn`, if it is still open in the store
    fn held_open_record(&self) -> Result<Option<AttendanceRecord>> {
        let CheckState::CheckedIn { record_id, .. } = &self.state else {
            return Ok(None);
        };
        Ok(self.records.find(record_id)?.filter(|r| r.is_open()))
    }

    fn derive_state(&self, employee_id: &EmployeeId, now: DateTime<Local>) -> Result<CheckState> {
        Ok(match self.records.find_open(employee_id, now.date_naive())? {
            Some(record) => CheckState::CheckedIn {
                record_id: record.id,
                since: record.check_in,
            },
            None => CheckState::CheckedOut,
        })
    }
}
