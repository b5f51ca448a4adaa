//! Shared types for worksync

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use worksync_util::{EmployeeId, RecordId, WorksyncError};

/// A member of the fixed roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: String,
    pub team: String,
}

/// The fixed list of known employees
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(Vec<Employee>);

impl Roster {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self(employees)
    }

    /// Look up an employee by code
    pub fn find(&self, id: &EmployeeId) -> Option<&Employee> {
        self.0.iter().find(|e| &e.id == id)
    }

    pub fn employees(&self) -> &[Employee] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One check-in, and its check-out once the employee leaves.
///
/// `check_out` and `duration` are either both present (closed) or both
/// absent (open). `date` is the local calendar date of `check_in` and is
/// the bucketing key for all aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub employee_id: EmployeeId,
    pub check_in: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<DateTime<Local>>,
    /// Minutes worked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub date: NaiveDate,
}

impl AttendanceRecord {
    /// Open a new record with a freshly generated id
    pub fn open(employee_id: EmployeeId, now: DateTime<Local>) -> Self {
        Self {
            id: RecordId::generate(),
            employee_id,
            check_in: now,
            check_out: None,
            duration: None,
            date: now.date_naive(),
        }
    }

    /// Build an already-closed record (used for seed data)
    pub fn closed(
        id: RecordId,
        employee_id: EmployeeId,
        check_in: DateTime<Local>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id,
            employee_id,
            check_in,
            check_out: Some(check_in + chrono::Duration::minutes(duration_minutes as i64)),
            duration: Some(duration_minutes),
            date: check_in.date_naive(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    /// Close the record at `now`; duration is whole minutes, rounded down.
    pub fn close(&mut self, now: DateTime<Local>) -> worksync_util::Result<u32> {
        if !self.is_open() {
            return Err(WorksyncError::RecordAlreadyClosed(self.id.clone()));
        }
        let elapsed = now.signed_duration_since(self.check_in);
        if elapsed < chrono::Duration::zero() {
            return Err(WorksyncError::CheckOutBeforeCheckIn(self.id.clone()));
        }

        let minutes = u32::try_from(elapsed.num_minutes())
            .map_err(|_| WorksyncError::internal("duration overflow"))?;
        self.check_out = Some(now);
        self.duration = Some(minutes);
        Ok(minutes)
    }

    /// Minutes worked, zero while open
    pub fn duration_minutes(&self) -> u32 {
        self.duration.unwrap_or(0)
    }
}

/// One aggregation window, as rendered on the dashboard charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTimeData {
    pub label: String,
    pub personal_hours: f64,
    pub team_average_hours: f64,
    pub total_team_hours: f64,
    pub oecd_avg: f64,
    pub oecd_min: f64,
    pub oecd_max: f64,
}

/// Round an hour figure to one decimal place
pub fn round_hours(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

/// Management summary produced by the insight service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AiInsight {
    pub summary: String,
    /// 0-100
    pub efficiency_score: f64,
    pub recommendations: Vec<String>,
}
