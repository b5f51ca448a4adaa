//! Attendance record slot

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};
use worksync_api::{AttendanceRecord, Roster};
use worksync_config::SeedSettings;
use worksync_util::{EmployeeId, RecordId};

use crate::{generate_seed_records, KeyValueStore, StoreResult, STORAGE_KEY_ATTENDANCE};

/// The full attendance record list, persisted as one JSON slot.
///
/// Every read re-fetches and every write rewrites the whole list.
pub struct RecordStore {
    kv: Arc<dyn KeyValueStore>,
    roster: Roster,
    seed: SeedSettings,
}

impl RecordStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, roster: Roster, seed: SeedSettings) -> Self {
        Self { kv, roster, seed }
    }

    /// Return all records.
    ///
    /// An empty (or unreadable) slot is lazily initialized with synthetic
    /// history when seeding is enabled; the seeded list is persisted, so
    /// later loads return it unchanged.
    pub fn load(&self) -> StoreResult<Vec<AttendanceRecord>> {
        if let Some(json) = self.kv.get(STORAGE_KEY_ATTENDANCE)? {
            match serde_json::from_str::<Vec<AttendanceRecord>>(&json) {
                Ok(records) => {
                    debug!(count = records.len(), "Attendance records loaded");
                    return Ok(records);
                }
                Err(e) => {
                    warn!(error = %e, "Attendance slot is corrupt, treating as empty");
                }
            }
        }

        if !self.seed.enabled {
            return Ok(Vec::new());
        }

        let today = worksync_util::now().date_naive();
        let records = generate_seed_records(&self.roster, &self.seed, today, &mut rand::thread_rng());
        self.persist(&records)?;

        info!(
            count = records.len(),
            days = self.seed.days,
            employees = self.roster.len(),
            "Seeded synthetic attendance history"
        );
        Ok(records)
    }

    /// Insert or replace a record by id, then rewrite the whole list
    pub fn save(&self, record: &AttendanceRecord) -> StoreResult<()> {
        let mut records = self.load()?;

        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record.clone();
                debug!(record_id = %record.id, "Attendance record replaced");
            }
            None => {
                records.push(record.clone());
                debug!(record_id = %record.id, "Attendance record added");
            }
        }

        self.persist(&records)
    }

    /// Clear the record slot; the next `load` reseeds it
    pub fn reset(&self) -> StoreResult<()> {
        self.kv.remove(STORAGE_KEY_ATTENDANCE)?;
        info!("Attendance records reset");
        Ok(())
    }

    /// Records for one employee on one calendar date
    pub fn records_for(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|r| &r.employee_id == employee_id && r.date == date)
            .collect())
    }

    /// A record by id, whatever its date
    pub fn find(&self, record_id: &RecordId) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self.load()?.into_iter().find(|r| &r.id == record_id))
    }

    /// The open record for an employee on a date, if any
    pub fn find_open(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self
            .records_for(employee_id, date)?
            .into_iter()
            .find(|r| r.is_open()))
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    fn persist(&self, records: &[AttendanceRecord]) -> StoreResult<()> {
        let json = serde_json::to_string(records)?;
        self.kv.set(STORAGE_KEY_ATTENDANCE, &json)
    }
}
