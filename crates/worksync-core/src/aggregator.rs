//! Time-window aggregation of attendance records

use chrono::{DateTime, Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use worksync_api::{round_hours, AttendanceRecord, Granularity, ReferenceBand, WorkTimeData};
use worksync_store::{RecordStore, StoreResult};
use worksync_util::EmployeeId;

/// Calendar bucket that a record's `date` either falls into or not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowKey {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

impl WindowKey {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            WindowKey::Day(day) => date == day,
            WindowKey::Month { year, month } => date.year() == year && date.month() == month,
            WindowKey::Year(year) => date.year() == year,
        }
    }

    /// Chart label: `MM-DD`, abbreviated month name, or the year
    pub fn label(&self) -> String {
        match *self {
            WindowKey::Day(day) => day.format("%m-%d").to_string(),
            WindowKey::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b").to_string())
                .unwrap_or_else(|| format!("{:02}", month)),
            WindowKey::Year(year) => year.to_string(),
        }
    }

    /// The `count` most recent windows ending with the one containing
    /// `today`, oldest first.
    ///
    /// Stops early at the earliest calendar date chrono can represent.
    pub fn trailing(granularity: Granularity, count: usize, today: NaiveDate) -> Vec<WindowKey> {
        let mut windows: Vec<WindowKey> = (0..count)
            .map_while(|back| Self::steps_back(granularity, back, today))
            .collect();
        windows.reverse();
        windows
    }

    /// The window `back` steps before the one containing `today`
    fn steps_back(granularity: Granularity, back: usize, today: NaiveDate) -> Option<WindowKey> {
        match granularity {
            Granularity::Day => today
                .checked_sub_days(Days::new(u64::try_from(back).ok()?))
                .map(WindowKey::Day),
            Granularity::Month => {
                let index = (today.year() * 12 + today.month0() as i32)
                    .checked_sub(i32::try_from(back).ok()?)?;
                let year = index.div_euclid(12);
                let month = index.rem_euclid(12) as u32 + 1;
                NaiveDate::from_ymd_opt(year, month, 1)?;
                Some(WindowKey::Month { year, month })
            }
            Granularity::Year => {
                let year = today.year().checked_sub(i32::try_from(back).ok()?)?;
                NaiveDate::from_ymd_opt(year, 1, 1)?;
                Some(WindowKey::Year(year))
            }
        }
    }
}

/// Buckets the record list into windows and compares personal hours with
/// the team.
///
/// Every call re-reads the full record list from the store. The team
/// average divides by the roster size, not by how many employees actually
/// have records in the window, so sparse windows pull the average down.
pub struct Aggregator {
    store: Arc<RecordStore>,
}

impl Aggregator {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Last `days` calendar days including today
    pub fn daily_series(
        &self,
        employee_id: &EmployeeId,
        days: usize,
        now: DateTime<Local>,
    ) -> StoreResult<Vec<WorkTimeData>> {
        self.series(Granularity::Day, employee_id, days, now)
    }

    /// Last `months` calendar months including the current one
    pub fn monthly_series(
        &self,
        employee_id: &EmployeeId,
        months: usize,
        now: DateTime<Local>,
    ) -> StoreResult<Vec<WorkTimeData>> {
        self.series(Granularity::Month, employee_id, months, now)
    }

    /// The current year and the two before it
    pub fn yearly_series(
        &self,
        employee_id: &EmployeeId,
        now: DateTime<Local>,
    ) -> StoreResult<Vec<WorkTimeData>> {
        self.series(
            Granularity::Year,
            employee_id,
            Granularity::Year.default_count(),
            now,
        )
    }

    /// Generic entry point used by the granularity selector
    pub fn series(
        &self,
        granularity: Granularity,
        employee_id: &EmployeeId,
        count: usize,
        now: DateTime<Local>,
    ) -> StoreResult<Vec<WorkTimeData>> {
        let records = self.store.load()?;
        let headcount = self.store.roster().len();
        let band = granularity.reference();

        let rows: Vec<WorkTimeData> = WindowKey::trailing(granularity, count, now.date_naive())
            .into_iter()
            .map(|window| aggregate_window(window, &records, employee_id, headcount, band))
            .collect();

        debug!(
            %granularity,
            employee_id = %employee_id,
            windows = rows.len(),
            records = records.len(),
            "Series computed"
        );
        Ok(rows)
    }
}

/// Compute one output row for one window
pub fn aggregate_window(
    window: WindowKey,
    records: &[AttendanceRecord],
    employee_id: &EmployeeId,
    headcount: usize,
    band: ReferenceBand,
) -> WorkTimeData {
    let mut personal_minutes: u64 = 0;
    let mut team_minutes: u64 = 0;

    for record in records.iter().filter(|r| window.matches(r.date)) {
        let minutes = record.duration_minutes() as u64;
        team_minutes += minutes;
        if &record.employee_id == employee_id {
            personal_minutes += minutes;
        }
    }

    let personal_hours = personal_minutes as f64 / 60.0;
    let total_team_hours = team_minutes as f64 / 60.0;
    // Config never yields an empty roster; max(1) covers hand-built ones
    let team_average_hours = total_team_hours / headcount.max(1) as f64;

    WorkTimeData {
        label: window.label(),
        personal_hours: round_hours(personal_hours),
        team_average_hours: round_hours(team_average_hours),
        total_team_hours: round_hours(total_team_hours),
        oecd_avg: band.avg,
        oecd_min: band.min,
        oecd_max: band.max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use worksync_api::{Employee, Roster, OECD_DAILY, OECD_MONTHLY, OECD_YEARLY};
    use worksync_config::SeedSettings;
    use worksync_store::MemoryKvStore;
    use worksync_util::RecordId;

    fn roster() -> Roster {
        let employee = |id: &str| Employee {
            id: EmployeeId::new(id),
            name: format!("Employee {}", id),
            role: "Engineer".into(),
            team: "Engineering".into(),
        };
        Roster::new(vec![employee("1001"), employee("2001"), employee("2002"), employee("3001")])
    }

    fn store() -> Arc<RecordStore> {
        Arc::new(RecordStore::new(
            Arc::new(MemoryKvStore::new()),
            roster(),
            SeedSettings::disabled(),
        ))
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 12, 15, 0, 0).unwrap()
    }

    fn worked(store: &RecordStore, employee: &str, y: i32, m: u32, d: u32, minutes: u32) {
        let check_in = Local.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap();
        let record = AttendanceRecord::closed(
            RecordId::generate(),
            EmployeeId::new(employee),
            check_in,
            minutes,
        );
        store.save(&record).unwrap();
    }

    #[test]
    fn daily_windows_end_today() {
        let windows = WindowKey::trailing(Granularity::Day, 3, now().date_naive());
        assert_eq!(
            windows,
            vec![
                WindowKey::Day(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()),
                WindowKey::Day(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()),
                WindowKey::Day(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()),
            ]
        );
        assert_eq!(windows[0].label(), "03-10");
    }

    #[test]
    fn monthly_windows_cross_year_boundary() {
        let windows = WindowKey::trailing(Granularity::Month, 6, now().date_naive());
        assert_eq!(windows.len(), 6);
        assert_eq!(windows[0], WindowKey::Month { year: 2024, month: 10 });
        assert_eq!(windows[2], WindowKey::Month { year: 2024, month: 12 });
        assert_eq!(windows[3], WindowKey::Month { year: 2025, month: 1 });
        assert_eq!(windows[5], WindowKey::Month { year: 2025, month: 3 });
        assert_eq!(windows[0].label(), "Oct");
    }

    #[test]
    fn yearly_windows() {
        let windows = WindowKey::trailing(Granularity::Year, 3, now().date_naive());
        assert_eq!(
            windows,
            vec![WindowKey::Year(2023), WindowKey::Year(2024), WindowKey::Year(2025)]
        );
        assert_eq!(windows[2].label(), "2025");
    }

    #[test]
    fn oversized_counts_stop_at_earliest_date() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();

        let years = WindowKey::trailing(Granularity::Year, usize::MAX, today);
        assert!(years.len() < 300_000);
        assert_eq!(years.last(), Some(&WindowKey::Year(2025)));
        assert_eq!(years.first(), Some(&WindowKey::Year(NaiveDate::MIN.year())));
        assert!(years.windows(2).all(|pair| match pair {
            [WindowKey::Year(a), WindowKey::Year(b)] => a + 1 == *b,
            _ => false,
        }));

        let months = WindowKey::trailing(Granularity::Month, 5_000_000, today);
        assert_eq!(months.last(), Some(&WindowKey::Month { year: 2025, month: 3 }));
        assert_eq!(
            months.first(),
            Some(&WindowKey::Month { year: NaiveDate::MIN.year(), month: 1 })
        );
    }

    #[test]
    fn window_matching() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        assert!(WindowKey::Day(date).matches(date));
        assert!(!WindowKey::Day(date).matches(date.pred_opt().unwrap()));
        assert!(WindowKey::Month { year: 2025, month: 3 }.matches(date));
        assert!(!WindowKey::Month { year: 2024, month: 3 }.matches(date));
        assert!(WindowKey::Year(2025).matches(date));
    }

    #[test]
    fn row_count_matches_request() {
        let aggregator = Aggregator::new(store());
        let employee = EmployeeId::new("2001");

        assert_eq!(aggregator.daily_series(&employee, 7, now()).unwrap().len(), 7);
        assert_eq!(aggregator.daily_series(&employee, 30, now()).unwrap().len(), 30);
        assert_eq!(aggregator.monthly_series(&employee, 6, now()).unwrap().len(), 6);
        assert_eq!(aggregator.monthly_series(&employee, 13, now()).unwrap().len(), 13);
        assert_eq!(aggregator.yearly_series(&employee, now()).unwrap().len(), 3);
        assert!(aggregator.daily_series(&employee, 0, now()).unwrap().is_empty());
    }

    #[test]
    fn empty_store_yields_zero_rows() {
        let aggregator = Aggregator::new(store());
        let rows = aggregator
            .daily_series(&EmployeeId::new("2001"), 3, now())
            .unwrap();

        assert_eq!(rows.len(), 3);
        for row in rows {
            assert_eq!(row.personal_hours, 0.0);
            assert_eq!(row.team_average_hours, 0.0);
            assert_eq!(row.total_team_hours, 0.0);
            assert_eq!(row.oecd_avg, OECD_DAILY.avg);
        }
    }

    #[test]
    fn single_record_scenario() {
        let store = store();
        worked(&store, "2001", 2025, 3, 12, 480);
        let aggregator = Aggregator::new(store);

        let rows = aggregator
            .daily_series(&EmployeeId::new("2001"), 7, now())
            .unwrap();
        let today = rows.last().unwrap();

        assert_eq!(today.label, "03-12");
        assert_eq!(today.personal_hours, 8.0);
        assert_eq!(today.total_team_hours, 8.0);
        assert_eq!(today.team_average_hours, 2.0); // 8.0 / 4 employees

        assert!(rows[..6].iter().all(|r| r.total_team_hours == 0.0));
    }

    #[test]
    fn employee_without_records_still_sees_team() {
        let store = store();
        worked(&store, "1001", 2025, 3, 11, 600);
        worked(&store, "2002", 2025, 3, 11, 420);
        let aggregator = Aggregator::new(store);

        let rows = aggregator
            .daily_series(&EmployeeId::new("3001"), 2, now())
            .unwrap();

        assert_eq!(rows[0].personal_hours, 0.0);
        assert_eq!(rows[0].total_team_hours, 17.0);
        assert_eq!(rows[0].team_average_hours, 4.3); // 17 / 4 = 4.25
    }

    #[test]
    fn personal_hours_sum_multiple_records_per_window() {
        let store = store();
        worked(&store, "2001", 2025, 3, 12, 240);
        worked(&store, "2001", 2025, 3, 12, 200);
        let aggregator = Aggregator::new(store);

        let rows = aggregator
            .daily_series(&EmployeeId::new("2001"), 1, now())
            .unwrap();
        assert_eq!(rows[0].personal_hours, 7.3); // 440 min
    }

    #[test]
    fn open_records_count_as_zero() {
        let store = store();
        let open = AttendanceRecord::open(
            EmployeeId::new("2001"),
            Local.with_ymd_and_hms(2025, 3, 12, 9, 0, 0).unwrap(),
        );
        store.save(&open).unwrap();
        let aggregator = Aggregator::new(store);

        let rows = aggregator
            .daily_series(&EmployeeId::new("2001"), 1, now())
            .unwrap();
        assert_eq!(rows[0].personal_hours, 0.0);
    }

    #[test]
    fn monthly_and_yearly_buckets() {
        let store = store();
        worked(&store, "2001", 2025, 3, 3, 480);
        worked(&store, "2001", 2025, 2, 27, 480);
        worked(&store, "2002", 2025, 2, 28, 300);
        worked(&store, "2001", 2024, 12, 31, 60);
        worked(&store, "2001", 2022, 6, 1, 60); // outside the yearly range
        let aggregator = Aggregator::new(store);
        let employee = EmployeeId::new("2001");

        let months = aggregator.monthly_series(&employee, 3, now()).unwrap();
        assert_eq!(
            months.iter().map(|r| r.label.as_str()).collect::<Vec<_>>(),
            vec!["Jan", "Feb", "Mar"]
        );
        assert_eq!(months[1].personal_hours, 8.0);
        assert_eq!(months[1].total_team_hours, 13.0);
        assert_eq!(months[1].team_average_hours, 3.3); // 13 / 4 = 3.25
        assert_eq!(months[2].personal_hours, 8.0);
        assert_eq!(months[0].oecd_max, OECD_MONTHLY.max);

        let years = aggregator.yearly_series(&employee, now()).unwrap();
        assert_eq!(years[0].label, "2023");
        assert_eq!(years[0].personal_hours, 0.0);
        assert_eq!(years[1].personal_hours, 1.0);
        assert_eq!(years[2].personal_hours, 16.0);
        assert_eq!(years[2].total_team_hours, 21.0);
        assert_eq!(years[2].oecd_min, OECD_YEARLY.min);
    }

    #[test]
    fn team_average_is_total_over_roster_size() {
        let store = store();
        worked(&store, "1001", 2025, 3, 12, 517);
        worked(&store, "2001", 2025, 3, 12, 463);
        worked(&store, "3001", 2025, 3, 12, 391);
        let records = store.load().unwrap();

        let row = aggregate_window(
            WindowKey::Day(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()),
            &records,
            &EmployeeId::new("1001"),
            4,
            OECD_DAILY,
        );
        let total = (517 + 463 + 391) as f64 / 60.0;
        assert_eq!(row.total_team_hours, round_hours(total));
        assert_eq!(row.team_average_hours, round_hours(total / 4.0));
    }
}
